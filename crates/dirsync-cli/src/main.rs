//! dirsync CLI
//!
//! Mirrors a source directory into a destination directory.
//!
//! Exit status is 0 when the run completed, 1 when it could not start (bad
//! arguments, missing or overlapping roots, invalid patterns) and 2 when
//! `--fail-on-error` is set and some files could not be processed.

mod cli;
mod commands;
mod error;
mod interactive;
mod profile;
mod report;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::{CliError, Result};
use profile::{Settings, SyncProfile};

/// Exit status when `--fail-on-error` is set and files failed.
const EXIT_FILE_ERRORS: i32 = 2;

fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let profile = cli.config.as_deref().map(SyncProfile::load).transpose()?;
    let settings = Settings::resolve(&cli, profile)?;
    tracing::debug!(?settings, "resolved settings");

    let summary = commands::run_sync(&settings)?;

    if settings.fail_on_error && !summary.is_clean() {
        return Ok(EXIT_FILE_ERRORS);
    }
    Ok(0)
}

/// Log to stderr. `RUST_LOG` applies unless `--verbose` asks for debug.
fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::user(format!("failed to set tracing subscriber: {e}")))?;

    tracing::debug!("Verbose mode enabled");
    Ok(())
}
