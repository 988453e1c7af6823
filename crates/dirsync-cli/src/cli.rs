//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use clap::Parser;

/// One-way directory synchronization
///
/// Mirrors SOURCE into DESTINATION: new files are copied, changed files are
/// overwritten and files missing from SOURCE are deleted, unless they match
/// an --exclude-from-deletion pattern. Without --preview or --force, every
/// deletion is confirmed first.
#[derive(Parser, Debug)]
#[command(name = "dirsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directory (read only)
    #[arg(short, long, value_name = "PATH", env = "DIRSYNC_SOURCE")]
    pub source: Option<PathBuf>,

    /// Destination directory (made to match the source)
    #[arg(short, long, value_name = "PATH", env = "DIRSYNC_DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Paths or globs in the destination that must never be deleted.
    /// Repeat the flag or separate patterns with commas.
    #[arg(
        short = 'x',
        long = "exclude-from-deletion",
        value_name = "PATTERN",
        value_delimiter = ','
    )]
    pub exclude_from_deletion: Vec<String>,

    /// Report what would change without touching the destination
    #[arg(long, conflicts_with = "force")]
    pub preview: bool,

    /// Apply all changes, deletions included, without asking
    #[arg(long)]
    pub force: bool,

    /// Load settings from a TOML, JSON or YAML profile
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ask about each deletion separately instead of once for all
    #[arg(long, conflicts_with = "force")]
    pub confirm_each: bool,

    /// Match exclusion patterns case-sensitively (defaults to the host convention)
    #[arg(long, value_name = "BOOL")]
    pub case_sensitive: Option<bool>,

    /// List every affected path, not only the counts
    #[arg(short, long)]
    pub list: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with status 2 when any file could not be processed
    #[arg(long)]
    pub fail_on_error: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}
