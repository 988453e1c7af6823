//! Sync profiles and settings resolution
//!
//! A profile is a TOML, JSON or YAML file holding the same settings as the
//! command line. Command-line values take precedence over the profile;
//! exclusion patterns from both are combined.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use dirsync_core::{CaseSensitivity, ExecutionMode};
use dirsync_fs::ConfigStore;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Settings read from a profile file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncProfile {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    #[serde(default)]
    pub exclude_from_deletion: Vec<String>,
    pub case_sensitive: Option<bool>,
    #[serde(default)]
    pub fail_on_error: bool,
    #[serde(default)]
    pub confirm_each: bool,
}

impl SyncProfile {
    /// Load a profile, resolving relative roots against the profile's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut profile: Self = ConfigStore::new().load(path)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        profile.source = profile.source.map(|p| base.join(p));
        profile.destination = profile.destination.map(|p| base.join(p));

        tracing::debug!(path = %path.display(), "loaded sync profile");
        Ok(profile)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub exclusions: Vec<String>,
    pub mode: ExecutionMode,
    pub case_sensitivity: CaseSensitivity,
    pub confirm_each: bool,
    pub fail_on_error: bool,
    pub list: bool,
    pub json: bool,
}

impl Settings {
    /// Merge command-line arguments over an optional profile.
    pub fn resolve(cli: &Cli, profile: Option<SyncProfile>) -> Result<Self> {
        let profile = profile.unwrap_or_default();

        let source = cli
            .source
            .clone()
            .or(profile.source)
            .ok_or_else(|| CliError::user("no source directory given (use --source)"))?;
        let destination = cli
            .destination
            .clone()
            .or(profile.destination)
            .ok_or_else(|| CliError::user("no destination directory given (use --destination)"))?;

        let mut exclusions = profile.exclude_from_deletion;
        exclusions.extend(cli.exclude_from_deletion.iter().cloned());

        Ok(Self {
            source,
            destination,
            exclusions,
            mode: ExecutionMode::from_flags(cli.preview, cli.force),
            case_sensitivity: CaseSensitivity::from_setting(
                cli.case_sensitive.or(profile.case_sensitive),
            ),
            confirm_each: cli.confirm_each || profile.confirm_each,
            fail_on_error: cli.fail_on_error || profile.fail_on_error,
            list: cli.list,
            json: cli.json,
        })
    }
}
