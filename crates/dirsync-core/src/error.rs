//! Error types for dirsync-core

use std::path::PathBuf;

/// Result type for dirsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a sync run before any file is touched.
///
/// Failures on individual files during execution are not errors at this
/// level; they are recorded in the [`ExecutionSummary`](crate::ExecutionSummary).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tree root is missing or is not a directory
    #[error("Path does not resolve to an existing directory: {path}")]
    PathNotFound { path: PathBuf },

    /// A tree root exists but cannot be read
    #[error("Access denied: {path}")]
    AccessDenied { path: PathBuf },

    /// Source and destination are the same tree or nested in each other
    #[error("Source {source_root} and destination {destination_root} overlap")]
    OverlappingRoots {
        source_root: PathBuf,
        destination_root: PathBuf,
    },

    /// An exclusion pattern could not be compiled
    #[error("Invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Other filesystem error from dirsync-fs
    #[error(transparent)]
    Fs(dirsync_fs::Error),
}

impl From<dirsync_fs::Error> for Error {
    fn from(err: dirsync_fs::Error) -> Self {
        match err {
            dirsync_fs::Error::PathNotFound { path } => Self::PathNotFound { path },
            dirsync_fs::Error::AccessDenied { path } => Self::AccessDenied { path },
            other => Self::Fs(other),
        }
    }
}
