//! Error types for dirsync-fs

use std::path::PathBuf;

/// Result type for dirsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dirsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path does not resolve to an existing directory: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Access denied: {path}")]
    AccessDenied { path: PathBuf },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    /// Wrap an I/O error, mapping permission failures to [`Error::AccessDenied`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::AccessDenied { path },
            _ => Self::Io { path, source },
        }
    }
}
