//! Validation of sync tree roots

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Resolve a tree root to its canonical absolute form.
///
/// The root must be an existing, listable directory. A missing path or a
/// path naming something other than a directory is [`Error::PathNotFound`];
/// a directory that cannot be listed is [`Error::AccessDenied`].
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    if !metadata.is_dir() {
        return Err(Error::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_dir(path).map_err(|e| Error::io(path, e))?;

    dunce::canonicalize(path).map_err(|e| Error::io(path, e))
}
