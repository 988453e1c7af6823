//! Atomic file copies and removals used to apply a sync plan

use std::fs::{self, File, Metadata, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::{Error, Result};

/// Copy `source` to `target`, preserving modification time and permissions.
///
/// Missing parent directories of `target` are created. The content is
/// written to a temporary sibling of `target` under an exclusive lock and
/// then renamed into place, so `target` is never observed half-written and an
/// existing file is replaced in one step.
pub fn copy_preserving(source: &Path, target: &Path) -> Result<()> {
    let metadata = fs::metadata(source).map_err(|e| Error::io(source, e))?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_sibling(target);
    let result = write_temp(source, &temp_path, &metadata)
        .and_then(|()| fs::rename(&temp_path, target).map_err(|e| Error::io(target, e)));

    match result {
        Ok(()) => {
            debug!(source = %source.display(), target = %target.display(), "copied");
            Ok(())
        }
        Err(e) => {
            // Best effort; the copy error is reported instead.
            let _ = fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

fn write_temp(source: &Path, temp_path: &Path, metadata: &Metadata) -> Result<()> {
    let mut reader = File::open(source).map_err(|e| Error::io(source, e))?;

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    FileExt::lock_exclusive(&temp_file).map_err(|_| Error::LockFailed {
        path: temp_path.to_path_buf(),
    })?;

    std::io::copy(&mut reader, &mut temp_file).map_err(|e| Error::io(temp_path, e))?;

    let modified = metadata.modified().map_err(|e| Error::io(source, e))?;
    temp_file
        .set_modified(modified)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: temp_path.to_path_buf(),
    })?;
    drop(temp_file);

    // Applied last: a read-only source would otherwise block the writes above.
    fs::set_permissions(temp_path, metadata.permissions()).map_err(|e| Error::io(temp_path, e))
}

fn temp_sibling(target: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.dirsync.tmp",
        target
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    target.with_file_name(temp_name)
}

/// Remove a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "removed");
    Ok(())
}

/// Remove directories left empty above `removed`, stopping at `root`.
///
/// Walks upward from the parent of `removed`, deleting each directory that
/// is now empty. Stops at the first non-empty directory, at `root` (which is
/// never removed), or at any directory outside `root`. Returns how many
/// directories were removed.
pub fn prune_empty_parents(root: &Path, removed: &Path) -> usize {
    let mut pruned = 0;
    let mut current = removed.parent();

    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }
        let is_empty = fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !is_empty || fs::remove_dir(dir).is_err() {
            break;
        }
        debug!(dir = %dir.display(), "pruned empty directory");
        pruned += 1;
        current = dir.parent();
    }

    pruned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_sibling_stays_in_same_directory() {
        let target = Path::new("/data/dest/sub/file.txt");
        let temp = temp_sibling(target);
        assert_eq!(temp.parent(), target.parent());
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".file.txt."));
        assert!(name.ends_with(".dirsync.tmp"));
    }
}
