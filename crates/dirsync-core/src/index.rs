//! Directory tree indexing
//!
//! Walks a tree and records every regular file under its canonical
//! [`RelativePath`], which is the join key between the source and the
//! destination index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use dirsync_fs::RelativePath;

use crate::{Error, Result};

/// One regular file discovered during a tree walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the tree root
    pub relative_path: RelativePath,
    /// Resolved filesystem path
    pub absolute_path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileEntry {
    /// True when size and modification time are both equal.
    ///
    /// This is the only change signal; file contents are never compared.
    pub fn matches(&self, other: &FileEntry) -> bool {
        self.size == other.size && self.modified == other.modified
    }
}

/// An entry below the root that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Path of the entry as reported by the walk
    pub path: String,
    /// Why it was skipped
    pub reason: String,
}

/// Result of indexing one tree.
#[derive(Debug, Clone)]
pub struct PathIndex {
    root: PathBuf,
    entries: BTreeMap<RelativePath, FileEntry>,
    skipped: Vec<SkippedEntry>,
}

impl PathIndex {
    fn empty(root: PathBuf) -> Self {
        Self {
            root,
            entries: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    /// The canonical root this index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a file by relative path.
    pub fn get(&self, path: &RelativePath) -> Option<&FileEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &RelativePath) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in sorted relative-path order.
    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &FileEntry)> {
        self.entries.iter()
    }

    /// Entries that were skipped during the walk.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }
}

/// Walks directory trees into [`PathIndex`] values.
///
/// Symlinks are followed: a symlink to a file is indexed as that file and a
/// symlink to a directory is descended into. Cycles are detected by the
/// walker and reported as skipped entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathIndexer;

impl PathIndexer {
    pub fn new() -> Self {
        Self
    }

    /// Index every regular file below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if `root` is not an existing directory
    /// and [`Error::AccessDenied`] if it cannot be listed. Unreadable entries
    /// below the root do not fail the walk; they are recorded in
    /// [`PathIndex::skipped`].
    pub fn index(&self, root: &Path) -> Result<PathIndex> {
        let root = dirsync_fs::resolve_root(root)?;
        let mut index = PathIndex::empty(root.clone());

        for item in WalkDir::new(&root).follow_links(true) {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(Error::AccessDenied { path: root });
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    let reason = match err.loop_ancestor() {
                        Some(ancestor) => format!("symlink loop back to {}", ancestor.display()),
                        None => err.to_string(),
                    };
                    warn!(path = %path, reason = %reason, "skipping entry");
                    index.skipped.push(SkippedEntry { path, reason });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    let path = entry.path().display().to_string();
                    warn!(path = %path, error = %err, "skipping unreadable file");
                    index.skipped.push(SkippedEntry {
                        path,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(err) => {
                    let path = entry.path().display().to_string();
                    warn!(path = %path, error = %err, "skipping file without mtime");
                    index.skipped.push(SkippedEntry {
                        path,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let Some(relative_path) = RelativePath::from_root(&root, entry.path()) else {
                let path = entry.path().display().to_string();
                warn!(path = %path, "skipping file with a non UTF-8 name");
                index.skipped.push(SkippedEntry {
                    path,
                    reason: "name is not valid UTF-8".to_string(),
                });
                continue;
            };

            index.entries.insert(
                relative_path.clone(),
                FileEntry {
                    relative_path,
                    absolute_path: entry.into_path(),
                    size: metadata.len(),
                    modified,
                },
            );
        }

        debug!(
            root = %index.root.display(),
            files = index.entries.len(),
            skipped = index.skipped.len(),
            "indexed tree"
        );
        Ok(index)
    }
}
