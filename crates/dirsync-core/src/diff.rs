//! Three-way classification of a source and destination index

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use dirsync_fs::RelativePath;

use crate::exclusion::ExclusionMatcher;
use crate::index::PathIndex;

/// The category a path falls into after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// In source only; will be copied
    New,
    /// In both, size or mtime differ; will be overwritten
    Updated,
    /// In destination only and not excluded; will be deleted
    Deleted,
    /// In destination only but excluded; left alone
    Protected,
}

/// The sync plan: four disjoint, sorted sets of relative paths.
///
/// Paths identical in both trees belong to none of the sets; only their
/// count is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    new: BTreeSet<RelativePath>,
    updated: BTreeSet<RelativePath>,
    deleted: BTreeSet<RelativePath>,
    protected: BTreeSet<RelativePath>,
    unchanged: usize,
}

impl DiffResult {
    pub fn new_files(&self) -> &BTreeSet<RelativePath> {
        &self.new
    }

    pub fn updated(&self) -> &BTreeSet<RelativePath> {
        &self.updated
    }

    pub fn deleted(&self) -> &BTreeSet<RelativePath> {
        &self.deleted
    }

    pub fn protected(&self) -> &BTreeSet<RelativePath> {
        &self.protected
    }

    /// Number of paths present and identical in both trees.
    pub fn unchanged(&self) -> usize {
        self.unchanged
    }

    /// True when nothing needs to be copied, overwritten or deleted.
    pub fn is_in_sync(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// The category of `path`, or `None` if it needs no action or is unknown.
    pub fn category_of(&self, path: &RelativePath) -> Option<Category> {
        if self.new.contains(path) {
            Some(Category::New)
        } else if self.updated.contains(path) {
            Some(Category::Updated)
        } else if self.deleted.contains(path) {
            Some(Category::Deleted)
        } else if self.protected.contains(path) {
            Some(Category::Protected)
        } else {
            None
        }
    }
}

/// Partitions two indices into a [`DiffResult`].
pub struct DiffClassifier;

impl DiffClassifier {
    /// Classify every path of `source` and `destination`.
    ///
    /// A source path missing from the destination is new. A path in both is
    /// updated when either its size or its modification time differs; either
    /// signal alone counts, so an edit that keeps the length is still
    /// caught. A destination-only path is protected when `matcher` excludes
    /// it and deleted otherwise.
    pub fn classify(
        source: &PathIndex,
        destination: &PathIndex,
        matcher: &ExclusionMatcher,
    ) -> DiffResult {
        let mut result = DiffResult::default();

        for (path, entry) in source.iter() {
            match destination.get(path) {
                None => {
                    debug!(path = %path, "new");
                    result.new.insert(path.clone());
                }
                Some(existing) if !entry.matches(existing) => {
                    debug!(
                        path = %path,
                        source_size = entry.size,
                        destination_size = existing.size,
                        "updated"
                    );
                    result.updated.insert(path.clone());
                }
                Some(_) => result.unchanged += 1,
            }
        }

        for (path, _) in destination.iter() {
            if source.contains(path) {
                continue;
            }
            match matcher.matching_pattern(path) {
                Some(pattern) => {
                    debug!(path = %path, pattern, "protected");
                    result.protected.insert(path.clone());
                }
                None => {
                    debug!(path = %path, "deleted");
                    result.deleted.insert(path.clone());
                }
            }
        }

        result
    }
}
