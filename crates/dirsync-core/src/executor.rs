//! Applies a [`DiffResult`] to the destination tree

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use dirsync_fs::{RelativePath, io};

use crate::decision::{Decision, DecisionProvider};
use crate::diff::DiffResult;
use crate::mode::ExecutionMode;
use crate::summary::{ExecutionSummary, FileError, FileOperation};

/// Executes sync plans between two resolved roots.
///
/// Work is done in a fixed order: the deletion decision, deletions, new
/// copies, then overwrites, each over sorted paths. Deleting first lets a
/// stale file make room for a directory of the same name (and vice versa).
/// A failure on one file is recorded and the run moves on.
#[derive(Debug, Clone)]
pub struct SyncExecutor {
    source_root: PathBuf,
    destination_root: PathBuf,
    prune_empty_dirs: bool,
}

impl SyncExecutor {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            prune_empty_dirs: true,
        }
    }

    /// Set whether directories emptied by deletions are removed.
    pub fn prune_empty_dirs(mut self, prune: bool) -> Self {
        self.prune_empty_dirs = prune;
        self
    }

    /// Apply `diff` in `mode`.
    ///
    /// Preview returns the plan without touching anything or consulting
    /// `decider`. Force deletes without asking. Confirm asks `decider` once
    /// with all deletion candidates; declined paths are reported as
    /// declined, not as errors. Protected paths are never touched.
    pub fn execute(
        &self,
        diff: &DiffResult,
        mode: ExecutionMode,
        decider: &mut dyn DecisionProvider,
    ) -> ExecutionSummary {
        if mode.is_preview() {
            return ExecutionSummary::planned(diff);
        }

        let candidates: Vec<RelativePath> = diff.deleted().iter().cloned().collect();
        let decision = match mode {
            ExecutionMode::Confirm if !candidates.is_empty() => decider.decide(&candidates),
            _ => Decision::ApproveAll,
        };
        let (approved, declined): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|path| decision.approves(path));

        if !declined.is_empty() {
            info!(count = declined.len(), "deletions declined");
        }

        let mut errors = Vec::new();
        let deleted = self.delete_all(approved, &mut errors);
        let created = self.copy_all(diff.new_files(), FileOperation::Copy, &mut errors);
        let updated = self.copy_all(diff.updated(), FileOperation::Overwrite, &mut errors);

        info!(
            created = created.len(),
            updated = updated.len(),
            deleted = deleted.len(),
            errors = errors.len(),
            "sync executed"
        );

        ExecutionSummary {
            mode,
            created,
            updated,
            deleted,
            declined,
            protected: diff.protected().iter().cloned().collect(),
            unchanged: diff.unchanged(),
            skipped: Vec::new(),
            errors,
        }
    }

    fn delete_all(
        &self,
        approved: Vec<RelativePath>,
        errors: &mut Vec<FileError>,
    ) -> Vec<RelativePath> {
        let mut deleted = Vec::with_capacity(approved.len());

        for path in approved {
            let target = path.to_native(&self.destination_root);
            match io::remove_file(&target) {
                Ok(()) => {
                    debug!(path = %path, "deleted");
                    if self.prune_empty_dirs {
                        io::prune_empty_parents(&self.destination_root, &target);
                    }
                    deleted.push(path);
                }
                Err(err) => {
                    warn!(path = %path, error = %err, "delete failed");
                    errors.push(FileError {
                        path,
                        operation: FileOperation::Delete,
                        cause: err.to_string(),
                    });
                }
            }
        }

        deleted
    }

    fn copy_all(
        &self,
        paths: &BTreeSet<RelativePath>,
        operation: FileOperation,
        errors: &mut Vec<FileError>,
    ) -> Vec<RelativePath> {
        let mut done = Vec::with_capacity(paths.len());

        for path in paths {
            match self.copy_one(path) {
                Ok(()) => {
                    debug!(path = %path, %operation, "done");
                    done.push(path.clone());
                }
                Err(err) => {
                    warn!(path = %path, %operation, error = %err, "copy failed");
                    errors.push(FileError {
                        path: path.clone(),
                        operation,
                        cause: err.to_string(),
                    });
                }
            }
        }

        done
    }

    fn copy_one(&self, path: &RelativePath) -> dirsync_fs::Result<()> {
        let source = path.to_native(&self.source_root);
        let target = path.to_native(&self.destination_root);
        io::copy_preserving(&source, &target)
    }
}
