//! Execution summary types
//!
//! The summary is the only output of a sync run. It is returned by value and
//! rendered separately, so execution never writes to the console itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use dirsync_fs::RelativePath;

use crate::diff::DiffResult;
use crate::index::SkippedEntry;
use crate::mode::ExecutionMode;

/// The file operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    /// Copying a new file
    Copy,
    /// Overwriting an updated file
    Overwrite,
    /// Deleting a stale file
    Delete,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A failure on one file that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    /// The affected path
    pub path: RelativePath,
    /// What was being attempted
    pub operation: FileOperation,
    /// Human-readable cause
    pub cause: String,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed for {}: {}", self.operation, self.path, self.cause)
    }
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every planned operation succeeded
    Clean,
    /// Some files could not be processed
    PartialFailure { errors: usize },
}

/// What a sync run did, or in preview mode what it would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    /// Mode the run executed in
    pub mode: ExecutionMode,
    /// Files copied into the destination
    pub created: Vec<RelativePath>,
    /// Files overwritten in the destination
    pub updated: Vec<RelativePath>,
    /// Files removed from the destination
    pub deleted: Vec<RelativePath>,
    /// Deletions the operator declined
    pub declined: Vec<RelativePath>,
    /// Destination-only files kept by an exclusion pattern
    pub protected: Vec<RelativePath>,
    /// Files already identical in both trees
    pub unchanged: usize,
    /// Entries the indexer could not read
    pub skipped: Vec<SkippedEntry>,
    /// Per-file failures
    pub errors: Vec<FileError>,
}

impl ExecutionSummary {
    /// Summary of a preview: every planned action is reported as if done.
    pub fn planned(diff: &DiffResult) -> Self {
        Self {
            mode: ExecutionMode::Preview,
            created: diff.new_files().iter().cloned().collect(),
            updated: diff.updated().iter().cloned().collect(),
            deleted: diff.deleted().iter().cloned().collect(),
            declined: Vec::new(),
            protected: diff.protected().iter().cloned().collect(),
            unchanged: diff.unchanged(),
            skipped: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Attach entries skipped while indexing.
    pub fn with_skipped(mut self, skipped: Vec<SkippedEntry>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Clean or partial failure.
    pub fn outcome(&self) -> Outcome {
        if self.errors.is_empty() {
            Outcome::Clean
        } else {
            Outcome::PartialFailure {
                errors: self.errors.len(),
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of files created, updated or deleted.
    pub fn changes(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len()
    }
}
