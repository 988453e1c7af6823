//! One-way directory synchronization engine
//!
//! This crate mirrors a source tree into a destination tree:
//!
//! - **Indexing**: walk each tree into a map of relative path to size and mtime
//! - **Exclusion**: patterns that protect destination-only files from deletion
//! - **Classification**: partition paths into new, updated, deleted and protected
//! - **Execution**: copy, overwrite and delete, in preview, force or confirm mode
//!
//! # Architecture
//!
//! ```text
//!   PathIndexer(source)   PathIndexer(destination)
//!            \                 /
//!             DiffClassifier -- ExclusionMatcher
//!                    |
//!              SyncExecutor -- DecisionProvider
//!                    |
//!            ExecutionSummary
//! ```
//!
//! Change detection compares size and modification time only. A file
//! rewritten with identical length within the filesystem's timestamp
//! granularity is therefore seen as unchanged.
//!
//! # Example
//!
//! ```no_run
//! use dirsync_core::{DeclineAll, ExecutionMode, SyncEngine, SyncOptions};
//!
//! fn example() -> dirsync_core::Result<()> {
//!     let options = SyncOptions::new("/data/src", "/backup/dst").with_exclusions(["logs"]);
//!     let engine = SyncEngine::new(options)?;
//!     let summary = engine.run(ExecutionMode::Preview, &mut DeclineAll)?;
//!     println!("{} changes planned", summary.changes());
//!     Ok(())
//! }
//! ```

pub mod decision;
pub mod diff;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod executor;
pub mod index;
pub mod mode;
pub mod summary;

pub use decision::{ApproveAll, DeclineAll, Decision, DecisionProvider};
pub use diff::{Category, DiffClassifier, DiffResult};
pub use engine::{SyncEngine, SyncOptions, SyncPlan};
pub use error::{Error, Result};
pub use exclusion::{CaseSensitivity, ExclusionMatcher};
pub use executor::SyncExecutor;
pub use index::{FileEntry, PathIndex, PathIndexer, SkippedEntry};
pub use mode::ExecutionMode;
pub use summary::{ExecutionSummary, FileError, FileOperation, Outcome};

pub use dirsync_fs::RelativePath;
