//! SyncEngine: index, classify and execute in one call
//!
//! The engine validates both roots, compiles the exclusion patterns, indexes
//! the two trees in parallel and hands the classified plan to the
//! [`SyncExecutor`].

use std::path::{Path, PathBuf};

use tracing::info;

use crate::decision::DecisionProvider;
use crate::diff::{DiffClassifier, DiffResult};
use crate::exclusion::{CaseSensitivity, ExclusionMatcher};
use crate::executor::SyncExecutor;
use crate::index::{PathIndexer, SkippedEntry};
use crate::mode::ExecutionMode;
use crate::summary::ExecutionSummary;
use crate::{Error, Result};

/// Inputs of a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Source tree root
    pub source: PathBuf,
    /// Destination tree root
    pub destination: PathBuf,
    /// Patterns protecting destination-only files from deletion
    pub exclude_from_deletion: Vec<String>,
    /// Case handling for exclusion patterns
    pub case_sensitivity: CaseSensitivity,
    /// Remove directories emptied by deletions
    pub prune_empty_dirs: bool,
}

impl SyncOptions {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            exclude_from_deletion: Vec::new(),
            case_sensitivity: CaseSensitivity::host(),
            prune_empty_dirs: true,
        }
    }

    pub fn with_exclusions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_from_deletion = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case_sensitivity = case;
        self
    }
}

/// A classified plan plus the entries skipped while indexing.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub diff: DiffResult,
    pub skipped: Vec<SkippedEntry>,
}

/// Engine for one-way directory synchronization
pub struct SyncEngine {
    source_root: PathBuf,
    destination_root: PathBuf,
    matcher: ExclusionMatcher,
    indexer: PathIndexer,
    executor: SyncExecutor,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Errors
    ///
    /// Fails before anything is read if a root is missing or unreadable,
    /// if the roots overlap, or if an exclusion pattern is invalid.
    pub fn new(options: SyncOptions) -> Result<Self> {
        let source_root = dirsync_fs::resolve_root(&options.source)?;
        let destination_root = dirsync_fs::resolve_root(&options.destination)?;

        if source_root.starts_with(&destination_root) || destination_root.starts_with(&source_root)
        {
            return Err(Error::OverlappingRoots {
                source_root,
                destination_root,
            });
        }

        let matcher =
            ExclusionMatcher::new(&options.exclude_from_deletion, options.case_sensitivity)?;
        let executor = SyncExecutor::new(source_root.clone(), destination_root.clone())
            .prune_empty_dirs(options.prune_empty_dirs);

        Ok(Self {
            source_root,
            destination_root,
            matcher,
            indexer: PathIndexer::new(),
            executor,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Index both trees and classify them.
    pub fn plan(&self) -> Result<SyncPlan> {
        let (source, destination) = rayon::join(
            || self.indexer.index(&self.source_root),
            || self.indexer.index(&self.destination_root),
        );
        let source = source?;
        let destination = destination?;

        let diff = DiffClassifier::classify(&source, &destination, &self.matcher);
        info!(
            new = diff.new_files().len(),
            updated = diff.updated().len(),
            deleted = diff.deleted().len(),
            protected = diff.protected().len(),
            unchanged = diff.unchanged(),
            "classified"
        );

        let mut skipped = source.skipped().to_vec();
        skipped.extend_from_slice(destination.skipped());

        Ok(SyncPlan { diff, skipped })
    }

    /// Apply a previously computed plan.
    pub fn execute(
        &self,
        plan: SyncPlan,
        mode: ExecutionMode,
        decider: &mut dyn DecisionProvider,
    ) -> ExecutionSummary {
        self.executor
            .execute(&plan.diff, mode, decider)
            .with_skipped(plan.skipped)
    }

    /// Plan and execute in one step.
    pub fn run(
        &self,
        mode: ExecutionMode,
        decider: &mut dyn DecisionProvider,
    ) -> Result<ExecutionSummary> {
        let plan = self.plan()?;
        Ok(self.execute(plan, mode, decider))
    }
}
