//! End-to-end tests of the sync engine against real temporary trees.

use dirsync_core::{
    ApproveAll, DeclineAll, Decision, Error, ExecutionMode, FileOperation, Outcome, RelativePath,
    SyncEngine, SyncOptions,
};
use dirsync_test_utils::{TestTree, epoch_secs};
use pretty_assertions::assert_eq;

fn engine(source: &TestTree, destination: &TestTree, patterns: &[&str]) -> SyncEngine {
    let options = SyncOptions::new(source.root(), destination.root())
        .with_exclusions(patterns.iter().copied());
    SyncEngine::new(options).unwrap()
}

fn strs(paths: &[RelativePath]) -> Vec<&str> {
    paths.iter().map(RelativePath::as_str).collect()
}

// ============================================================================
// Example scenarios
// ============================================================================

#[test]
fn test_new_file_is_copied_with_size_and_mtime() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write_sized("a.txt", 100, epoch_secs(1_700_000_000));

    let sync = engine(&source, &destination, &[]);
    let plan = sync.plan().unwrap();
    assert_eq!(
        plan.diff.new_files().iter().map(RelativePath::as_str).collect::<Vec<_>>(),
        vec!["a.txt"]
    );
    assert!(plan.diff.updated().is_empty());
    assert!(plan.diff.deleted().is_empty());
    assert!(plan.diff.protected().is_empty());

    let summary = sync.execute(plan, ExecutionMode::Force, &mut ApproveAll);

    assert_eq!(strs(&summary.created), vec!["a.txt"]);
    assert_eq!(destination.size("a.txt"), 100);
    assert_eq!(destination.mtime("a.txt"), epoch_secs(1_700_000_000));
}

#[test]
fn test_exclusion_protects_stale_file() {
    let source = TestTree::new();
    let destination = TestTree::new();
    destination.write("logs/run.log", "kept");

    let summary = engine(&source, &destination, &["logs"])
        .run(ExecutionMode::Force, &mut ApproveAll)
        .unwrap();

    assert_eq!(strs(&summary.protected), vec!["logs/run.log"]);
    assert!(summary.deleted.is_empty());
    destination.assert_file_exists("logs/run.log");
}

#[test]
fn test_size_only_change_is_overwritten() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write_sized("b.txt", 50, epoch_secs(1_000_000));
    destination.write_sized("b.txt", 40, epoch_secs(1_000_000));

    let summary = engine(&source, &destination, &[])
        .run(ExecutionMode::Force, &mut ApproveAll)
        .unwrap();

    assert_eq!(strs(&summary.updated), vec!["b.txt"]);
    assert_eq!(destination.size("b.txt"), 50);
}

#[test]
fn test_confirm_decline_keeps_file_and_reports_declined() {
    let source = TestTree::new();
    let destination = TestTree::new();
    destination.write("stale.tmp", "old");

    let summary = engine(&source, &destination, &[])
        .run(ExecutionMode::Confirm, &mut DeclineAll)
        .unwrap();

    destination.assert_file_exists("stale.tmp");
    assert_eq!(strs(&summary.declined), vec!["stale.tmp"]);
    assert!(summary.deleted.is_empty());
    assert!(summary.errors.is_empty());
    assert_eq!(summary.outcome(), Outcome::Clean);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_second_force_run_is_a_no_op() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write_at("a.txt", "alpha", epoch_secs(1_000));
    source.write_at("nested/deep/b.txt", "beta", epoch_secs(2_000));
    source.write_at("empty.txt", "", epoch_secs(3_000));
    destination.write_at("nested/deep/b.txt", "old beta", epoch_secs(500));
    destination.write("obsolete.txt", "gone soon");

    let sync = engine(&source, &destination, &[]);
    let first = sync.run(ExecutionMode::Force, &mut ApproveAll).unwrap();
    assert_eq!(first.changes(), 4);

    let second = sync.plan().unwrap();
    assert!(second.diff.is_in_sync(), "second run should be idempotent: {:?}", second.diff);
    assert_eq!(second.diff.unchanged(), 3);
}

#[test]
fn test_preview_matches_what_force_does() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write_at("new.txt", "n", epoch_secs(10));
    source.write_at("changed.txt", "new content", epoch_secs(20));
    destination.write_at("changed.txt", "old", epoch_secs(20));
    destination.write("stale.txt", "s");
    destination.write("cache/keep.bin", "k");

    let preview = engine(&source, &destination, &["cache"])
        .run(ExecutionMode::Preview, &mut ApproveAll)
        .unwrap();

    // Preview touched nothing
    destination.assert_file_not_exists("new.txt");
    destination.assert_file_exists("stale.txt");
    assert_eq!(destination.read("changed.txt"), "old");

    let force = engine(&source, &destination, &["cache"])
        .run(ExecutionMode::Force, &mut ApproveAll)
        .unwrap();

    assert_eq!(preview.mode, ExecutionMode::Preview);
    assert_eq!(preview.created, force.created);
    assert_eq!(preview.updated, force.updated);
    assert_eq!(preview.deleted, force.deleted);
    assert_eq!(preview.protected, force.protected);
}

#[test]
fn test_preview_never_asks_for_decisions() {
    let source = TestTree::new();
    let destination = TestTree::new();
    destination.write("stale.txt", "s");

    let mut asked = false;
    let mut decider = |_: &[RelativePath]| {
        asked = true;
        Decision::ApproveAll
    };
    let summary = engine(&source, &destination, &[])
        .run(ExecutionMode::Preview, &mut decider)
        .unwrap();

    assert!(!asked);
    assert_eq!(strs(&summary.deleted), vec!["stale.txt"]);
    destination.assert_file_exists("stale.txt");
}

#[test]
fn test_force_never_asks_for_decisions() {
    let source = TestTree::new();
    let destination = TestTree::new();
    destination.write("stale.txt", "s");

    let mut asked = false;
    let mut decider = |_: &[RelativePath]| {
        asked = true;
        Decision::DeclineAll
    };
    engine(&source, &destination, &[])
        .run(ExecutionMode::Force, &mut decider)
        .unwrap();

    assert!(!asked);
    destination.assert_file_not_exists("stale.txt");
}

#[test]
fn test_confirm_asks_once_with_sorted_candidates_and_honors_selection() {
    let source = TestTree::new();
    let destination = TestTree::new();
    destination.write("b.tmp", "");
    destination.write("a.tmp", "");
    destination.write("keep/me.log", "");

    let mut calls: Vec<Vec<String>> = Vec::new();
    let mut decider = |candidates: &[RelativePath]| {
        calls.push(candidates.iter().map(|p| p.as_str().to_string()).collect());
        Decision::Approve([RelativePath::from("b.tmp")].into_iter().collect())
    };
    let summary = engine(&source, &destination, &["keep"])
        .run(ExecutionMode::Confirm, &mut decider)
        .unwrap();

    assert_eq!(calls, vec![vec!["a.tmp".to_string(), "b.tmp".to_string()]]);
    assert_eq!(strs(&summary.deleted), vec!["b.tmp"]);
    assert_eq!(strs(&summary.declined), vec!["a.tmp"]);
    destination.assert_file_exists("a.tmp");
    destination.assert_file_not_exists("b.tmp");
    destination.assert_file_exists("keep/me.log");
}

#[test]
fn test_confirm_without_candidates_does_not_prompt() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write("a.txt", "a");

    let mut asked = false;
    let mut decider = |_: &[RelativePath]| {
        asked = true;
        Decision::DeclineAll
    };
    let summary = engine(&source, &destination, &[])
        .run(ExecutionMode::Confirm, &mut decider)
        .unwrap();

    assert!(!asked);
    assert_eq!(strs(&summary.created), vec!["a.txt"]);
}

#[test]
fn test_deletion_prunes_emptied_directories_only() {
    let source = TestTree::new();
    let destination = TestTree::new();
    destination.write("old/project/file.txt", "x");
    destination.write("mixed/stale.txt", "x");
    destination.write("mixed/keep.log", "x");

    engine(&source, &destination, &["*.log"])
        .run(ExecutionMode::Force, &mut ApproveAll)
        .unwrap();

    destination.assert_file_not_exists("old");
    destination.assert_file_exists("mixed/keep.log");
    destination.assert_file_not_exists("mixed/stale.txt");
}

#[test]
fn test_file_replaces_directory_of_same_name() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write("report", "now a file");
    destination.write("report/old.txt", "was a directory");

    let summary = engine(&source, &destination, &[])
        .run(ExecutionMode::Force, &mut ApproveAll)
        .unwrap();

    assert!(summary.is_clean(), "errors: {:?}", summary.errors);
    assert_eq!(destination.read("report"), "now a file");
}

// ============================================================================
// File names
// ============================================================================

#[cfg(not(windows))]
#[test]
fn test_backslash_in_file_name_is_copied() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write("weird\\name.txt", "literal backslash");

    let summary = engine(&source, &destination, &[])
        .run(ExecutionMode::Force, &mut ApproveAll)
        .unwrap();

    assert!(summary.is_clean(), "errors: {:?}", summary.errors);
    assert_eq!(strs(&summary.created), vec!["weird\\name.txt"]);
    assert_eq!(destination.read("weird\\name.txt"), "literal backslash");
    destination.assert_file_not_exists("weird/name.txt");
}

#[cfg(not(windows))]
#[test]
fn test_backslash_name_does_not_stand_in_for_nested_path() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write_at("a/b.txt", "same", epoch_secs(5_000));
    destination.write_at("a\\b.txt", "same", epoch_secs(5_000));

    let sync = engine(&source, &destination, &[]);
    let plan = sync.plan().unwrap();
    assert_eq!(plan.diff.unchanged(), 0);
    assert!(plan.diff.new_files().contains(&RelativePath::from("a/b.txt")));
    assert!(plan.diff.deleted().contains(&RelativePath::from("a\\b.txt")));

    let summary = sync.execute(plan, ExecutionMode::Force, &mut ApproveAll);

    assert!(summary.is_clean(), "errors: {:?}", summary.errors);
    destination.assert_file_contains("a/b.txt", "same");
    destination.assert_file_not_exists("a\\b.txt");
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_copy_failure_is_recorded_and_run_continues() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write("blocked", "file");
    source.write("fine.txt", "ok");
    // A protected directory occupies the target name, so the copy cannot land.
    destination.write("blocked/keep.log", "x");

    let summary = engine(&source, &destination, &["blocked"])
        .run(ExecutionMode::Force, &mut ApproveAll)
        .unwrap();

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].path.as_str(), "blocked");
    assert_eq!(summary.errors[0].operation, FileOperation::Copy);
    assert_eq!(summary.outcome(), Outcome::PartialFailure { errors: 1 });
    assert_eq!(strs(&summary.created), vec!["fine.txt"]);
    destination.assert_file_exists("fine.txt");
    destination.assert_file_exists("blocked/keep.log");
}

#[test]
fn test_files_vanishing_after_planning_are_per_file_errors() {
    let source = TestTree::new();
    let destination = TestTree::new();
    source.write("a.txt", "a");
    source.write("b.txt", "b");
    destination.write("stale.txt", "s");

    let sync = engine(&source, &destination, &[]);
    let plan = sync.plan().unwrap();
    std::fs::remove_file(source.path("a.txt")).unwrap();
    std::fs::remove_file(destination.path("stale.txt")).unwrap();

    let summary = sync.execute(plan, ExecutionMode::Force, &mut ApproveAll);

    let failed: Vec<(&str, FileOperation)> = summary
        .errors
        .iter()
        .map(|e| (e.path.as_str(), e.operation))
        .collect();
    assert_eq!(
        failed,
        vec![("stale.txt", FileOperation::Delete), ("a.txt", FileOperation::Copy)]
    );
    assert_eq!(strs(&summary.created), vec!["b.txt"]);
}

#[test]
fn test_missing_source_is_fatal() {
    let destination = TestTree::new();
    let missing = destination.path("does-not-exist");
    let other = TestTree::new();

    let result = SyncEngine::new(SyncOptions::new(&missing, other.root()));

    match result {
        Err(Error::PathNotFound { path }) => assert_eq!(path, missing),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected PathNotFound"),
    }
}

#[test]
fn test_destination_that_is_a_file_is_fatal() {
    let source = TestTree::new();
    let file = source.write("not-a-dir", "x");
    let other = TestTree::new();

    let result = SyncEngine::new(SyncOptions::new(other.root(), &file));

    assert!(matches!(result, Err(Error::PathNotFound { .. })));
}

#[test]
fn test_nested_roots_are_rejected() {
    let tree = TestTree::new();
    tree.mkdir("backup");

    let result = SyncEngine::new(SyncOptions::new(tree.root(), tree.path("backup")));

    assert!(matches!(result, Err(Error::OverlappingRoots { .. })));
}

#[test]
fn test_invalid_pattern_is_fatal() {
    let source = TestTree::new();
    let destination = TestTree::new();
    let options =
        SyncOptions::new(source.root(), destination.root()).with_exclusions(["logs/[*.log"]);

    assert!(matches!(
        SyncEngine::new(options),
        Err(Error::InvalidPattern { .. })
    ));
}
