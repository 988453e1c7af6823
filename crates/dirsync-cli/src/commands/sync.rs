//! The sync command
//!
//! Builds the engine from resolved settings, plans, executes and prints the
//! report. Prompts go to stderr so `--json` output on stdout stays parseable.

use colored::Colorize;

use dirsync_core::{ExecutionSummary, SyncEngine, SyncOptions};

use crate::error::Result;
use crate::interactive::{PromptDecider, PromptStyle};
use crate::profile::Settings;
use crate::report::{self, Reporter};

/// Run one sync and print its report.
pub fn run_sync(settings: &Settings) -> Result<ExecutionSummary> {
    let options = SyncOptions::new(&settings.source, &settings.destination)
        .with_exclusions(settings.exclusions.iter().cloned())
        .with_case_sensitivity(settings.case_sensitivity);
    let engine = SyncEngine::new(options)?;

    if !settings.json {
        println!(
            "{} Syncing {} -> {} ({})",
            "=>".blue().bold(),
            engine.source_root().display().to_string().cyan(),
            engine.destination_root().display().to_string().cyan(),
            settings.mode
        );
    }

    let plan = engine.plan()?;

    let style = if settings.confirm_each {
        PromptStyle::PerFile
    } else {
        PromptStyle::Batch
    };
    let mut decider = PromptDecider::new(style);
    let summary = engine.execute(plan, settings.mode, &mut decider);

    if settings.json {
        println!("{}", report::render_json(&summary)?);
    } else {
        println!();
        println!("{}", Reporter::new(settings.list).render(&summary));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirsync_core::{CaseSensitivity, ExecutionMode};
    use dirsync_test_utils::TestTree;

    fn settings(source: &TestTree, destination: &TestTree, mode: ExecutionMode) -> Settings {
        Settings {
            source: source.root().to_path_buf(),
            destination: destination.root().to_path_buf(),
            exclusions: vec!["keep".to_string()],
            mode,
            case_sensitivity: CaseSensitivity::Sensitive,
            confirm_each: false,
            fail_on_error: false,
            list: false,
            json: false,
        }
    }

    #[test]
    fn test_run_sync_force_applies_plan() {
        let source = TestTree::new();
        let destination = TestTree::new();
        source.write("docs/readme.md", "hello");
        destination.write("stale.txt", "old");
        destination.write("keep/notes.txt", "mine");

        let summary =
            run_sync(&settings(&source, &destination, ExecutionMode::Force)).unwrap();

        assert!(summary.is_clean());
        destination.assert_file_contains("docs/readme.md", "hello");
        destination.assert_file_not_exists("stale.txt");
        destination.assert_file_exists("keep/notes.txt");
    }

    #[test]
    fn test_run_sync_preview_changes_nothing() {
        let source = TestTree::new();
        let destination = TestTree::new();
        source.write("new.txt", "x");
        destination.write("stale.txt", "old");

        let summary =
            run_sync(&settings(&source, &destination, ExecutionMode::Preview)).unwrap();

        assert_eq!(summary.created.len(), 1);
        assert_eq!(summary.deleted.len(), 1);
        destination.assert_file_not_exists("new.txt");
        destination.assert_file_exists("stale.txt");
    }

    #[test]
    fn test_run_sync_missing_source_fails() {
        let destination = TestTree::new();
        let mut settings = settings(&destination, &destination, ExecutionMode::Force);
        settings.source = destination.path("does-not-exist");

        assert!(run_sync(&settings).is_err());
    }
}
