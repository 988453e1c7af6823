//! Rendering of execution summaries
//!
//! The human-readable report is built as a string so it can be tested
//! without a terminal. Colors are dropped automatically when stdout is not
//! a terminal.

use colored::{ColoredString, Colorize};
use serde::Serialize;

use dirsync_core::{ExecutionMode, ExecutionSummary, Outcome, RelativePath};

/// Renders an [`ExecutionSummary`] for the operator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    list: bool,
}

impl Reporter {
    /// `list` prints every affected path. Previews always list paths.
    pub fn new(list: bool) -> Self {
        Self { list }
    }

    pub fn render(&self, summary: &ExecutionSummary) -> String {
        let preview = summary.mode.is_preview();
        let mut lines = Vec::new();

        lines.push(match summary.mode {
            ExecutionMode::Preview => {
                format!("{} Preview: no changes were made", "=>".blue().bold())
            }
            ExecutionMode::Force | ExecutionMode::Confirm => {
                format!("{} Sync complete", "=>".blue().bold())
            }
        });

        if self.list || preview {
            let (copied, overwritten, deleted) = if preview {
                ("To copy", "To overwrite", "To delete")
            } else {
                ("Copied", "Overwritten", "Deleted")
            };
            section(&mut lines, copied, "+".green(), &summary.created);
            section(&mut lines, overwritten, "~".yellow(), &summary.updated);
            section(&mut lines, deleted, "-".red(), &summary.deleted);
            section(&mut lines, "Declined", "?".yellow(), &summary.declined);
            section(&mut lines, "Protected", "=".cyan(), &summary.protected);

            if !summary.skipped.is_empty() {
                lines.push(format!("Skipped ({}):", summary.skipped.len()));
                for entry in &summary.skipped {
                    lines.push(format!(
                        "   {} {} ({})",
                        "!".yellow(),
                        entry.path,
                        entry.reason.dimmed()
                    ));
                }
            }
        }

        lines.push(String::new());
        lines.push("Summary:".bold().to_string());
        for (label, count) in [
            ("New", summary.created.len()),
            ("Updated", summary.updated.len()),
            ("Deleted", summary.deleted.len()),
            ("Declined", summary.declined.len()),
            ("Protected", summary.protected.len()),
            ("Unchanged", summary.unchanged),
            ("Skipped", summary.skipped.len()),
            ("Errors", summary.errors.len()),
        ] {
            lines.push(format!("  {:<10} {}", format!("{label}:"), count));
        }

        match summary.outcome() {
            Outcome::Clean => {
                lines.push(format!("{} Clean run", "OK".green().bold()));
            }
            Outcome::PartialFailure { errors } => {
                for error in &summary.errors {
                    lines.push(format!("   {} {}", "!".red(), error));
                }
                let noun = if errors == 1 { "file" } else { "files" };
                lines.push(format!(
                    "{} Run completed with {} {} containing errors",
                    "ERROR".red().bold(),
                    errors,
                    noun
                ));
            }
        }

        lines.join("\n")
    }
}

fn section(lines: &mut Vec<String>, title: &str, marker: ColoredString, paths: &[RelativePath]) {
    if paths.is_empty() {
        return;
    }
    lines.push(format!("{} ({}):", title, paths.len()));
    for path in paths {
        lines.push(format!("   {} {}", marker, path));
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    outcome: Outcome,
    #[serde(flatten)]
    summary: &'a ExecutionSummary,
}

/// Machine-readable rendering of a summary.
pub fn render_json(summary: &ExecutionSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        outcome: summary.outcome(),
        summary,
    })
}
