//! Interactive deletion confirmation
//!
//! On a terminal the questions are asked with dialoguer. When stdin is not a
//! terminal the answers are read line by line from it, so confirmations can
//! be scripted (`echo y | dirsync ...`). A missing answer counts as "no".

use std::collections::BTreeSet;
use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;
use dialoguer::Confirm;
use tracing::warn;

use dirsync_core::{Decision, DecisionProvider, RelativePath};

use crate::error::Result;

/// Candidates listed before a batch question; the rest are only counted.
const MAX_LISTED: usize = 10;

/// How deletions are confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// One question covering every candidate
    Batch,
    /// One question per candidate
    PerFile,
}

/// Asks the operator before deletions happen.
#[derive(Debug, Clone)]
pub struct PromptDecider {
    style: PromptStyle,
}

impl PromptDecider {
    pub fn new(style: PromptStyle) -> Self {
        Self { style }
    }

    fn prompt(&self, candidates: &[RelativePath]) -> Result<Decision> {
        if io::stdin().is_terminal() {
            return self.prompt_terminal(candidates);
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stderr();
        Ok(answer_from_reader(
            self.style,
            candidates,
            &mut input,
            &mut output,
        )?)
    }

    fn prompt_terminal(&self, candidates: &[RelativePath]) -> Result<Decision> {
        match self.style {
            PromptStyle::Batch => {
                let mut stderr = io::stderr();
                write_candidates(&mut stderr, candidates)?;

                let approved = Confirm::new()
                    .with_prompt(format!(
                        "Delete {} from the destination?",
                        files(candidates.len())
                    ))
                    .default(false)
                    .interact()?;

                Ok(if approved {
                    Decision::ApproveAll
                } else {
                    Decision::DeclineAll
                })
            }
            PromptStyle::PerFile => {
                let mut approved = BTreeSet::new();
                for path in candidates {
                    let yes = Confirm::new()
                        .with_prompt(format!("Delete {}?", path.as_str().cyan()))
                        .default(false)
                        .interact()?;
                    if yes {
                        approved.insert(path.clone());
                    }
                }
                Ok(collect(approved, candidates.len()))
            }
        }
    }
}

impl DecisionProvider for PromptDecider {
    fn decide(&mut self, candidates: &[RelativePath]) -> Decision {
        match self.prompt(candidates) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(error = %e, "confirmation failed, declining all deletions");
                Decision::DeclineAll
            }
        }
    }
}

/// Answer the confirmation from a line-oriented reader.
///
/// Only `y` or `yes` (any case) approves; anything else, including end of
/// input, declines.
pub fn answer_from_reader<R: BufRead, W: Write>(
    style: PromptStyle,
    candidates: &[RelativePath],
    input: &mut R,
    output: &mut W,
) -> io::Result<Decision> {
    match style {
        PromptStyle::Batch => {
            write_candidates(output, candidates)?;
            write!(
                output,
                "Delete {} from the destination? [y/N] ",
                files(candidates.len())
            )?;
            output.flush()?;

            Ok(if read_yes(input)? {
                Decision::ApproveAll
            } else {
                Decision::DeclineAll
            })
        }
        PromptStyle::PerFile => {
            let mut approved = BTreeSet::new();
            for path in candidates {
                write!(output, "Delete {}? [y/N] ", path)?;
                output.flush()?;
                if read_yes(input)? {
                    approved.insert(path.clone());
                }
            }
            Ok(collect(approved, candidates.len()))
        }
    }
}

fn write_candidates<W: Write>(output: &mut W, candidates: &[RelativePath]) -> io::Result<()> {
    writeln!(
        output,
        "{} exist only in the destination:",
        files(candidates.len())
    )?;
    for path in candidates.iter().take(MAX_LISTED) {
        writeln!(output, "   - {}", path)?;
    }
    if candidates.len() > MAX_LISTED {
        writeln!(output, "   ... and {} more", candidates.len() - MAX_LISTED)?;
    }
    Ok(())
}

fn read_yes<R: BufRead>(input: &mut R) -> io::Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn collect(approved: BTreeSet<RelativePath>, total: usize) -> Decision {
    if approved.is_empty() {
        Decision::DeclineAll
    } else if approved.len() == total {
        Decision::ApproveAll
    } else {
        Decision::Approve(approved)
    }
}

fn files(count: usize) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{count} files")
    }
}
