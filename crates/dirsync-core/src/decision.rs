//! Operator decisions on pending deletions

use std::collections::BTreeSet;

use dirsync_fs::RelativePath;

/// The answer to a deletion prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Delete every candidate
    ApproveAll,
    /// Delete nothing
    DeclineAll,
    /// Delete only the listed candidates
    Approve(BTreeSet<RelativePath>),
}

impl Decision {
    /// True if `path` may be deleted.
    pub fn approves(&self, path: &RelativePath) -> bool {
        match self {
            Self::ApproveAll => true,
            Self::DeclineAll => false,
            Self::Approve(paths) => paths.contains(path),
        }
    }
}

/// Source of deletion decisions in confirm mode.
///
/// The executor asks once per run with the full, sorted candidate list.
/// Interactive front ends prompt the operator; tests and unattended callers
/// supply a fixed answer. Any closure `FnMut(&[RelativePath]) -> Decision`
/// is a provider.
pub trait DecisionProvider {
    fn decide(&mut self, candidates: &[RelativePath]) -> Decision;
}

impl<F> DecisionProvider for F
where
    F: FnMut(&[RelativePath]) -> Decision,
{
    fn decide(&mut self, candidates: &[RelativePath]) -> Decision {
        self(candidates)
    }
}

/// Approves every deletion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproveAll;

impl DecisionProvider for ApproveAll {
    fn decide(&mut self, _candidates: &[RelativePath]) -> Decision {
        Decision::ApproveAll
    }
}

/// Declines every deletion.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineAll;

impl DecisionProvider for DeclineAll {
    fn decide(&mut self, _candidates: &[RelativePath]) -> Decision {
        Decision::DeclineAll
    }
}
