//! Execution modes

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a sync plan is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Compute and report the plan without touching the destination.
    Preview,

    /// Apply every copy, overwrite and deletion without asking.
    Force,

    /// Apply copies and overwrites, but ask before deleting anything.
    #[default]
    Confirm,
}

impl ExecutionMode {
    /// Select the mode from the `--preview` / `--force` flags.
    ///
    /// Neither flag means [`ExecutionMode::Confirm`]. Callers are expected to
    /// reject both flags together; if both are set, preview wins so nothing
    /// is mutated.
    pub fn from_flags(preview: bool, force: bool) -> Self {
        match (preview, force) {
            (true, _) => Self::Preview,
            (false, true) => Self::Force,
            (false, false) => Self::Confirm,
        }
    }

    /// True when no filesystem mutation may happen.
    pub fn is_preview(&self) -> bool {
        matches!(self, Self::Preview)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preview => write!(f, "preview"),
            Self::Force => write!(f, "force"),
            Self::Confirm => write!(f, "confirm"),
        }
    }
}
