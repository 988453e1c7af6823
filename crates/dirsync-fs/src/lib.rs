//! Filesystem primitives for dirsync
//!
//! Provides the canonical root-relative path type shared by the indexer and
//! the exclusion matcher, root validation, and the atomic, timestamp
//! preserving copy used to apply a sync plan.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod root;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::RelativePath;
pub use root::resolve_root;
