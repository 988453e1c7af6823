//! Shared test utilities for the dirsync workspace.
//!
//! This crate provides directory-tree fixtures so every crate's test suite
//! builds source and destination trees the same way. It is a dev-dependency
//! only and never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for temporary directory trees

pub mod tree;

pub use tree::{TestTree, epoch_secs};
