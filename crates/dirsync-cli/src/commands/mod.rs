//! Command implementations for dirsync-cli

pub mod sync;

pub use sync::run_sync;
