//! [`TestTree`] builder for sync test scenarios.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A point in time `secs` seconds after the Unix epoch.
///
/// Whole seconds keep assertions stable on filesystems with coarse
/// timestamp granularity.
pub fn epoch_secs(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

/// A temporary directory tree with helpers for creating files with exact
/// sizes and modification times, and for asserting on the result of a sync.
///
/// # Example
///
/// ```rust,no_run
/// use dirsync_test_utils::{TestTree, epoch_secs};
///
/// let source = TestTree::new();
/// source.write_at("a.txt", "hello", epoch_secs(1_700_000_000));
/// source.assert_file_exists("a.txt");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Return the native path of `rel` (forward-slash separated) in the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root().to_path_buf(), |acc, segment| acc.join(segment))
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `content` to `rel` and set its modification time to `mtime`.
    pub fn write_at(&self, rel: &str, content: &str, mtime: SystemTime) -> PathBuf {
        let path = self.write(rel, content);
        self.set_mtime(rel, mtime);
        path
    }

    /// Write a file of exactly `size` bytes with modification time `mtime`.
    pub fn write_sized(&self, rel: &str, size: usize, mtime: SystemTime) -> PathBuf {
        self.write_at(rel, &"x".repeat(size), mtime)
    }

    /// Set the modification time of an existing file.
    pub fn set_mtime(&self, rel: &str, mtime: SystemTime) {
        File::options()
            .write(true)
            .open(self.path(rel))
            .unwrap_or_else(|e| panic!("TestTree::set_mtime: cannot open {rel}: {e}"))
            .set_modified(mtime)
            .unwrap();
    }

    /// Create the directory `rel` and its parents.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Modification time of the file at `rel`.
    pub fn mtime(&self, rel: &str) -> SystemTime {
        fs::metadata(self.path(rel)).unwrap().modified().unwrap()
    }

    /// Size in bytes of the file at `rel`.
    pub fn size(&self, rel: &str) -> u64 {
        fs::metadata(self.path(rel)).unwrap().len()
    }

    /// Read the file at `rel` as text.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|_| panic!("Could not read file: {}", self.path(rel).display()))
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `rel` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read(rel);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            self.path(rel).display(),
            content,
            file_content
        );
    }
}
