//! Root-relative path handling shared by indexing and pattern matching

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A path relative to a tree root, in canonical form.
///
/// The canonical form uses `/` as the only separator and carries no leading
/// `./` or `/`, no trailing separator and no empty or `.` components. Source
/// and destination indices are joined on this value, and exclusion patterns
/// are normalized the same way, so both sides always agree on spelling.
///
/// `\` is a separator only on Windows. Elsewhere it is an ordinary file
/// name character and stays inside its segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct RelativePath {
    inner: String,
}

#[cfg(windows)]
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(not(windows))]
fn is_separator(c: char) -> bool {
    c == '/'
}

impl RelativePath {
    /// Normalize any path-like input into canonical form.
    ///
    /// Components that are not valid UTF-8 are converted lossily; use
    /// [`RelativePath::from_native`] where names must survive unchanged.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let segments: Vec<_> = path
            .as_ref()
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
            })
            .collect();
        Self {
            inner: segments.join("/"),
        }
    }

    /// Build the key for a native path, one component per segment.
    ///
    /// Returns `None` if any component is not valid UTF-8, since such a
    /// name cannot be keyed without colliding with another.
    pub fn from_native(path: &Path) -> Option<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_str()?),
                Component::ParentDir => segments.push(".."),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Some(Self {
            inner: segments.join("/"),
        })
    }

    fn from_text(raw: &str) -> Self {
        let inner = raw
            .split(is_separator)
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self { inner }
    }

    /// Compute the relative path of `path` below `root`.
    ///
    /// Returns `None` when `path` is not inside `root` or has a name that
    /// is not valid UTF-8.
    pub fn from_root(root: &Path, path: &Path) -> Option<Self> {
        path.strip_prefix(root).ok().and_then(Self::from_native)
    }

    /// Get the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// True for the empty path (the root itself).
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Resolve this path below `root` as a platform-native path.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        let mut native = root.to_path_buf();
        for segment in self.segments() {
            native.push(segment);
        }
        native
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|segment| !segment.is_empty())
    }

    /// Get the parent path, or `None` for a top-level entry.
    pub fn parent(&self) -> Option<Self> {
        self.inner.rfind('/').map(|idx| Self {
            inner: self.inner[..idx].to_string(),
        })
    }

    /// Get the final path segment.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// True when this path lies inside the directory `dir`.
    ///
    /// `logs/run.log` is inside `logs`; `logsbackup/a` is not.
    pub fn is_inside(&self, dir: &str) -> bool {
        self.inner.len() > dir.len()
            && self.inner.starts_with(dir)
            && self.inner.as_bytes()[dir.len()] == b'/'
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::from_text(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::from_text(&s)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.inner
    }
}

impl From<&Path> for RelativePath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
