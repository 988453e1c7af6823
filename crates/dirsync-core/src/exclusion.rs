//! Exclusion patterns protecting destination-only files from deletion

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};

use dirsync_fs::RelativePath;

use crate::{Error, Result};

/// Whether pattern matching distinguishes letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    /// The convention of the host filesystem: case-insensitive on Windows
    /// and macOS, case-sensitive elsewhere.
    pub fn host() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::Insensitive
        } else {
            Self::Sensitive
        }
    }

    /// Map an explicit `case_sensitive` setting, falling back to the host.
    pub fn from_setting(case_sensitive: Option<bool>) -> Self {
        match case_sensitive {
            Some(true) => Self::Sensitive,
            Some(false) => Self::Insensitive,
            None => Self::host(),
        }
    }
}

impl Default for CaseSensitivity {
    fn default() -> Self {
        Self::host()
    }
}

#[derive(Debug, Clone)]
enum Rule {
    /// Exact path, or a whole subtree when the path is a directory prefix
    Literal(String),
    /// Shell-style wildcard over the full relative path
    Glob(GlobMatcher),
}

#[derive(Debug, Clone)]
struct Pattern {
    text: String,
    rule: Rule,
}

/// Compiled set of exclusion patterns.
///
/// A pattern matches a relative path when, tried in order:
/// 1. it equals the path,
/// 2. the path lies in the directory the pattern names (`logs` matches
///    `logs/run.log`), or
/// 3. it contains `*` or `?` and matches the whole path as a wildcard, with
///    wildcards free to span `/`.
///
/// Patterns go through the same normalization as indexed paths, so
/// `.\logs\` and `logs` are the same pattern.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    patterns: Vec<Pattern>,
    case: CaseSensitivity,
}

impl ExclusionMatcher {
    /// Compile `patterns`. Patterns that normalize to nothing are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] when a wildcard pattern is malformed,
    /// for example an unclosed character class.
    pub fn new<I, S>(patterns: I, case: CaseSensitivity) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();

        for raw in patterns {
            let normalized = RelativePath::from(raw.as_ref().trim());
            if normalized.is_empty() {
                continue;
            }
            let text = normalized.as_str().to_string();

            let rule = if is_wildcard(&text) {
                let glob = GlobBuilder::new(&literal_braces(&text))
                    .case_insensitive(case == CaseSensitivity::Insensitive)
                    .literal_separator(false)
                    .backslash_escape(false)
                    .build()
                    .map_err(|e| Error::InvalidPattern {
                        pattern: raw.as_ref().to_string(),
                        message: e.kind().to_string(),
                    })?;
                Rule::Glob(glob.compile_matcher())
            } else {
                Rule::Literal(fold(&text, case))
            };

            compiled.push(Pattern { text, rule });
        }

        Ok(Self {
            patterns: compiled,
            case,
        })
    }

    /// A matcher with no patterns; nothing is ever excluded.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            case: CaseSensitivity::host(),
        }
    }

    /// True if any pattern matches `path`.
    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// The first pattern matching `path`, in its normalized form.
    pub fn matching_pattern(&self, path: &RelativePath) -> Option<&str> {
        if self.patterns.is_empty() {
            return None;
        }

        let folded = RelativePath::from(fold(path.as_str(), self.case));

        self.patterns
            .iter()
            .find(|pattern| match &pattern.rule {
                Rule::Literal(literal) => {
                    folded.as_str() == literal || folded.is_inside(literal)
                }
                Rule::Glob(glob) => glob.is_match(path.as_str()),
            })
            .map(|pattern| pattern.text.as_str())
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn is_wildcard(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Turn `{` and `}` outside character classes into one-character classes.
///
/// Only `*`, `?` and `[...]` are special in exclusion patterns, so braces
/// must not reach globset as alternation groups.
fn literal_braces(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut in_class = false;
    let mut class_len = 0;

    for c in pattern.chars() {
        if in_class {
            out.push(c);
            // A `]` opening the class (or right after `[!`) is a member
            let opens = class_len == 0 || (class_len == 1 && out.ends_with("!]"));
            if c == ']' && !opens {
                in_class = false;
            }
            class_len += 1;
            continue;
        }
        match c {
            '[' => {
                in_class = true;
                class_len = 0;
                out.push(c);
            }
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            _ => out.push(c),
        }
    }
    out
}

fn fold(text: &str, case: CaseSensitivity) -> String {
    match case {
        CaseSensitivity::Sensitive => text.to_string(),
        CaseSensitivity::Insensitive => text.to_lowercase(),
    }
}
