//! # Context Paths
//!
//! Location of a diagnostic within a nested schedule document, rendered the
//! way site maintainers read it: `sessions.talks[2].speakers[0]`.
//!
//! Paths are immutable; each builder method returns a new path so a parent
//! validator can hand indexed child paths down without sharing state.

use std::fmt;

/// A rendered location inside a document. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContextPath(String);

impl ContextPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Append an object key: `a` + `b` renders as `a.b`.
    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    /// Append an array index: `a` + `2` renders as `a[2]`.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns true for the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The rendered path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The rendered path, or `None` at the root.
    pub fn to_context(&self) -> Option<String> {
        if self.is_root() {
            None
        } else {
            Some(self.0.clone())
        }
    }
}

impl fmt::Display for ContextPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("(root)")
        } else {
            f.write_str(&self.0)
        }
    }
}
