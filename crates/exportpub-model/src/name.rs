//! Dot-separated qualified names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fully qualified declaration name such as `com.example.Foo.bar`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment (`bar` for `com.example.Foo.bar`).
    pub fn short_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Everything before the last segment, if there is more than one.
    pub fn parent(&self) -> Option<QualifiedName> {
        self.0.rfind('.').map(|idx| Self(self.0[..idx].to_string()))
    }

    /// Append a segment.
    pub fn child(&self, segment: &str) -> QualifiedName {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}.{segment}", self.0))
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self(s)
    }
}
