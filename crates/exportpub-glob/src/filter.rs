//! Export filters: a set of globs, any of which selects a declaration.

use crate::error::Result;
use crate::glob::GlobMatcher;

/// A compiled list of export patterns.
///
/// An empty filter selects every name.
#[derive(Debug, Clone, Default)]
pub struct ExportFilter {
    matchers: Vec<GlobMatcher>,
}

impl ExportFilter {
    /// Compile `patterns`, skipping blank entries. Fails on the first
    /// malformed pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S], separator: char) -> Result<Self> {
        let mut matchers = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let matcher = GlobMatcher::compile(pattern, separator)?;
            tracing::debug!(pattern, regex = %matcher.regex(), "compiled export pattern");
            matchers.push(matcher);
        }
        Ok(Self { matchers })
    }

    /// A filter that selects everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Whether `name` is selected: no patterns, or any pattern matches.
    pub fn matches(&self, name: &str) -> bool {
        self.matchers.is_empty() || self.matchers.iter().any(|m| m.matches(name))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.pattern())
    }
}
