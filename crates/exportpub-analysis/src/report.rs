//! Summary of one export pass.

use std::fmt;

use exportpub_model::Visibility;
use serde::Serialize;

use crate::cache::MemoStats;
use crate::verdict::{PlatformFlag, Rejection};

/// Why a declaration never reached the structural check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum SkipReason {
    /// No export pattern matched the qualified name.
    Filtered,
    NotPublic(Visibility),
    Platform(PlatformFlag),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Filtered => write!(f, "no export pattern matches"),
            SkipReason::NotPublic(visibility) => write!(f, "{visibility} visibility"),
            SkipReason::Platform(flag) => write!(f, "{flag}"),
        }
    }
}

/// A declaration the evaluator turned down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedDeclaration {
    pub name: String,
    pub kind: &'static str,
    pub reason: Rejection,
}

/// A declaration left alone by the gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDeclaration {
    pub name: String,
    pub kind: &'static str,
    pub reason: SkipReason,
}

/// Everything an export pass decided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub module: String,
    /// Newly marked declarations, in traversal order.
    pub exported: Vec<String>,
    pub already_exported: Vec<String>,
    pub rejected: Vec<RejectedDeclaration>,
    pub skipped: Vec<SkippedDeclaration>,
    /// Exported signatures carrying collection types, which need a runtime
    /// conversion on the JavaScript side.
    pub needs_conversion: Vec<String>,
    pub memo: MemoStats,
}

impl PassReport {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.exported.iter().any(|n| n == name)
    }

    pub fn rejection_of(&self, name: &str) -> Option<&Rejection> {
        self.rejected
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.reason)
    }

    pub fn skip_reason_of(&self, name: &str) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.reason)
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Export Report ({}) ===", self.module)?;
        writeln!(
            f,
            "Exported: {} | Already exported: {} | Rejected: {} | Skipped: {}",
            self.exported.len(),
            self.already_exported.len(),
            self.rejected.len(),
            self.skipped.len(),
        )?;
        writeln!(
            f,
            "Memo: {} entries, {} hits ({} provisional), {} misses, {} deferred",
            self.memo.entries,
            self.memo.hits,
            self.memo.provisional,
            self.memo.misses,
            self.memo.deferred,
        )?;

        if !self.exported.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Exported ---")?;
            for name in &self.exported {
                writeln!(f, "  {name}")?;
            }
        }

        if !self.needs_conversion.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Needs conversion ---")?;
            for site in &self.needs_conversion {
                writeln!(f, "  {site}")?;
            }
        }

        if !self.rejected.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Rejected ---")?;
            for r in &self.rejected {
                writeln!(f, "  [{}] {}: {}", r.kind, r.name, r.reason)?;
            }
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Skipped ---")?;
            for s in &self.skipped {
                writeln!(f, "  [{}] {}: {}", s.kind, s.name, s.reason)?;
            }
        }

        Ok(())
    }
}
