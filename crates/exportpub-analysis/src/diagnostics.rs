//! Diagnostic sinks.
//!
//! The pass reports what it decided and why through a [`DiagnosticSink`]
//! supplied by the host. Writes are synchronous and ordered; a sink never
//! fails.

use std::fmt;

use serde::Serialize;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fine-grained detail, e.g. why a declaration was not even considered.
    Trace,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Trace => write!(f, "TRACE"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A reported message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Receiver for pass diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, severity: Severity, message: &str);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, severity: Severity, message: &str) {
        (**self).report(severity, message);
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages at exactly `severity`.
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.as_str())
            .collect()
    }

    /// Whether any message at or above `severity` contains `needle`.
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity >= severity && d.message.contains(needle))
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, severity: Severity, message: &str) {
        self.diagnostics.push(Diagnostic {
            severity,
            message: message.to_string(),
        });
    }
}

/// Forwards diagnostics to `tracing` at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Trace => tracing::trace!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}
