//! Exportability analysis for cross-platform declarations.
//!
//! Decides, declaration by declaration, whether a class, function or property
//! can be exposed to a JavaScript consumer, and marks the ones that can.
//!
//! ## Modules
//!
//! - [`builtin`] — Whitelist of always-exportable standard types
//! - [`cache`] — Per-pass memo table for class and type verdicts
//! - [`evaluator`] — Recursive exportability rules
//! - [`verdict`] — Rejection reasons
//! - [`annotate`] — The export pass: gating, evaluation, marking
//! - [`diagnostics`] — Diagnostic sinks
//! - [`report`] — Pass summary

pub mod annotate;
pub mod builtin;
pub mod cache;
pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod report;
pub mod verdict;

// Re-export key types for convenience
pub use annotate::ExportPass;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use error::{ExportError, Result};
pub use evaluator::{Evaluator, EvaluatorOptions};
pub use report::PassReport;
pub use verdict::{PlatformFlag, Rejection, Verdict};
