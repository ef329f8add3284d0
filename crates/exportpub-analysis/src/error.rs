//! Export analysis error types.
//!
//! Non-exportability is not an error; these cover malformed input only.

use exportpub_model::ModelError;

/// Errors that abort an export pass.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The declaration graph is inconsistent (e.g. an untyped property).
    #[error("malformed declaration graph: {0}")]
    Model(#[from] ModelError),

    /// An export pattern could not be compiled.
    #[error("export pattern error: {0}")]
    Glob(#[from] exportpub_glob::GlobError),
}

/// Result type alias for export analysis.
pub type Result<T> = std::result::Result<T, ExportError>;
