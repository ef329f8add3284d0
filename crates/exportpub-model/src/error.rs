//! Model error types.

/// Errors raised while reading or querying a declaration graph.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A property has neither a getter nor a backing field, so its type
    /// cannot be resolved.
    #[error("property {property} has neither a getter nor a backing field")]
    MissingPropertyType { property: String },

    /// A declaration path does not point into the graph.
    #[error("no declaration at {path}")]
    InvalidPath { path: String },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
