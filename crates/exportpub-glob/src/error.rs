//! Glob error types.

/// Errors raised when compiling glob patterns.
#[derive(Debug, thiserror::Error)]
pub enum GlobError {
    /// The translated pattern is not a valid regular expression, e.g. an
    /// unclosed `[` or `{`.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type alias for glob operations.
pub type Result<T> = std::result::Result<T, GlobError>;
