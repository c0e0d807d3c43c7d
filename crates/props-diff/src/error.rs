//! Error types for the diff crate.

/// Errors that can occur while reporting a comparison.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The comparison could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
