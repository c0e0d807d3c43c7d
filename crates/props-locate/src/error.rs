//! Error types for key lookups.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("search tool not available: {0}")]
    ToolNotFound(String),

    #[error("failed to run search for {key}: {source}")]
    Spawn {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("search for {key} timed out after {timeout:?}")]
    Timeout { key: String, timeout: Duration },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LocateResult<T> = Result<T, LocateError>;
