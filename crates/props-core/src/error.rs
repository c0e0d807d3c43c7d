//! Error types for loading and persisting properties files.

use std::path::PathBuf;

/// Failures that can occur around the properties engine.
///
/// The engine itself never hands back a partially populated table: any of
/// these variants means "no properties" to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PropsError {
    /// The input file does not exist or is not a regular file.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input could not be decoded as UTF-8 text.
    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The input parsed but yielded zero keys.
    #[error("no properties found in: {}", .0.display())]
    EmptyResult(PathBuf),

    /// The output could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PropsError {
    /// Whether this error means the table is absent or empty, as opposed to
    /// an output-side failure.
    pub fn is_no_properties(&self) -> bool {
        !matches!(self, PropsError::Write { .. })
    }
}

/// Convenience alias for results in this crate.
pub type PropsResult<T> = Result<T, PropsError>;
