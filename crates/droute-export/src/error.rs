//! Export error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that fail an export call.
///
/// Both are fatal for the call; the atomic write protocol guarantees
/// nothing partial is left at the destination.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed for {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Create a write failure error.
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }
}
