//! Recognition error types.

use thiserror::Error;

/// Result type for recognition operations.
pub type OcrResult<T> = Result<T, OcrError>;

/// Errors from the external recognition engine.
///
/// All of these are per-frame: the extraction coordinator absorbs them as
/// "no text found" rather than aborting a batch.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Recognition engine not found in PATH")]
    EngineNotFound,

    #[error("Recognition engine failed: {message}")]
    EngineFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    /// Create an engine failure error.
    pub fn engine_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EngineFailed {
            message: message.into(),
            stderr,
        }
    }
}
