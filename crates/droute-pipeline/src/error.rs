//! Pipeline error types.

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort an extraction run.
///
/// Per-frame faults (decode, recognition, parse) never appear here; they
/// are absorbed as invalid points. What remains is asset-level media
/// failures, cancellation, and worker-task loss.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Media error: {0}")]
    Media(#[from] droute_media::MediaError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Extraction worker failed: {0}")]
    Join(String),
}
