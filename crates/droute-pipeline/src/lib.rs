//! Frame-to-trajectory extraction pipeline.
//!
//! This crate provides:
//! - Region cropping with origin conversion
//! - Overlay text parsing into coordinates
//! - The extraction coordinator: bounded fan-out over sampled frames with
//!   ordered reassembly
//! - Trajectory repair (interpolation, smoothing, simplification)
//! - Playback position mapping

pub mod crop;
pub mod error;
pub mod extract;
pub mod parser;
pub mod playback;
pub mod trajectory;

pub use crop::{crop_region, CropResult, PixelOrigin, PixelRect};
pub use error::{PipelineError, PipelineResult};
pub use extract::{
    DiagnosticsCallback, DiagnosticsFrame, ExtractProgressCallback, ExtractionConfig,
    ExtractionCoordinator,
};
pub use parser::parse_coordinates;
pub use playback::position_for_ratio;
pub use trajectory::{interpolate_missing, simplify, smooth, DEFAULT_SIMPLIFY_THRESHOLD};
