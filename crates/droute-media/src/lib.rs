//! FFmpeg CLI wrapper for frame sampling.
//!
//! This crate provides:
//! - Source validation and metadata via FFprobe
//! - Single-frame RGBA decoding at fixed time offsets
//! - The frame sampler: a finite sequence of (index, image) pairs at a
//!   fixed temporal interval, with progress, preview and cancellation

pub mod decode;
pub mod error;
pub mod frame;
pub mod probe;
pub mod sampler;

pub use decode::decode_frame_rgba;
pub use error::{MediaError, MediaResult};
pub use frame::{FrameImage, SampledFrame};
pub use probe::{probe_video, VideoInfo};
pub use sampler::{FramePreviewCallback, FrameSampler, SampleProgressCallback};
