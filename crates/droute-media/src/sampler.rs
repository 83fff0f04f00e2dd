//! Frame sampling at a fixed temporal interval.

use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::decode::decode_frame_rgba;
use crate::error::{MediaError, MediaResult};
use crate::frame::{FrameImage, SampledFrame};
use crate::probe::probe_video;

/// Callback invoked after each sampled frame with (frames_done, total_frames).
pub type SampleProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Observer handed the most recently decoded image at a throttled cadence.
pub type FramePreviewCallback = Box<dyn Fn(&FrameImage) + Send + Sync>;

/// Default sampling interval: one frame per 1/30 s of video.
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0 / 30.0;

/// Samples a video into a finite sequence of (index, image) pairs, one per
/// `interval_secs` of duration.
///
/// The source is validated up front (readable, has a video track); those
/// failures are fatal. A single frame failing to decode is not: its slot is
/// filled with the empty sentinel and sampling continues.
pub struct FrameSampler {
    source: PathBuf,
    interval_secs: f64,
    preview_every: u64,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl FrameSampler {
    /// Create a sampler for a source file.
    pub fn new(source: impl AsRef<Path>, interval_secs: f64) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            interval_secs,
            preview_every: 30,
            cancel_rx: None,
        }
    }

    /// Set how often the preview observer fires (every Nth frame).
    pub fn with_preview_every(mut self, preview_every: u64) -> Self {
        self.preview_every = preview_every.max(1);
        self
    }

    /// Set cancellation signal, checked between frames.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Number of frames sampled from `duration_secs` at `interval_secs`.
    pub fn total_frames(duration_secs: f64, interval_secs: f64) -> u64 {
        if interval_secs <= 0.0 || duration_secs <= 0.0 {
            return 0;
        }
        (duration_secs * (1.0 / interval_secs)).floor() as u64
    }

    /// Sample the whole video, buffering every frame.
    ///
    /// Memory is bounded by video length times frame size; the buffered
    /// batch is what the extraction fan-out consumes.
    pub async fn run(
        &self,
        progress: Option<SampleProgressCallback>,
        preview: Option<FramePreviewCallback>,
    ) -> MediaResult<Vec<SampledFrame>> {
        let info = probe_video(&self.source).await?;
        let total = Self::total_frames(info.duration, self.interval_secs);

        info!(
            source = %self.source.display(),
            duration = info.duration,
            total_frames = total,
            "Sampling frames every {:.4}s",
            self.interval_secs
        );

        let mut frames = Vec::with_capacity(total as usize);
        let mut last_decoded: Option<usize> = None;

        for index in 0..total {
            if let Some(ref cancel_rx) = self.cancel_rx {
                if *cancel_rx.borrow() {
                    info!("Frame sampling cancelled at frame {}/{}", index, total);
                    return Err(MediaError::Cancelled);
                }
            }

            let timestamp = index as f64 * self.interval_secs;
            let image = match decode_frame_rgba(&self.source, timestamp, info.width, info.height)
                .await
            {
                Ok(image) => {
                    last_decoded = Some(frames.len());
                    image
                }
                Err(err) => {
                    // Per-frame failure is absorbed; the slot keeps its index.
                    warn!(frame = index, "Frame decode failed, using sentinel: {}", err);
                    FrameImage::empty()
                }
            };

            frames.push(SampledFrame {
                index,
                timestamp,
                image,
            });

            if let Some(ref progress) = progress {
                progress(index + 1, total);
            }

            let at_cadence = index % self.preview_every == 0 || index + 1 == total;
            if at_cadence {
                if let (Some(preview), Some(i)) = (&preview, last_decoded) {
                    preview(&frames[i].image);
                }
            }
        }

        Ok(frames)
    }
}
