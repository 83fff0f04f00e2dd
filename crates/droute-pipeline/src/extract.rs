//! The extraction coordinator.
//!
//! Turns a batch of sampled frames into a frame-ordered trajectory: crop,
//! recognize, parse, fan out across a bounded worker pool, then restore
//! ordering with a final sort.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use droute_media::{FrameImage, SampledFrame};
use droute_models::{GpsPoint, OcrRegion, Trajectory};
use droute_ocr::{RecognitionConfig, TextCandidate, TextRecognizer};

use crate::crop::{crop_region, PixelOrigin};
use crate::error::{PipelineError, PipelineResult};
use crate::parser::parse_coordinates;

/// Snapshot handed to the diagnostics observer for one frame.
#[derive(Debug, Clone)]
pub struct DiagnosticsFrame {
    pub frame_number: u64,
    /// The full decoded frame
    pub original: FrameImage,
    /// The region that was cropped out of it
    pub region: OcrRegion,
    /// Display copy of the crop
    pub cropped: FrameImage,
}

/// Progress callback: (frames_done, total_frames).
pub type ExtractProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Best-effort diagnostics sink; see [`ExtractionCoordinator::extract`].
pub type DiagnosticsCallback = Box<dyn Fn(DiagnosticsFrame) + Send + Sync>;

/// Configuration for an extraction run.
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Where the overlay lives on the frame
    pub region: OcrRegion,
    /// Origin convention of the decoded buffers
    pub origin: PixelOrigin,
    /// Language/accuracy passed to the recognition engine
    pub recognition: RecognitionConfig,
    /// Worker pool bound
    pub max_concurrency: usize,
    /// Target number of progress updates over a whole run
    pub progress_updates: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            region: OcrRegion::default(),
            origin: PixelOrigin::TopLeft,
            recognition: RecognitionConfig::default(),
            max_concurrency: 4,
            progress_updates: 10,
        }
    }
}

/// Orchestrates crop + recognition + parsing over a batch of frames.
pub struct ExtractionCoordinator {
    recognizer: Arc<dyn TextRecognizer>,
    config: ExtractionConfig,
}

impl ExtractionCoordinator {
    /// Create a coordinator around a recognition engine.
    pub fn new(recognizer: Arc<dyn TextRecognizer>, config: ExtractionConfig) -> Self {
        Self { recognizer, config }
    }

    /// Extract a trajectory from a batch of sampled frames.
    ///
    /// Frames are processed concurrently up to the configured bound, so
    /// completion order is non-deterministic; the returned trajectory is
    /// always sorted by frame number, with exactly one point per input
    /// frame. Per-frame recognition failures become invalid points and
    /// never abort the batch.
    ///
    /// Progress is reported in chunks rather than per frame. The
    /// diagnostics observer fires for at least one frame per chunk from
    /// whichever worker happens to process it; calls are unordered and the
    /// last one seen need not be the highest frame. That race is
    /// deliberate: the observer only feeds a visual diagnostic, and
    /// serializing it would bottleneck the pool.
    pub async fn extract(
        &self,
        frames: Vec<SampledFrame>,
        progress: Option<ExtractProgressCallback>,
        diagnostics: Option<DiagnosticsCallback>,
        cancel_rx: Option<watch::Receiver<bool>>,
    ) -> PipelineResult<Trajectory> {
        let total = frames.len() as u64;
        if total == 0 {
            return Ok(Trajectory::new());
        }

        let chunk = (total / self.config.progress_updates.max(1)).max(1);
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let done = Arc::new(AtomicU64::new(0));
        let progress = progress.map(Arc::new);
        let diagnostics = diagnostics.map(Arc::new);

        info!(
            total_frames = total,
            max_concurrency = self.config.max_concurrency,
            "Starting OCR extraction"
        );

        let mut join_set: JoinSet<GpsPoint> = JoinSet::new();

        for frame in frames {
            if let Some(ref cancel_rx) = cancel_rx {
                if *cancel_rx.borrow() {
                    info!("Extraction cancelled, discarding partial batch");
                    return Err(PipelineError::Cancelled);
                }
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| PipelineError::Join(e.to_string()))?;

            let recognizer = Arc::clone(&self.recognizer);
            let config = self.config.clone();
            let done = Arc::clone(&done);
            let progress = progress.clone();
            let diagnostics = diagnostics.clone();

            join_set.spawn(async move {
                let _permit = permit;

                let want_diagnostics =
                    diagnostics.is_some() && frame.index % chunk == 0;
                let (point, snapshot) =
                    process_frame(&*recognizer, &config, &frame, want_diagnostics).await;
                if let (Some(diagnostics), Some(snapshot)) = (diagnostics, snapshot) {
                    (*diagnostics)(snapshot);
                }

                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if finished % chunk == 0 || finished == total {
                    if let Some(progress) = progress {
                        (*progress)(finished, total);
                    }
                }

                point
            });
        }

        let mut points = Vec::with_capacity(total as usize);
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(point) => points.push(point),
                Err(e) => return Err(PipelineError::Join(e.to_string())),
            }
        }

        // Completion order is arbitrary; restore the ordering invariant.
        let trajectory = Trajectory::from_unordered(points);
        info!(
            valid = trajectory.valid_count(),
            total = trajectory.len(),
            "OCR extraction finished"
        );
        Ok(trajectory)
    }
}

/// Process one frame into a GPS point, optionally capturing a diagnostics
/// snapshot.
async fn process_frame(
    recognizer: &dyn TextRecognizer,
    config: &ExtractionConfig,
    frame: &SampledFrame,
    want_diagnostics: bool,
) -> (GpsPoint, Option<DiagnosticsFrame>) {
    let Some(crop) = crop_region(&frame.image, &config.region, config.origin) else {
        // Sentinel frame from a failed decode
        return (GpsPoint::invalid(frame.index, frame.timestamp), None);
    };

    let snapshot = want_diagnostics.then(|| DiagnosticsFrame {
        frame_number: frame.index,
        original: frame.image.clone(),
        region: config.region,
        cropped: crop.display.clone(),
    });

    let candidates = match recognizer.recognize(&crop.ocr, &config.recognition).await {
        Ok(candidates) => candidates,
        Err(err) => {
            // Recognition faults are per-frame: treated as "no text found".
            warn!(frame = frame.index, "Recognition failed: {}", err);
            Vec::new()
        }
    };

    let coordinate = first_parsed(&candidates);
    if coordinate.is_none() {
        debug!(frame = frame.index, "No coordinate in {} candidates", candidates.len());
    }

    (
        GpsPoint::ocr(frame.index, coordinate, frame.timestamp),
        snapshot,
    )
}

/// Run the parser over ranked candidates, keeping the first success.
fn first_parsed(candidates: &[TextCandidate]) -> Option<droute_models::Coordinate> {
    candidates
        .iter()
        .find_map(|candidate| parse_coordinates(&candidate.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use droute_ocr::{OcrError, OcrResult};
    use std::sync::Mutex;

    /// Recognizer that reads the coordinate back out of the frame's first
    /// red byte, so each frame deterministically yields its own fix.
    struct PixelEchoRecognizer;

    #[async_trait]
    impl TextRecognizer for PixelEchoRecognizer {
        async fn recognize(
            &self,
            image: &FrameImage,
            _config: &RecognitionConfig,
        ) -> OcrResult<Vec<TextCandidate>> {
            let marker = image.data[0];
            Ok(vec![TextCandidate {
                text: format!("{}.5, {}.25", marker, marker),
                confidence: 0.9,
            }])
        }
    }

    /// Recognizer that always fails.
    struct BrokenRecognizer;

    #[async_trait]
    impl TextRecognizer for BrokenRecognizer {
        async fn recognize(
            &self,
            _image: &FrameImage,
            _config: &RecognitionConfig,
        ) -> OcrResult<Vec<TextCandidate>> {
            Err(OcrError::engine_failed("engine crashed", None))
        }
    }

    fn marker_frames(count: u64) -> Vec<SampledFrame> {
        (0..count)
            .map(|index| SampledFrame {
                index,
                timestamp: index as f64 / 30.0,
                image: FrameImage::new(1, 1, vec![index as u8, 0, 0, 255]),
            })
            .collect()
    }

    fn config() -> ExtractionConfig {
        ExtractionConfig {
            region: OcrRegion::full_frame(),
            max_concurrency: 4,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_output_is_frame_ordered_without_gaps() {
        let coordinator = ExtractionCoordinator::new(Arc::new(PixelEchoRecognizer), config());

        let trajectory = coordinator
            .extract(marker_frames(25), None, None, None)
            .await
            .unwrap();

        assert_eq!(trajectory.len(), 25);
        let frames: Vec<u64> = trajectory.iter().map(|p| p.frame_number).collect();
        assert_eq!(frames, (0..25).collect::<Vec<u64>>());

        // Every frame parsed its own marker coordinate
        for point in &trajectory {
            let coordinate = point.coordinate.unwrap();
            assert_eq!(coordinate.lat, point.frame_number as f64 + 0.5);
            assert_eq!(coordinate.lon, point.frame_number as f64 + 0.25);
        }
    }

    #[tokio::test]
    async fn test_recognition_failures_become_invalid_points() {
        let coordinator = ExtractionCoordinator::new(Arc::new(BrokenRecognizer), config());

        let trajectory = coordinator
            .extract(marker_frames(6), None, None, None)
            .await
            .unwrap();

        assert_eq!(trajectory.len(), 6);
        assert_eq!(trajectory.valid_count(), 0);
        for point in &trajectory {
            assert_eq!(point.method, droute_models::ExtractionMethod::Ocr);
        }
    }

    #[tokio::test]
    async fn test_sentinel_frames_become_invalid_points() {
        let mut frames = marker_frames(4);
        frames[2].image = FrameImage::empty();

        let coordinator = ExtractionCoordinator::new(Arc::new(PixelEchoRecognizer), config());
        let trajectory = coordinator.extract(frames, None, None, None).await.unwrap();

        assert_eq!(trajectory.valid_count(), 3);
        assert!(!trajectory.get(2).unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_progress_and_diagnostics_fire() {
        let coordinator = ExtractionCoordinator::new(Arc::new(PixelEchoRecognizer), config());

        let updates = Arc::new(Mutex::new(Vec::new()));
        let updates_ref = Arc::clone(&updates);
        let diagnosed = Arc::new(Mutex::new(Vec::new()));
        let diagnosed_ref = Arc::clone(&diagnosed);

        coordinator
            .extract(
                marker_frames(20),
                Some(Box::new(move |done, total| {
                    updates_ref.lock().unwrap().push((done, total));
                })),
                Some(Box::new(move |frame: DiagnosticsFrame| {
                    diagnosed_ref.lock().unwrap().push(frame.frame_number);
                })),
                None,
            )
            .await
            .unwrap();

        let updates = updates.lock().unwrap();
        assert!(!updates.is_empty());
        assert!(updates.iter().any(|&(done, total)| done == total));

        // At least one diagnostics snapshot per chunk, unordered
        assert!(!diagnosed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_discards_batch() {
        let coordinator = ExtractionCoordinator::new(Arc::new(PixelEchoRecognizer), config());

        let (tx, rx) = watch::channel(true);
        let result = coordinator
            .extract(marker_frames(10), None, None, Some(rx))
            .await;
        drop(tx);

        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let coordinator = ExtractionCoordinator::new(Arc::new(PixelEchoRecognizer), config());
        let trajectory = coordinator.extract(Vec::new(), None, None, None).await.unwrap();
        assert!(trajectory.is_empty());
    }
}
