//! Per-video processing run.

use std::sync::Arc;
use tracing::{debug, info, warn};

use droute_media::FrameSampler;
use droute_models::VideoItem;
use droute_ocr::{RecognitionConfig, TextRecognizer};
use droute_pipeline::{
    interpolate_missing, simplify, smooth, ExtractionConfig, ExtractionCoordinator, PixelOrigin,
};

use crate::config::RunConfig;

/// Run the full pipeline for one video: sample, extract, repair.
///
/// Asset-level failures (unreadable source, no video track) end the run
/// for this item only, with the error recorded on it; they never abort a
/// batch. The returned item is `Completed`, `Failed` or `Error`.
pub async fn process_video(
    item: VideoItem,
    config: &RunConfig,
    recognizer: Arc<dyn TextRecognizer>,
) -> VideoItem {
    let item = item.start();
    info!(video = %item.name, "Starting extraction");

    let sampler = FrameSampler::new(&item.source, config.interval_secs);
    let frames = match sampler
        .run(
            Some(Box::new(|done, total| {
                debug!("Sampled frame {}/{}", done, total);
            })),
            None,
        )
        .await
    {
        Ok(frames) => frames,
        Err(err) => {
            warn!(video = %item.name, "Extraction failed: {}", err);
            return item.error(err.to_string());
        }
    };

    let coordinator = ExtractionCoordinator::new(
        recognizer,
        ExtractionConfig {
            region: config.region,
            origin: PixelOrigin::TopLeft,
            recognition: RecognitionConfig {
                language: config.language.clone(),
                accuracy: config.accuracy,
            },
            max_concurrency: config.max_concurrency,
            ..Default::default()
        },
    );

    let name = item.name.clone();
    let trajectory = match coordinator
        .extract(
            frames,
            Some(Box::new(move |done, total| {
                info!(video = %name, "Recognized {}/{} frames", done, total);
            })),
            None,
            None,
        )
        .await
    {
        Ok(trajectory) => trajectory,
        Err(err) => {
            warn!(video = %item.name, "Extraction failed: {}", err);
            return item.error(err.to_string());
        }
    };

    // Repair order: interpolate gaps first, then smooth the valid runs.
    let mut trajectory = interpolate_missing(&trajectory);
    if config.smooth_window > 1 {
        trajectory = smooth(&trajectory, config.smooth_window);
    }
    if let Some(threshold) = config.simplify_threshold {
        trajectory = simplify(&trajectory, threshold);
    }

    let item = item.finish(trajectory);
    info!(
        video = %item.name,
        status = %item.status,
        valid = item.trajectory.valid_count(),
        frames = item.trajectory.len(),
        "Extraction finished"
    );
    item
}
