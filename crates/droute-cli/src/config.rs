//! Run configuration.

use droute_models::OcrRegion;
use droute_ocr::RecognitionAccuracy;

/// Configuration for one extraction run.
///
/// Defaults come from the environment (`DROUTE_*` variables); CLI flags
/// override them.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Sampling interval in seconds
    pub interval_secs: f64,
    /// Where the overlay lives on the frame
    pub region: OcrRegion,
    /// Recognition language
    pub language: String,
    /// Recognition accuracy mode
    pub accuracy: RecognitionAccuracy,
    /// OCR worker pool bound
    pub max_concurrency: usize,
    /// Smoothing window size; 0 or 1 disables smoothing
    pub smooth_window: usize,
    /// Optional simplification threshold in meters
    pub simplify_threshold: Option<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            interval_secs: droute_media::sampler::DEFAULT_INTERVAL_SECS,
            region: OcrRegion::default(),
            language: "eng".to_string(),
            accuracy: RecognitionAccuracy::Accurate,
            max_concurrency: 4,
            smooth_window: 5,
            simplify_threshold: None,
        }
    }
}

impl RunConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            interval_secs: std::env::var("DROUTE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.interval_secs),
            region: std::env::var("DROUTE_REGION")
                .ok()
                .and_then(|s| parse_region(&s))
                .unwrap_or(defaults.region),
            language: std::env::var("DROUTE_OCR_LANGUAGE").unwrap_or(defaults.language),
            accuracy: defaults.accuracy,
            max_concurrency: std::env::var("DROUTE_MAX_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrency),
            smooth_window: std::env::var("DROUTE_SMOOTH_WINDOW")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.smooth_window),
            simplify_threshold: std::env::var("DROUTE_SIMPLIFY_METERS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }
}

/// Parse a region argument: a preset name or `x,y,w,h` normalized values.
pub fn parse_region(s: &str) -> Option<OcrRegion> {
    if let Some(preset) = OcrRegion::from_preset(s) {
        return Some(preset);
    }

    let parts: Vec<f64> = s
        .split(',')
        .map(str::trim)
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    match parts[..] {
        [x, y, w, h] => {
            let region = OcrRegion::new(x, y, w, h);
            region.is_valid().then_some(region)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region_preset() {
        assert_eq!(parse_region("full"), Some(OcrRegion::full_frame()));
        assert_eq!(parse_region("overlay"), Some(OcrRegion::default_overlay()));
    }

    #[test]
    fn test_parse_region_numeric() {
        let region = parse_region("0.1, 0.8, 0.8, 0.15").unwrap();
        assert_eq!(region, OcrRegion::new(0.1, 0.8, 0.8, 0.15));
    }

    #[test]
    fn test_parse_region_rejects_garbage() {
        assert!(parse_region("nope").is_none());
        assert!(parse_region("0.1,0.2,0.3").is_none());
        assert!(parse_region("0.9,0.9,0.5,0.5").is_none()); // outside the frame
    }

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.language, "eng");
        assert_eq!(config.smooth_window, 5);
        assert!(config.simplify_threshold.is_none());
    }
}
