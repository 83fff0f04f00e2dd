//! The recognition seam.

use async_trait::async_trait;
use droute_media::FrameImage;

use crate::error::OcrResult;

/// Recognition accuracy mode, mapped by each engine to its own knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionAccuracy {
    /// Favor throughput over quality
    Fast,
    /// Favor quality over throughput
    #[default]
    Accurate,
}

/// Language and accuracy configuration for a recognition call.
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// Engine language identifier (e.g., "eng")
    pub language: String,
    /// Accuracy mode
    pub accuracy: RecognitionAccuracy,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            accuracy: RecognitionAccuracy::Accurate,
        }
    }
}

/// One recognized text candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCandidate {
    /// Recognized text
    pub text: String,
    /// Engine confidence, 0.0 to 1.0
    pub confidence: f32,
}

/// External text-recognition capability.
///
/// Implementations return candidates ranked best-first; an empty list means
/// no text was found, which is not an error.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in an image.
    async fn recognize(
        &self,
        image: &FrameImage,
        config: &RecognitionConfig,
    ) -> OcrResult<Vec<TextCandidate>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RecognitionConfig::default();
        assert_eq!(config.language, "eng");
        assert_eq!(config.accuracy, RecognitionAccuracy::Accurate);
    }
}
