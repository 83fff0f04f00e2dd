//! Normalized OCR crop regions.

use serde::{Deserialize, Serialize};

/// A normalized rectangle (0.0 to 1.0) locating the coordinate overlay on a
/// frame, independent of pixel dimensions. Origin is top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcrRegion {
    /// X coordinate of the top-left corner (0.0 = left, 1.0 = right)
    pub x: f64,
    /// Y coordinate of the top-left corner (0.0 = top, 1.0 = bottom)
    pub y: f64,
    /// Width of the rectangle (0.0 to 1.0)
    pub width: f64,
    /// Height of the rectangle (0.0 to 1.0)
    pub height: f64,
}

impl OcrRegion {
    /// Create a new normalized region.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the region is valid (within 0.0-1.0 range).
    pub fn is_valid(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.001 // Allow small epsilon for float precision
            && self.y + self.height <= 1.001
    }

    /// The whole frame.
    pub fn full_frame() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn top_left_quadrant() -> Self {
        Self::new(0.0, 0.0, 0.5, 0.5)
    }

    pub fn top_right_quadrant() -> Self {
        Self::new(0.5, 0.0, 0.5, 0.5)
    }

    pub fn bottom_left_quadrant() -> Self {
        Self::new(0.0, 0.5, 0.5, 0.5)
    }

    pub fn bottom_right_quadrant() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5)
    }

    /// Default region tuned for the coordinate strip most dashcams burn into
    /// the bottom of the frame.
    pub fn default_overlay() -> Self {
        Self::new(0.05, 0.85, 0.9, 0.12)
    }

    /// Look up a preset region by name.
    pub fn from_preset(name: &str) -> Option<Self> {
        match name {
            "full" => Some(Self::full_frame()),
            "top-left" => Some(Self::top_left_quadrant()),
            "top-right" => Some(Self::top_right_quadrant()),
            "bottom-left" => Some(Self::bottom_left_quadrant()),
            "bottom-right" => Some(Self::bottom_right_quadrant()),
            "overlay" => Some(Self::default_overlay()),
            _ => None,
        }
    }
}

impl Default for OcrRegion {
    fn default() -> Self {
        Self::default_overlay()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for name in ["full", "top-left", "top-right", "bottom-left", "bottom-right", "overlay"] {
            let region = OcrRegion::from_preset(name).unwrap();
            assert!(region.is_valid(), "preset {} out of range", name);
        }
        assert!(OcrRegion::from_preset("nope").is_none());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(!OcrRegion::new(-0.1, 0.0, 0.5, 0.5).is_valid());
        assert!(!OcrRegion::new(0.6, 0.0, 0.5, 0.5).is_valid());
        assert!(!OcrRegion::new(0.0, 0.0, 0.0, 0.5).is_valid());
    }
}
