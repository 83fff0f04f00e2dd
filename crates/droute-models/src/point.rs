//! Per-frame GPS points.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coordinate::Coordinate;

/// How a point's coordinates were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Read from the on-screen overlay by text recognition
    Ocr,
    /// Filled in from neighboring valid points
    Interpolation,
    /// Replaced by a centered moving average
    Smoothing,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Ocr => "ocr",
            ExtractionMethod::Interpolation => "interpolation",
            ExtractionMethod::Smoothing => "smoothing",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sampled frame's GPS fix, or the absence of one.
///
/// Validity is always derived from the coordinate value via [`is_valid`],
/// never stored, so it cannot drift from the actual coordinates.
///
/// [`is_valid`]: GpsPoint::is_valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    /// Sampling index of the frame this point was read from
    pub frame_number: u64,
    /// The fix, if one was obtained for this frame
    pub coordinate: Option<Coordinate>,
    /// Seconds from the start of the video
    pub timestamp: f64,
    /// How the coordinates were produced
    pub method: ExtractionMethod,
}

impl GpsPoint {
    /// Create a point read (or not read) from the overlay.
    pub fn ocr(frame_number: u64, coordinate: Option<Coordinate>, timestamp: f64) -> Self {
        Self {
            frame_number,
            coordinate,
            timestamp,
            method: ExtractionMethod::Ocr,
        }
    }

    /// Create an invalid placeholder for a frame that yielded no fix.
    pub fn invalid(frame_number: u64, timestamp: f64) -> Self {
        Self::ocr(frame_number, None, timestamp)
    }

    /// Create an interpolated point.
    pub fn interpolated(frame_number: u64, coordinate: Coordinate, timestamp: f64) -> Self {
        Self {
            frame_number,
            coordinate: Some(coordinate),
            timestamp,
            method: ExtractionMethod::Interpolation,
        }
    }

    /// Create a smoothed point.
    pub fn smoothed(frame_number: u64, coordinate: Coordinate, timestamp: f64) -> Self {
        Self {
            frame_number,
            coordinate: Some(coordinate),
            timestamp,
            method: ExtractionMethod::Smoothing,
        }
    }

    /// Whether this point carries a coordinate within geographic range.
    pub fn is_valid(&self) -> bool {
        self.coordinate.map(|c| c.in_range()).unwrap_or(false)
    }
}
