//! Video items and the extraction status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::trajectory::Trajectory;

/// Unique identifier for a video processing run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extraction status for one video.
///
/// Transitions run `Pending -> Extracting -> {Completed | Failed | Error}`,
/// one per processing run; a started video never returns to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Not yet processed
    #[default]
    Pending,
    /// Extraction run in progress
    Extracting,
    /// Extraction produced at least one valid point
    Completed,
    /// Extraction ran but produced zero valid points
    Failed,
    /// Extraction itself failed (asset unreadable, no video track)
    Error,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Pending => "pending",
            ExtractionStatus::Extracting => "extracting",
            ExtractionStatus::Completed => "completed",
            ExtractionStatus::Failed => "failed",
            ExtractionStatus::Error => "error",
        }
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One source video and the trajectory extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoItem {
    /// Unique item ID
    pub id: VideoId,

    /// Path to the source video file
    pub source: PathBuf,

    /// Display name (source file name)
    pub name: String,

    /// Extracted trajectory, one point per sampled frame
    #[serde(default)]
    pub trajectory: Trajectory,

    /// Processing status
    #[serde(default)]
    pub status: ExtractionStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Error message (if status is `Error`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl VideoItem {
    /// Create a new pending item for a source file.
    pub fn new(source: impl AsRef<Path>) -> Self {
        let source = source.as_ref().to_path_buf();
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source.to_string_lossy().to_string());
        let now = Utc::now();

        Self {
            id: VideoId::new(),
            source,
            name,
            trajectory: Trajectory::new(),
            status: ExtractionStatus::Pending,
            created_at: now,
            updated_at: now,
            error_message: None,
        }
    }

    /// Mark extraction as started.
    pub fn start(mut self) -> Self {
        self.status = ExtractionStatus::Extracting;
        self.updated_at = Utc::now();
        self
    }

    /// Record the processed trajectory and mark the run finished.
    ///
    /// The outcome is `Completed` when at least one valid point survived
    /// processing and `Failed` otherwise, the two being distinct
    /// non-error results.
    pub fn finish(mut self, trajectory: Trajectory) -> Self {
        self.status = if trajectory.valid_count() > 0 {
            ExtractionStatus::Completed
        } else {
            ExtractionStatus::Failed
        };
        self.trajectory = trajectory;
        self.updated_at = Utc::now();
        self
    }

    /// Mark the run as errored; the trajectory is discarded.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.status = ExtractionStatus::Error;
        self.trajectory.clear();
        self.error_message = Some(message.into());
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::point::GpsPoint;

    #[test]
    fn test_video_id_generation() {
        let id1 = VideoId::new();
        let id2 = VideoId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_item_is_pending() {
        let item = VideoItem::new("/videos/drive.mp4");
        assert_eq!(item.status, ExtractionStatus::Pending);
        assert_eq!(item.name, "drive.mp4");
        assert!(item.trajectory.is_empty());
    }

    #[test]
    fn test_finish_with_valid_points_completes() {
        let trajectory: Trajectory =
            vec![GpsPoint::ocr(0, Some(Coordinate::new(37.0, -122.0)), 0.0)]
                .into_iter()
                .collect();

        let item = VideoItem::new("/videos/drive.mp4").start().finish(trajectory);
        assert_eq!(item.status, ExtractionStatus::Completed);
        assert_eq!(item.trajectory.valid_count(), 1);
    }

    #[test]
    fn test_finish_without_valid_points_fails() {
        let trajectory: Trajectory = vec![GpsPoint::invalid(0, 0.0), GpsPoint::invalid(1, 0.033)]
            .into_iter()
            .collect();

        let item = VideoItem::new("/videos/drive.mp4").start().finish(trajectory);
        assert_eq!(item.status, ExtractionStatus::Failed);
        assert_eq!(item.trajectory.len(), 2);
    }

    #[test]
    fn test_error_discards_trajectory() {
        let mut item = VideoItem::new("/videos/drive.mp4").start();
        item.trajectory = vec![GpsPoint::ocr(0, Some(Coordinate::new(1.0, 1.0)), 0.0)]
            .into_iter()
            .collect();

        let item = item.error("no video track");
        assert_eq!(item.status, ExtractionStatus::Error);
        assert!(item.trajectory.is_empty());
        assert_eq!(item.error_message.as_deref(), Some("no video track"));
    }
}
