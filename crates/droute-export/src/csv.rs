//! CSV route export.

use std::path::Path;
use tracing::info;

use droute_models::VideoItem;

use crate::error::ExportResult;
use crate::write::write_atomic;

const HEADER: &str =
    "filename,frame_number,latitude,longitude,extraction_status,extraction_method,timestamp";

/// Build CSV rows for a batch of videos.
///
/// One row per sampled frame, valid or not; a video with an empty
/// trajectory still emits a single placeholder row so its status is
/// visible in the output.
pub fn build_csv(items: &[VideoItem]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for item in items {
        let filename = quote(&item.name);
        let status = item.status.as_str();

        if item.trajectory.is_empty() {
            out.push_str(&format!("{},0,,,{},,\n", filename, status));
            continue;
        }

        for point in &item.trajectory {
            let (lat, lon) = match point.coordinate.filter(|_| point.is_valid()) {
                Some(c) => (c.lat.to_string(), c.lon.to_string()),
                None => (String::new(), String::new()),
            };

            out.push_str(&format!(
                "{},{},{},{},{},{},{:.3}\n",
                filename,
                point.frame_number,
                lat,
                lon,
                status,
                point.method.as_str(),
                point.timestamp
            ));
        }
    }

    out
}

/// Quote a free-text field, doubling embedded quote characters.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Serialize a batch of videos to a CSV file, atomically.
pub async fn export_csv(path: impl AsRef<Path>, items: &[VideoItem]) -> ExportResult<()> {
    let path = path.as_ref();
    let csv = build_csv(items);

    write_atomic(path, csv.as_bytes()).await?;
    info!(videos = items.len(), "Exported CSV to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use droute_models::{Coordinate, GpsPoint, Trajectory, VideoItem};

    fn item(name_path: &str, points: Vec<GpsPoint>) -> VideoItem {
        let trajectory: Trajectory = points.into_iter().collect();
        VideoItem::new(name_path).start().finish(trajectory)
    }

    #[test]
    fn test_one_row_per_sampled_frame() {
        let item = item(
            "/videos/drive.mp4",
            vec![
                GpsPoint::ocr(0, Some(Coordinate::new(37.7749, -122.4194)), 0.0),
                GpsPoint::invalid(1, 0.033),
            ],
        );

        let csv = build_csv(&[item]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(
            lines[1],
            "\"drive.mp4\",0,37.7749,-122.4194,completed,ocr,0.000"
        );
        // Invalid frame keeps its row with empty coordinates
        assert_eq!(lines[2], "\"drive.mp4\",1,,,completed,ocr,0.033");
    }

    #[test]
    fn test_empty_trajectory_placeholder_row() {
        let item = VideoItem::new("/videos/noise.mp4").start().error("no video track");

        let csv = build_csv(&[item]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "\"noise.mp4\",0,,,error,,");
    }

    #[test]
    fn test_embedded_quotes_doubled() {
        let item = item(
            "/videos/my \"road\" trip.mp4",
            vec![GpsPoint::ocr(0, Some(Coordinate::new(1.5, 2.5)), 0.0)],
        );

        let csv = build_csv(&[item]);
        assert!(csv.contains("\"my \"\"road\"\" trip.mp4\""));
    }

    #[test]
    fn test_methods_appear_per_point() {
        let item = item(
            "/videos/drive.mp4",
            vec![
                GpsPoint::ocr(0, Some(Coordinate::new(1.0, 1.0)), 0.0),
                GpsPoint::interpolated(1, Coordinate::new(1.5, 1.5), 0.033),
                GpsPoint::smoothed(2, Coordinate::new(2.0, 2.0), 0.066),
            ],
        );

        let csv = build_csv(&[item]);
        assert!(csv.contains(",ocr,"));
        assert!(csv.contains(",interpolation,"));
        assert!(csv.contains(",smoothing,"));
    }
}
