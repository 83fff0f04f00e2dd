//! Trajectory repair: interpolation, smoothing, simplification.
//!
//! All three are stateless transformers: they consume a trajectory by
//! reference and return a new one of the same length (simplification
//! excepted), preserving the frame-number sequence.

use droute_models::{Coordinate, GpsPoint, Trajectory};

/// Default simplification threshold. A degrees-equivalent small distance
/// carried over as a tunable, not a physical constant.
pub const DEFAULT_SIMPLIFY_THRESHOLD: f64 = 0.0001;

/// Fill gaps between valid points by linear interpolation.
///
/// Each maximal run of invalid points strictly between two valid anchors is
/// replaced by coordinates interpolated per axis with
/// `t = (frame - left) / (right - left)`. A trailing run with no following
/// anchor copies the last valid coordinate verbatim; a leading run with no
/// preceding anchor stays invalid.
pub fn interpolate_missing(trajectory: &Trajectory) -> Trajectory {
    let mut points = trajectory.points().to_vec();

    let valid_positions: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_valid())
        .map(|(i, _)| i)
        .collect();

    if valid_positions.is_empty() {
        return trajectory.clone();
    }

    for anchors in valid_positions.windows(2) {
        let (left, right) = (anchors[0], anchors[1]);
        if right - left < 2 {
            continue;
        }

        let left_point = points[left].clone();
        let right_point = points[right].clone();
        let left_coord = left_point.coordinate.expect("anchor is valid");
        let right_coord = right_point.coordinate.expect("anchor is valid");
        let span = (right_point.frame_number - left_point.frame_number) as f64;

        for point in &mut points[left + 1..right] {
            let t = (point.frame_number - left_point.frame_number) as f64 / span;
            let coordinate = Coordinate::new(
                left_coord.lat + (right_coord.lat - left_coord.lat) * t,
                left_coord.lon + (right_coord.lon - left_coord.lon) * t,
            );
            *point = GpsPoint::interpolated(point.frame_number, coordinate, point.timestamp);
        }
    }

    // Trailing gap: hold the last known position, no extrapolation.
    let last_valid = *valid_positions.last().expect("nonempty");
    let last_coord = points[last_valid].coordinate.expect("anchor is valid");
    for point in &mut points[last_valid + 1..] {
        *point = GpsPoint::interpolated(point.frame_number, last_coord, point.timestamp);
    }

    Trajectory::from_unordered(points)
}

/// Centered moving-average smoothing over valid points.
///
/// For each valid point, the mean of all valid coordinates within
/// `window / 2` positions (integer division) replaces it, provided the span
/// holds at least two valid samples. Everything else passes through.
pub fn smooth(trajectory: &Trajectory, window: usize) -> Trajectory {
    if window <= 1 || trajectory.len() <= 1 {
        return trajectory.clone();
    }

    let source = trajectory.points();
    let half = window / 2;
    let n = source.len();

    let points = source
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if !point.is_valid() {
                return point.clone();
            }

            let start = i.saturating_sub(half);
            let end = (i + half).min(n - 1);

            let span: Vec<Coordinate> = source[start..=end]
                .iter()
                .filter(|p| p.is_valid())
                .filter_map(|p| p.coordinate)
                .collect();

            if span.len() < 2 {
                return point.clone();
            }

            let count = span.len() as f64;
            let coordinate = Coordinate::new(
                span.iter().map(|c| c.lat).sum::<f64>() / count,
                span.iter().map(|c| c.lon).sum::<f64>() / count,
            );
            GpsPoint::smoothed(point.frame_number, coordinate, point.timestamp)
        })
        .collect();

    Trajectory::from_unordered(points)
}

/// Greedy distance-threshold simplification.
///
/// The first and last points are always kept. An interior valid point is
/// kept only when its great-circle distance from the most recently kept
/// valid point reaches `min_distance_m`; invalid points are always retained
/// to preserve gap information.
pub fn simplify(trajectory: &Trajectory, min_distance_m: f64) -> Trajectory {
    let source = trajectory.points();
    if source.len() <= 2 {
        return trajectory.clone();
    }

    let mut kept: Vec<GpsPoint> = vec![source[0].clone()];
    let mut last_kept_coord = source[0].coordinate.filter(|_| source[0].is_valid());

    for point in &source[1..source.len() - 1] {
        if !point.is_valid() {
            kept.push(point.clone());
            continue;
        }

        let coordinate = point.coordinate.expect("valid point");
        let keep = match last_kept_coord {
            None => true,
            Some(prev) => prev.haversine_distance_m(&coordinate) >= min_distance_m,
        };

        if keep {
            kept.push(point.clone());
            last_kept_coord = Some(coordinate);
        }
    }

    kept.push(source[source.len() - 1].clone());
    Trajectory::from_unordered(kept)
}
