//! Playback position mapping.

use droute_models::{Coordinate, Trajectory};

/// Map a playback time to the trajectory point it corresponds to.
///
/// The index is `round((current_time / duration) * (n - 1))`, clamped to
/// the trajectory. This assumes the trajectory's cadence matches the
/// original sampling interval: it is a proportional-index mapping, not a
/// timestamp search, and silently desyncs if the sampling interval ever
/// varies.
///
/// Returns `None` when `duration <= 0`, the trajectory is empty, or the
/// mapped point has no valid fix.
pub fn position_for_ratio(
    trajectory: &Trajectory,
    current_time: f64,
    duration: f64,
) -> Option<Coordinate> {
    if duration <= 0.0 || trajectory.is_empty() {
        return None;
    }

    let n = trajectory.len();
    let ratio = current_time / duration;
    let index = (ratio * (n - 1) as f64).round();
    let index = index.clamp(0.0, (n - 1) as f64) as usize;

    let point = trajectory.get(index)?;
    if point.is_valid() {
        point.coordinate
    } else {
        None
    }
}
