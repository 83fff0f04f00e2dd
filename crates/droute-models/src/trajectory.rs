//! Frame-indexed trajectories.

use serde::{Deserialize, Serialize};

use crate::point::GpsPoint;

/// Ordered sequence of GPS points for one video, indexed by frame number.
///
/// Frame numbers increase strictly and every sampled frame has exactly one
/// entry; a gap in the track is represented by an invalid point occupying
/// its frame slot, never by omission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    points: Vec<GpsPoint>,
}

impl Trajectory {
    /// Create an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trajectory from points in arbitrary order.
    ///
    /// Points are sorted by frame number, restoring the ordering invariant
    /// regardless of the completion order they were produced in.
    pub fn from_unordered(mut points: Vec<GpsPoint>) -> Self {
        points.sort_by_key(|p| p.frame_number);
        Self { points }
    }

    /// Number of points (one per sampled frame).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points with a valid fix.
    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_valid()).count()
    }

    /// Borrow the points in frame order.
    pub fn points(&self) -> &[GpsPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&GpsPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GpsPoint> {
        self.points.iter()
    }

    /// Consume the trajectory, yielding its points in frame order.
    pub fn into_points(self) -> Vec<GpsPoint> {
        self.points
    }

    /// Discard all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl FromIterator<GpsPoint> for Trajectory {
    fn from_iter<I: IntoIterator<Item = GpsPoint>>(iter: I) -> Self {
        Self::from_unordered(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a GpsPoint;
    type IntoIter = std::slice::Iter<'a, GpsPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
