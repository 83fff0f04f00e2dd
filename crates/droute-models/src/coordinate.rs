//! Geographic coordinates and validation.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used for Haversine distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Minimum absolute magnitude for each axis of a parsed coordinate.
///
/// Overlay misreads routinely produce values like `0.00001`; filtering them
/// also rejects genuine fixes very close to the equator or prime meridian,
/// so this is a tunable heuristic, not a geographic truth.
pub const NEAR_ZERO_EPSILON: f64 = 1e-4;

/// A latitude/longitude pair in decimal degrees.
///
/// The two axes are only ever meaningful together, so the pairing is
/// structural: code that may or may not have a fix carries an
/// `Option<Coordinate>`, never two independent optionals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lon: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that both axes are within geographic range.
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Check that both axes clear the near-zero misread filter.
    pub fn clears_near_zero(&self, epsilon: f64) -> bool {
        self.lat.abs() > epsilon && self.lon.abs() > epsilon
    }

    /// Great-circle distance to `other` in meters (Haversine).
    pub fn haversine_distance_m(&self, other: &Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_check() {
        assert!(Coordinate::new(37.7749, -122.4194).in_range());
        assert!(Coordinate::new(-90.0, 180.0).in_range());
        assert!(!Coordinate::new(91.0, 0.5).in_range());
        assert!(!Coordinate::new(45.0, -180.5).in_range());
    }

    #[test]
    fn test_near_zero_filter() {
        assert!(!Coordinate::new(0.00001, 0.00002).clears_near_zero(NEAR_ZERO_EPSILON));
        assert!(!Coordinate::new(37.0, 0.00005).clears_near_zero(NEAR_ZERO_EPSILON));
        assert!(Coordinate::new(0.001, 0.001).clears_near_zero(NEAR_ZERO_EPSILON));
    }

    #[test]
    fn test_haversine_known_distance() {
        // San Francisco to Los Angeles, roughly 559 km
        let sf = Coordinate::new(37.7749, -122.4194);
        let la = Coordinate::new(34.0522, -118.2437);

        let d = sf.haversine_distance_m(&la);
        assert!((d - 559_000.0).abs() < 5_000.0, "distance was {}", d);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let p = Coordinate::new(51.5074, -0.1278);
        assert!(p.haversine_distance_m(&p) < 1e-9);
    }
}
