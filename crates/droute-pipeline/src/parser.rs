//! Overlay text parsing.
//!
//! Pure text-to-coordinate extraction. Three grammars are tried in fixed
//! priority order; the first one that yields a pair surviving validation
//! wins. There is no voting across grammars or candidates.

use regex::Regex;
use std::sync::LazyLock;

use droute_models::{Coordinate, NEAR_ZERO_EPSILON};

/// `<signed-decimal>, <signed-decimal>` read directly as (lat, lon).
static PLAIN_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([-+]?\d{1,3}(?:\.\d+)?)\s*,\s*([-+]?\d{1,3}(?:\.\d+)?)").unwrap()
});

/// `<decimal>[°] N|S, <decimal>[°] E|W`; S and W negate the magnitude.
static DIRECTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:\.\d+)?)\s*°?\s*([NS])\s*,?\s*(\d{1,3}(?:\.\d+)?)\s*°?\s*([EW])")
        .unwrap()
});

/// `lat ... <decimal> ... lon ... <decimal>`, labels anywhere in the text.
static LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)lat(?:itude)?\s*[:=]?\s*([-+]?\d{1,3}(?:\.\d+)?).*?(?:lon(?:gitude)?|lng)\s*[:=]?\s*([-+]?\d{1,3}(?:\.\d+)?)",
    )
    .unwrap()
});

/// Extract a coordinate from recognized overlay text.
///
/// Returning `None` is not an error, just "no coordinate found in this
/// candidate".
pub fn parse_coordinates(text: &str) -> Option<Coordinate> {
    parse_plain_pair(text)
        .or_else(|| parse_directional(text))
        .or_else(|| parse_labeled(text))
}

fn parse_plain_pair(text: &str) -> Option<Coordinate> {
    let caps = PLAIN_PAIR.captures(text)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lon: f64 = caps[2].parse().ok()?;
    validate(lat, lon)
}

fn parse_directional(text: &str) -> Option<Coordinate> {
    let caps = DIRECTIONAL.captures(text)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lon: f64 = caps[3].parse().ok()?;

    let lat = if caps[2].eq_ignore_ascii_case("S") { -lat } else { lat };
    let lon = if caps[4].eq_ignore_ascii_case("W") { -lon } else { lon };
    validate(lat, lon)
}

fn parse_labeled(text: &str) -> Option<Coordinate> {
    let caps = LABELED.captures(text)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lon: f64 = caps[2].parse().ok()?;
    validate(lat, lon)
}

/// Accept a pair only when it is in geographic range and clears the
/// near-zero misread filter.
fn validate(lat: f64, lon: f64) -> Option<Coordinate> {
    let coordinate = Coordinate::new(lat, lon);
    (coordinate.in_range() && coordinate.clears_near_zero(NEAR_ZERO_EPSILON))
        .then_some(coordinate)
}
