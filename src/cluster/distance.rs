use std::f64::consts::PI;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

use super::point::Point;

/// Calculates great-circle distance between two points (haversine formula)
///
/// Assumes a spherical Earth of radius [`EARTH_RADIUS_M`]. The result is
/// symmetric and exactly zero for identical coordinates. NaN coordinates
/// propagate to a NaN result.
///
/// # Returns
///
/// Distance in meters
pub fn distance<P, Q>(p1: &Point<P>, p2: &Point<Q>) -> f64 {
    distance_deg(p1.latitude, p1.longitude, p2.latitude, p2.longitude)
}

/// Haversine distance in meters between two `(latitude, longitude)` pairs in degrees
pub fn distance_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * DEGREE_RAD;
    let phi2 = lat2 * DEGREE_RAD;
    // Absolute deltas keep the result bit-for-bit symmetric
    let d_phi = (lat2 - lat1).abs() * DEGREE_RAD;
    let d_lambda = (lon2 - lon1).abs() * DEGREE_RAD;

    let s1 = (d_phi / 2.0).sin();
    let s2 = (d_lambda / 2.0).sin();
    let a = s1 * s1 + phi1.cos() * phi2.cos() * s2 * s2;
    // Near-antipodal rounding can push `a` past 1; NaN must still fall through
    let a = if a > 1.0 { 1.0 } else { a };

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}
