//! Spherical earth geodesy.
//!
//! Distances are great-circle distances on a sphere of mean earth radius,
//! which is accurate enough at radar ranges (a few hundred kilometers).

use std::f64::consts::PI;

/// Mean earth radius (IUGG) in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

const TO_RAD: f64 = PI / 180.0;
const TO_DEG: f64 = 180.0 / PI;

/// Point reached by travelling `distance_m` meters from (`lat`, `lng`) along
/// the initial bearing `azimuth_deg` (clockwise from north).
///
/// Returns (lat, lng) in degrees, longitude normalized to [-180, 180].
pub fn destination_point(lat: f64, lng: f64, azimuth_deg: f64, distance_m: f64) -> (f64, f64) {
    let phi1 = lat * TO_RAD;
    let lambda1 = lng * TO_RAD;
    let theta = azimuth_deg * TO_RAD;
    let delta = distance_m / EARTH_RADIUS_METERS;

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * sin_phi2;
    let lambda2 = lambda1 + y.atan2(x);

    (phi2 * TO_DEG, normalize_longitude(lambda2 * TO_DEG))
}

/// Great-circle distance in meters between two points given in degrees.
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1 * TO_RAD;
    let phi2 = lat2 * TO_RAD;
    let d_phi = (lat2 - lat1) * TO_RAD;
    let d_lambda = (lng2 - lng1) * TO_RAD;

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Wrap a longitude into [-180, 180].
pub fn normalize_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    (lng + 180.0).rem_euclid(360.0) - 180.0
}
