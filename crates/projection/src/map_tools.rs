//! Distance-per-pixel math shared by the drawers.

use std::f64::consts::PI;

use radar_common::MapLatLng;

use crate::mercator::{EQUATORIAL_RADIUS_METERS, TILE_SIZE};
use crate::screen::ScreenPoint;

/// Euclidean distance between two pixel positions.
pub fn pixel_distance(a: &ScreenPoint, b: &ScreenPoint) -> f64 {
    a.distance_to(b)
}

/// Pixels per meter along a radar ray.
///
/// `projected` is the screen position of a sample lying `meters` away from
/// the center drawn at `center_point`. Zero meters yields a zero ratio,
/// which callers treat as degenerate.
pub fn polar_distance_ratio(center_point: &ScreenPoint, projected: &ScreenPoint, meters: f64) -> f64 {
    if meters == 0.0 || !meters.is_finite() {
        return 0.0;
    }
    pixel_distance(center_point, projected) / meters
}

/// Pixels per meter between a geographic center and a value point, using the
/// great-circle distance for the real-world side.
pub fn cartesian_distance_ratio(
    center: &MapLatLng,
    center_point: &ScreenPoint,
    point: &MapLatLng,
    projected: &ScreenPoint,
) -> f64 {
    polar_distance_ratio(center_point, projected, center.distance_to(point))
}

/// Web Mercator ground resolution at `latitude` for a zoom level.
pub fn meters_per_pixel(latitude: f64, zoom: f64) -> f64 {
    let equator = 2.0 * PI * EQUATORIAL_RADIUS_METERS / TILE_SIZE;
    equator * latitude.to_radians().cos() / 2f64.powf(zoom)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
