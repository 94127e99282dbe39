//! Web Mercator (EPSG:3857) viewport.
//!
//! Uses the slippy-map convention: the world is a `256 * 2^zoom` pixel
//! square, x grows eastward from the antimeridian and y grows southward
//! from the northern clip latitude.

use std::f64::consts::PI;

use radar_common::{LatLngBounds, MapLatLng};
use serde::{Deserialize, Serialize};

use crate::screen::ScreenPoint;
use crate::view::MapView;

/// Tile size in pixels at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// WGS84 semi-major axis, the sphere Web Mercator is defined on.
pub const EQUATORIAL_RADIUS_METERS: f64 = 6_378_137.0;

/// Web Mercator latitude clip.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// A north-up viewport of `width` x `height` pixels centered on `center`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebMercatorView {
    pub center: MapLatLng,
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
}

impl WebMercatorView {
    pub fn new(center: MapLatLng, zoom: f64, width: u32, height: u32) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Position in world pixels at the current zoom.
    pub fn world_pixel(&self, point: &MapLatLng) -> ScreenPoint {
        let size = self.world_size();
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (point.lng + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        ScreenPoint::new(x, y)
    }

    /// Inverse of [`WebMercatorView::project`].
    pub fn unproject(&self, pixel: &ScreenPoint) -> MapLatLng {
        let size = self.world_size();
        let origin = self.world_pixel(&self.center);
        let wx = pixel.x - self.width as f64 / 2.0 + origin.x;
        let wy = pixel.y - self.height as f64 / 2.0 + origin.y;

        let lng = wx / size * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * wy / size)).sinh().atan().to_degrees();
        MapLatLng::new(lat, lng)
    }

    /// Geographic extent of the viewport.
    pub fn bounds(&self) -> LatLngBounds {
        let top_left = self.unproject(&ScreenPoint::new(0.0, 0.0));
        let bottom_right = self.unproject(&ScreenPoint::new(self.width as f64, self.height as f64));
        LatLngBounds::from_corners(&top_left, &bottom_right)
    }

    /// Same viewport panned to a new center.
    pub fn panned_to(&self, center: MapLatLng) -> Self {
        Self {
            center,
            ..self.clone()
        }
    }

    /// Same viewport at another zoom level.
    pub fn zoomed_to(&self, zoom: f64) -> Self {
        Self {
            zoom,
            ..self.clone()
        }
    }
}

impl MapView for WebMercatorView {
    fn project(&self, point: &MapLatLng) -> ScreenPoint {
        let world = self.world_pixel(point);
        let origin = self.world_pixel(&self.center);
        ScreenPoint::new(
            world.x - origin.x + self.width as f64 / 2.0,
            world.y - origin.y + self.height as f64 / 2.0,
        )
    }

    fn zoom_level(&self) -> f64 {
        self.zoom
    }

    fn contains(&self, point: &MapLatLng) -> bool {
        let p = self.project(point);
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width as f64 && p.y <= self.height as f64
    }

    fn intersects(&self, bounds: &LatLngBounds) -> bool {
        self.bounds().intersects(bounds)
    }

    fn center(&self) -> MapLatLng {
        self.center.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> WebMercatorView {
        WebMercatorView::new(MapLatLng::new(43.6, 1.44), 8.0, 800, 600)
    }

    #[test]
    fn test_center_projects_to_middle() {
        let v = view();
        let p = v.project(&v.center);
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up_east_is_right() {
        let v = view();
        let north = v.project(&MapLatLng::new(44.0, 1.44));
        let east = v.project(&MapLatLng::new(43.6, 2.0));
        assert!(north.y < 300.0);
        assert!(east.x > 400.0);
    }

    #[test]
    fn test_unproject_roundtrip() {
        let v = view();
        let point = MapLatLng::new(43.9, 1.1);
        let back = v.unproject(&v.project(&point));
        assert!((back.lat - 43.9).abs() < 1e-9);
        assert!((back.lng - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_contains_and_bounds() {
        let v = view();
        assert!(v.contains(&v.center));
        assert!(!v.contains(&MapLatLng::new(10.0, 1.44)));

        let bounds = v.bounds();
        assert!(bounds.contains(&v.center));
        assert!(bounds.north > 43.6 && bounds.south < 43.6);
    }

    #[test]
    fn test_intersects_box_larger_than_viewport() {
        let v = WebMercatorView::new(MapLatLng::new(43.65, 1.45), 13.0, 256, 256);
        let around = LatLngBounds::new(43.6, 1.4, 43.7, 1.5);
        assert!(!v.contains(&MapLatLng::new(43.6, 1.4)));
        assert!(!v.contains(&MapLatLng::new(43.7, 1.5)));
        assert!(v.intersects(&around));

        let elsewhere = LatLngBounds::new(44.0, 2.0, 44.1, 2.1);
        assert!(!v.intersects(&elsewhere));
    }

    #[test]
    fn test_zoom_doubles_pixel_distances() {
        let v = view();
        let p = MapLatLng::new(43.7, 1.6);
        let d8 = v.project(&p).distance_to(&v.project(&v.center));
        let z9 = v.zoomed_to(9.0);
        let d9 = z9.project(&p).distance_to(&z9.project(&z9.center));
        assert!((d9 / d8 - 2.0).abs() < 1e-9);
    }
}
