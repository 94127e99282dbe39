//! Geographic bounding boxes.

use serde::{Deserialize, Serialize};

use crate::latlng::MapLatLng;

/// A lat/lng box, in degrees. Does not wrap the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Box spanned by two arbitrary corners.
    pub fn from_corners(a: &MapLatLng, b: &MapLatLng) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west: a.lng.min(b.lng),
            north: a.lat.max(b.lat),
            east: a.lng.max(b.lng),
        }
    }

    pub fn contains(&self, point: &MapLatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        self.south <= other.north
            && self.north >= other.south
            && self.west <= other.east
            && self.east >= other.west
    }

    /// Grow the box to include `point`.
    pub fn extend(&mut self, point: &MapLatLng) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn center(&self) -> MapLatLng {
        MapLatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}
