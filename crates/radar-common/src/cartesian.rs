//! Cartesian grid cells and wind icons.

use serde::{Deserialize, Serialize};

use crate::bounds::LatLngBounds;
use crate::latlng::MapLatLng;
use crate::MeasuredValue;

/// A grid cell: a value over a lat/lng box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartesianMapValue {
    pub value: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub latitude2: f64,
    pub longitude2: f64,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CartesianMapValue {
    pub fn new(value: f64, latitude: f64, longitude: f64, latitude2: f64, longitude2: f64) -> Self {
        Self {
            value,
            latitude,
            longitude,
            latitude2,
            longitude2,
            id: None,
            name: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// First corner of the box.
    pub fn corner(&self) -> MapLatLng {
        MapLatLng {
            lat: self.latitude,
            lng: self.longitude,
            id: self.id.clone(),
            value: self.value,
            ..Default::default()
        }
    }

    /// Opposite corner of the box.
    pub fn opposite_corner(&self) -> MapLatLng {
        MapLatLng {
            lat: self.latitude2,
            lng: self.longitude2,
            id: self.id.clone(),
            value: self.value,
            ..Default::default()
        }
    }

    pub fn center(&self) -> MapLatLng {
        MapLatLng::new(
            (self.latitude + self.latitude2) / 2.0,
            (self.longitude + self.longitude2) / 2.0,
        )
    }

    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::from_corners(&self.corner(), &self.opposite_corner())
    }

    pub fn is_valid(&self) -> bool {
        [self.latitude, self.longitude, self.latitude2, self.longitude2]
            .iter()
            .all(|c| c.is_finite())
    }
}

impl MeasuredValue for CartesianMapValue {
    fn measured_value(&self) -> f64 {
        self.value
    }
}

impl AsRef<CartesianMapValue> for CartesianMapValue {
    fn as_ref(&self) -> &CartesianMapValue {
        self
    }
}

/// A directional marker (wind arrow) at a single point.
///
/// The cell box collapses onto the point: both corners are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconMapValue {
    pub cell: CartesianMapValue,
    pub speed: f64,
    /// Direction the arrow points to, degrees clockwise from north.
    pub angle: f64,
}

impl IconMapValue {
    pub fn new(value: f64, lat: f64, lng: f64, speed: f64, angle: f64) -> Self {
        Self {
            cell: CartesianMapValue::new(value, lat, lng, lat, lng),
            speed,
            angle,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.cell.id = Some(id.into());
        self
    }

    pub fn point(&self) -> MapLatLng {
        self.cell.corner()
    }
}

impl MeasuredValue for IconMapValue {
    fn measured_value(&self) -> f64 {
        self.cell.value
    }
}

impl AsRef<CartesianMapValue> for IconMapValue {
    fn as_ref(&self) -> &CartesianMapValue {
        &self.cell
    }
}
