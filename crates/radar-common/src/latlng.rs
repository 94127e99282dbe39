//! Positioned values.

use serde::{Deserialize, Serialize};

use crate::geodesy::haversine_distance;
use crate::MeasuredValue;

/// A geographic position with optional identity and payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapLatLng {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: f64,
}

impl MapLatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            ..Default::default()
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

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// The (0, 0) sentinel used for "no position yet".
    pub fn is_origin(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    /// Both coordinates are finite numbers.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Identity comparison: by id when both sides carry one, otherwise by
    /// coordinates.
    pub fn same_as(&self, other: &MapLatLng) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.lat == other.lat && self.lng == other.lng,
        }
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &MapLatLng) -> f64 {
        haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

impl MeasuredValue for MapLatLng {
    fn measured_value(&self) -> f64 {
        self.value
    }
}
