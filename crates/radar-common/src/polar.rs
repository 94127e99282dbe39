//! Polar radar samples.

use crate::geodesy::destination_point;
use crate::latlng::MapLatLng;
use crate::MeasuredValue;

/// A measurement addressed by azimuth and distance from a center.
///
/// The geographic position is derived: it is recomputed whenever the center,
/// azimuth or distance changes. While the center is the (0, 0) sentinel the
/// position stays at the origin and distance queries report zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarMapValue {
    value: f64,
    azimuth_in_degrees: f64,
    distance_in_meters: f64,
    altitude: Option<f64>,
    id: Option<String>,
    center: MapLatLng,
    position: MapLatLng,
}

impl PolarMapValue {
    pub fn new(value: f64, azimuth_in_degrees: f64, distance_in_meters: f64) -> Self {
        let mut polar = Self {
            value,
            azimuth_in_degrees: normalize_azimuth(azimuth_in_degrees),
            distance_in_meters: distance_in_meters.max(0.0),
            altitude: None,
            id: None,
            center: MapLatLng::default(),
            position: MapLatLng::default(),
        };
        polar.refresh_position();
        polar
    }

    pub fn with_center(mut self, center: MapLatLng) -> Self {
        self.set_center(center);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.position.id = self.id.clone();
        self
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self.position.altitude = Some(altitude);
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn azimuth_in_degrees(&self) -> f64 {
        self.azimuth_in_degrees
    }

    pub fn distance_in_meters(&self) -> f64 {
        self.distance_in_meters
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn center(&self) -> &MapLatLng {
        &self.center
    }

    /// Derived geographic position.
    pub fn point(&self) -> &MapLatLng {
        &self.position
    }

    pub fn lat(&self) -> f64 {
        self.position.lat
    }

    pub fn lng(&self) -> f64 {
        self.position.lng
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
        self.position.value = value;
    }

    pub fn set_center(&mut self, center: MapLatLng) {
        self.center = center;
        self.refresh_position();
    }

    pub fn set_azimuth(&mut self, azimuth_in_degrees: f64) {
        self.azimuth_in_degrees = normalize_azimuth(azimuth_in_degrees);
        self.refresh_position();
    }

    pub fn set_distance(&mut self, distance_in_meters: f64) {
        self.distance_in_meters = distance_in_meters.max(0.0);
        self.refresh_position();
    }

    /// Independent copy, center included.
    ///
    /// Render passes mutate duplicates so the shared dataset stays untouched.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Great-circle distance between the derived position and the center.
    pub fn geo_distance_in_meters(&self) -> f64 {
        if self.center.is_origin() {
            return 0.0;
        }
        self.center.distance_to(&self.position)
    }

    fn refresh_position(&mut self) {
        let (lat, lng) = if self.center.is_origin() {
            (0.0, 0.0)
        } else {
            destination_point(
                self.center.lat,
                self.center.lng,
                self.azimuth_in_degrees,
                self.distance_in_meters,
            )
        };
        self.position = MapLatLng {
            lat,
            lng,
            altitude: self.altitude,
            id: self.id.clone(),
            name: None,
            value: self.value,
        };
    }
}

impl MeasuredValue for PolarMapValue {
    fn measured_value(&self) -> f64 {
        self.value
    }
}

fn normalize_azimuth(azimuth: f64) -> f64 {
    if azimuth.is_finite() {
        azimuth.rem_euclid(360.0)
    } else {
        azimuth
    }
}
