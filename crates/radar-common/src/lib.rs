//! Common types shared by the radar overlay crates.
//!
//! Domain values (polar samples, cartesian cells, wind icons), the spherical
//! geodesy they rely on, and the color-scale configuration used to decide
//! what is visible.

pub mod bounds;
pub mod cartesian;
pub mod error;
pub mod geodesy;
pub mod latlng;
pub mod polar;
pub mod style;

pub use bounds::LatLngBounds;
pub use cartesian::{CartesianMapValue, IconMapValue};
pub use error::{RadarError, RadarResult};
pub use latlng::MapLatLng;
pub use polar::PolarMapValue;
pub use style::{ColorScale, ColorScaleConfig, ColorStop};

/// A domain value carrying a scalar intensity.
///
/// Optimizations filter on this value regardless of how the sample is
/// addressed (polar ray, cartesian cell or icon).
pub trait MeasuredValue {
    fn measured_value(&self) -> f64;
}
