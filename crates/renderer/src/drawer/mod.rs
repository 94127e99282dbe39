//! Drawers: stateful converters from domain values to screen primitives.
//!
//! A drawer holds the values of the current time frame behind a version tag,
//! picks an optimization for its type, and on each render pass emits
//! primitives through a callback. It remembers what the last pass saw so a
//! layer can skip redundant redraws.

mod cartesian;
mod polar;

pub use cartesian::{CartesianDrawer, GridValueFactory, IconDrawer, IconFactory, RectDrawer, RectFactory};
pub use polar::{get_next_offset, PolarDrawer};

use projection::ScreenPoint;
use radar_common::MapLatLng;

/// What the last render pass was computed from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RenderState {
    pub version: String,
    pub center: MapLatLng,
    pub center_point: ScreenPoint,
    pub distance_ratio: f64,
    pub possible_drawing: usize,
}

impl RenderState {
    /// True when any observed input differs from this snapshot.
    pub fn differs(
        &self,
        version: &str,
        center: &MapLatLng,
        center_point: &ScreenPoint,
        distance_ratio: f64,
        possible_drawing: usize,
    ) -> bool {
        self.version != version
            || self.center.lat != center.lat
            || self.center.lng != center.lng
            || self.center_point != *center_point
            || self.distance_ratio != distance_ratio
            || self.possible_drawing != possible_drawing
    }
}
