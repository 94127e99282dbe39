//! Polar cells in screen space.

use projection::map_tools::round_to;
use projection::ScreenPoint;
use radar_common::{ColorScale, PolarMapValue};
use serde::{Deserialize, Serialize};

use crate::grid_value::GridValue;
use crate::optimization::{DrawerOptimization, PolarDrawerOptimization, RAIN_TYPE};

/// Bypassed cells at or above this value are drawn black.
pub const BYPASS_THRESHOLD: f64 = 0.2;

/// One polar cell (or a run of merged cells along a ray) ready to draw.
///
/// Distances are relative: meters already scaled to pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarGridValue {
    pub color: u32,
    pub transparency: f64,
    pub id: Option<String>,
    /// Source intensity.
    pub value: f64,
    /// Ray azimuth in degrees, clockwise from north.
    pub azimuth: f64,
    /// Start distance in pixels.
    pub distance: f64,
    /// Distance of the last merged cell; equals `distance` for a single cell.
    pub distance_end: f64,
    /// Angular width of a ray in degrees.
    pub azimuth_step: f64,
    /// Radial depth of one cell in pixels.
    pub edge: f64,
}

impl PolarGridValue {
    /// Build the screen cell for `value`.
    ///
    /// Transparency is decided in three stages, each overwriting the last:
    /// the color-scale bucket, the optimization step function (skipped for
    /// `rain`), then the bypass darkening.
    pub fn create(
        value: &PolarMapValue,
        distance_ratio: f64,
        optimization: &PolarDrawerOptimization,
        scale: &ColorScale,
    ) -> Self {
        let base = GridValue::translate_color(value.value(), scale);
        let mut color = base.color;
        let mut transparency = base.transparency;

        if optimization.kind() != RAIN_TYPE {
            if let Some(stepped) = optimization.step_transparency(value.value()) {
                transparency = stepped;
            }
        }

        if optimization.bypass() && value.value() >= BYPASS_THRESHOLD {
            color = 0x000000;
            transparency = (transparency * 2.0).min(1.0);
        }

        let distance = round_to(value.distance_in_meters() * distance_ratio, 2);

        Self {
            color,
            transparency,
            id: value.id().map(str::to_string),
            value: value.value(),
            azimuth: value.azimuth_in_degrees(),
            distance,
            distance_end: distance,
            azimuth_step: 0.0,
            edge: 0.0,
        }
    }

    /// Attach the ray spacing used to draw the cell as a sector.
    pub fn with_geometry(mut self, azimuth_step: f64, edge: f64) -> Self {
        self.azimuth_step = azimuth_step;
        self.edge = edge;
        self
    }

    pub fn grid(&self) -> GridValue {
        GridValue::new(self.color, self.transparency, self.id.clone())
    }

    /// Screen position of the cell start, seen from `center`.
    pub fn get_position_from(&self, center: &ScreenPoint) -> ScreenPoint {
        position_at(center, self.azimuth, self.distance)
    }

    /// Inner and outer radius of the drawn sector.
    pub fn radii(&self) -> (f64, f64) {
        (self.distance, self.distance_end + self.edge)
    }

    /// Whether `next` continues this run along the same ray with the same look.
    pub fn can_merge(&self, next: &PolarGridValue) -> bool {
        if self.azimuth != next.azimuth
            || self.color != next.color
            || self.transparency != next.transparency
        {
            return false;
        }
        let gap = next.distance - self.distance_end;
        (gap - self.edge).abs() <= self.edge * 0.5 + 0.01
    }

    /// Extend the run up to `next`.
    pub fn merge(&mut self, next: &PolarGridValue) {
        self.distance_end = next.distance;
        self.value = self.value.max(next.value);
    }
}

fn position_at(center: &ScreenPoint, azimuth: f64, distance: f64) -> ScreenPoint {
    let radians = azimuth.to_radians();
    ScreenPoint::new(
        center.x + distance * radians.sin(),
        center.y - distance * radians.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f64, azimuth: f64, meters: f64) -> PolarMapValue {
        PolarMapValue::new(value, azimuth, meters)
    }

    #[test]
    fn test_position_north_and_east() {
        let origin = ScreenPoint::new(0.0, 0.0);
        let rain = PolarDrawerOptimization::new("rain", 10);
        let scale = ColorScale::radar();

        let north = PolarGridValue::create(&sample(1.0, 0.0, 100.0), 0.5, &rain, &scale);
        let p = north.get_position_from(&origin);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y + 50.0).abs() < 1e-9);

        let east = PolarGridValue::create(&sample(1.0, 90.0, 100.0), 0.5, &rain, &scale);
        let p = east.get_position_from(&origin);
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn test_relative_distance_rounded() {
        let rain = PolarDrawerOptimization::new("rain", 10);
        let grid = PolarGridValue::create(&sample(1.0, 0.0, 2.0), 0.008_993, &rain, &ColorScale::radar());
        assert_eq!(grid.distance, 0.02);
        assert_eq!(grid.distance_end, 0.02);
    }

    #[test]
    fn test_rain_keeps_color_scale_transparency() {
        let scale = ColorScale::radar();
        let rain = PolarDrawerOptimization::new("rain", 10);
        let grid = PolarGridValue::create(&sample(1.0, 0.0, 1.0), 1.0, &rain, &scale);
        let base = GridValue::translate_color(1.0, &scale);
        assert_eq!(grid.transparency, base.transparency);
        assert_eq!(grid.color, base.color);
    }

    #[test]
    fn test_step_override_for_other_types() {
        let scale = ColorScale::radar();
        let opt = PolarDrawerOptimization::new("hail", 10).with_range(0.0, 9.0, 1.0);
        let grid = PolarGridValue::create(&sample(4.2, 0.0, 1.0), 1.0, &opt, &scale);
        // range 10, last floor <= 4.2 is 4
        assert!((grid.transparency - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_bypass_overwrites_last() {
        let scale = ColorScale::radar();
        let opt = PolarDrawerOptimization::new("hail", 10)
            .with_range(0.0, 9.0, 1.0)
            .with_bypass(true);
        let grid = PolarGridValue::create(&sample(4.2, 0.0, 1.0), 1.0, &opt, &scale);
        assert_eq!(grid.color, 0);
        assert!((grid.transparency - 0.6).abs() < 1e-12);

        // below the bypass threshold the color is kept
        let faint = PolarGridValue::create(&sample(0.15, 0.0, 1.0), 1.0, &opt, &scale);
        assert_ne!(faint.color, 0);
    }

    #[test]
    fn test_bypass_clamps_to_one() {
        let opt = PolarDrawerOptimization::new("rain", 10).with_bypass(true);
        // first bucket: 0.5 doubled
        let grid = PolarGridValue::create(&sample(0.3, 0.0, 1.0), 1.0, &opt, &ColorScale::radar());
        assert_eq!(grid.transparency, 1.0);
    }

    #[test]
    fn test_merge_along_ray() {
        let rain = PolarDrawerOptimization::new("rain", 10);
        let scale = ColorScale::radar();
        let mut first = PolarGridValue::create(&sample(1.0, 10.0, 100.0), 0.1, &rain, &scale).with_geometry(10.0, 10.0);
        let second = PolarGridValue::create(&sample(1.2, 10.0, 200.0), 0.1, &rain, &scale).with_geometry(10.0, 10.0);
        let far = PolarGridValue::create(&sample(1.2, 10.0, 400.0), 0.1, &rain, &scale).with_geometry(10.0, 10.0);
        let other_ray = PolarGridValue::create(&sample(1.0, 20.0, 200.0), 0.1, &rain, &scale).with_geometry(10.0, 10.0);

        assert!(first.can_merge(&second));
        assert!(!first.can_merge(&far));
        assert!(!first.can_merge(&other_ray));

        first.merge(&second);
        assert_eq!(first.distance_end, 20.0);
        assert_eq!(first.radii(), (10.0, 30.0));
    }
}
