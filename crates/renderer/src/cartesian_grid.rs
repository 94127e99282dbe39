//! Rectangles and arrows in screen space.

use projection::map_tools::round_to;
use projection::{MapView, ScreenPoint};
use radar_common::{CartesianMapValue, ColorScale, IconMapValue};
use serde::{Deserialize, Serialize};

use crate::grid_value::GridValue;

/// Arrow length in pixels per unit of speed.
pub const ICON_PIXELS_PER_SPEED: f64 = 2.0;

/// Longest arrow drawn, in pixels.
pub const ICON_MAX_LENGTH: f64 = 40.0;

/// A grid cell as a screen rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianGridValue {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: u32,
    pub transparency: f64,
    pub id: Option<String>,
    pub value: f64,
}

impl CartesianGridValue {
    /// Project both corners of the cell and color it.
    ///
    /// Cells reaching a color-scale bucket are drawn opaque; cells below the
    /// smallest threshold keep the invisible base transparency.
    pub fn create(value: &CartesianMapValue, view: &dyn MapView, scale: &ColorScale) -> Self {
        let p1 = view.project(&value.corner());
        let p2 = view.project(&value.opposite_corner());

        let base = GridValue::translate_color(value.value, scale);
        let transparency = if scale.bucket_index(value.value).is_some() {
            0.0
        } else {
            base.transparency
        };

        Self {
            x: round_to(p1.x.min(p2.x), 2),
            y: round_to(p1.y.min(p2.y), 2),
            width: round_to((p2.x - p1.x).abs(), 2),
            height: round_to((p2.y - p1.y).abs(), 2),
            color: base.color,
            transparency,
            id: value.id.clone(),
            value: value.value,
        }
    }

    pub fn grid(&self) -> GridValue {
        GridValue::new(self.color, self.transparency, self.id.clone())
    }
}

/// A directional arrow anchored at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconGridValue {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    /// Degrees clockwise from north.
    pub angle: f64,
    pub color: u32,
    pub transparency: f64,
    pub id: Option<String>,
    pub value: f64,
}

impl IconGridValue {
    pub fn create(value: &IconMapValue, view: &dyn MapView, scale: &ColorScale) -> Self {
        let anchor = view.project(&value.point());
        let base = GridValue::translate_color(value.cell.value, scale);

        Self {
            x: round_to(anchor.x, 2),
            y: round_to(anchor.y, 2),
            speed: value.speed,
            angle: value.angle,
            color: base.color,
            transparency: base.transparency,
            id: value.cell.id.clone(),
            value: value.cell.value,
        }
    }

    pub fn grid(&self) -> GridValue {
        GridValue::new(self.color, self.transparency, self.id.clone())
    }

    pub fn anchor(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }

    /// Arrow vector (dx, dy) in pixels; its length grows with speed.
    pub fn vector(&self) -> (f64, f64) {
        let length = (self.speed.abs() * ICON_PIXELS_PER_SPEED).min(ICON_MAX_LENGTH);
        let radians = self.angle.to_radians();
        (length * radians.sin(), -length * radians.cos())
    }

    /// Arrow head position.
    pub fn tip(&self) -> ScreenPoint {
        let (dx, dy) = self.vector();
        ScreenPoint::new(self.x + dx, self.y + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::ClosureView;

    fn view() -> ClosureView {
        ClosureView::new(|p| ScreenPoint::new(p.lng * 1000.0, p.lat * 1000.0), || 5.0)
    }

    #[test]
    fn test_rectangle_from_corners() {
        let cell = CartesianMapValue::new(1.0, 0.2, -0.4, 0.0, -0.2).with_id("7");
        let grid = CartesianGridValue::create(&cell, &view(), &ColorScale::radar());
        assert_eq!(grid.x, -400.0);
        assert_eq!(grid.y, 0.0);
        assert_eq!(grid.width, 200.0);
        assert_eq!(grid.height, 200.0);
        assert_eq!(grid.color, 6867711);
        assert_eq!(grid.transparency, 0.0);
        assert_eq!(grid.id.as_deref(), Some("7"));
    }

    #[test]
    fn test_rectangle_below_scale_is_invisible() {
        let cell = CartesianMapValue::new(0.05, 0.0, 0.0, 0.1, 0.1);
        let grid = CartesianGridValue::create(&cell, &view(), &ColorScale::radar());
        assert_eq!(grid.transparency, 1.0);
    }

    #[test]
    fn test_icon_vector() {
        let icon = IconMapValue::new(1.0, 0.01, 0.02, 5.0, 90.0);
        let grid = IconGridValue::create(&icon, &view(), &ColorScale::radar());
        assert_eq!(grid.x, 20.0);
        assert_eq!(grid.y, 10.0);

        let (dx, dy) = grid.vector();
        assert!((dx - 10.0).abs() < 1e-9);
        assert!(dy.abs() < 1e-9);
    }

    #[test]
    fn test_icon_length_capped() {
        let icon = IconMapValue::new(1.0, 0.0, 0.0, 500.0, 0.0);
        let grid = IconGridValue::create(&icon, &view(), &ColorScale::radar());
        let tip = grid.tip();
        assert!((tip.y + ICON_MAX_LENGTH).abs() < 1e-9);
    }
}
