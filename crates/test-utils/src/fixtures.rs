//! Reference scenarios for drawer and layer tests.
//!
//! Each scenario bundles its values with the projection it was designed
//! for, so expected screen coordinates can be written down by hand.

use std::sync::Arc;

use projection::{ClosureView, MapView, ScreenPoint};
use radar_common::{CartesianMapValue, IconMapValue, MapLatLng, PolarMapValue};

use crate::generators::{cartesian_grid, polar_sweep, wind_field};

/// Common map locations.
pub mod sites {
    use radar_common::MapLatLng;

    /// Radar site used by the polar scenario.
    pub fn toulouse() -> MapLatLng {
        MapLatLng::new(43.6, 1.44).with_id("toulouse").with_name("Toulouse")
    }

    /// Null Island, the projection origin of the cartesian scenario.
    pub fn origin() -> MapLatLng {
        MapLatLng::new(0.0, 0.0)
    }
}

/// Scaled projection: `x = lng * 1000`, `y = lat * 1000`.
pub fn scaled_view(zoom: f64) -> ClosureView {
    ClosureView::new(
        |p: &MapLatLng| ScreenPoint::new(p.lng * 1000.0, p.lat * 1000.0),
        move || zoom,
    )
    .with_center(sites::origin())
}

/// Scaled projection with screen y growing southward: `y = -lat * 1000`.
pub fn north_up_view(zoom: f64, center: MapLatLng) -> ClosureView {
    ClosureView::new(
        |p: &MapLatLng| ScreenPoint::new(p.lng * 1000.0, -p.lat * 1000.0),
        move || zoom,
    )
    .with_center(center)
}

/// 81 cells on a 0.2 degree grid from -1 to 0.6, each 0.001 degree wide.
///
/// Values grow by 3 per column starting at 1, so `value < 5` keeps the
/// first two cells of every row.
pub struct CartesianScenario {
    pub values: Vec<CartesianMapValue>,
    pub view: Arc<dyn MapView>,
    pub center: MapLatLng,
    pub center_point: ScreenPoint,
}

pub fn cartesian_scenario() -> CartesianScenario {
    CartesianScenario {
        values: cartesian_grid(9, 9, (-1.0, -1.0), 0.2, 0.001, |_, col| 1.0 + 3.0 * col as f64),
        view: Arc::new(scaled_view(0.5)),
        center: sites::origin(),
        center_point: ScreenPoint::new(0.0, 0.0),
    }
}

/// 36 rays 10 degrees apart, 10 gates 2 m apart, around [`sites::toulouse`].
///
/// Values grow by 4 per gate starting at 0.5, so `value < 5` keeps the
/// first two gates of every ray.
pub struct PolarScenario {
    pub values: Vec<PolarMapValue>,
    pub view: Arc<dyn MapView>,
    pub center: MapLatLng,
    pub center_point: ScreenPoint,
}

pub fn polar_scenario() -> PolarScenario {
    let center = sites::toulouse();
    let view = north_up_view(9.0, center.clone());
    let center_point = view.project(&center);
    PolarScenario {
        values: polar_sweep(36, 10, 2.0, |_, gate| 0.5 + 4.0 * gate as f64),
        view: Arc::new(view),
        center,
        center_point,
    }
}

/// A demo-sized weather scene: one polar sweep, one rain grid and one wind
/// field around the same site.
pub struct WeatherScene {
    pub radar_center: MapLatLng,
    pub sweep: Vec<PolarMapValue>,
    pub rain: Vec<CartesianMapValue>,
    pub wind: Vec<IconMapValue>,
}

pub fn weather_scene() -> WeatherScene {
    let radar_center = sites::toulouse();
    let sweep = polar_sweep(360, 100, 1000.0, |ray, gate| {
        let band = ((ray as f64 / 12.0).sin() * 20.0 + 20.0) - gate as f64 * 0.3;
        band.max(0.0)
    });
    let origin = (radar_center.lat - 1.0, radar_center.lng - 1.5);
    let rain = cartesian_grid(20, 30, origin, 0.1, 0.1, |row, col| {
        ((row as f64 * 0.4).cos() * (col as f64 * 0.3).sin() * 15.0).abs()
    });
    let wind = wind_field(5, 8, origin, 0.4);
    WeatherScene {
        radar_center,
        sweep,
        rain,
        wind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartesian_scenario_shape() {
        let scenario = cartesian_scenario();
        assert_eq!(scenario.values.len(), 81);
        assert_eq!(scenario.values[0].latitude, -1.0);
        assert_eq!(scenario.values[0].value, 1.0);
        assert_eq!(scenario.values[1].value, 4.0);
        assert_eq!(scenario.values.iter().filter(|v| v.value < 5.0).count(), 18);
        assert_eq!(scenario.view.zoom_level(), 0.5);
    }

    #[test]
    fn test_polar_scenario_shape() {
        let scenario = polar_scenario();
        assert_eq!(scenario.values.len(), 360);
        assert_eq!(scenario.values[0].value(), 0.5);
        assert_eq!(scenario.values.iter().filter(|v| v.value() < 5.0).count(), 72);
        crate::assert_point_approx_eq!(scenario.center_point, ScreenPoint::new(1440.0, -43600.0), 1e-6);
    }

    #[test]
    fn test_weather_scene_sizes() {
        let scene = weather_scene();
        assert_eq!(scene.sweep.len(), 36_000);
        assert_eq!(scene.rain.len(), 600);
        assert_eq!(scene.wind.len(), 40);
    }
}
