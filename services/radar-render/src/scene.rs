//! Synthetic weather around the configured radar site.

use radar_common::{CartesianMapValue, IconMapValue, MapLatLng, PolarMapValue};

use crate::config::RadarConfig;

/// Rain cells per side of the cartesian grid.
const GRID_CELLS: usize = 40;
const GRID_SPACING_DEG: f64 = 0.05;
const WIND_STRIDE: usize = 5;

pub struct Scene {
    pub radar_center: MapLatLng,
    pub sweep: Vec<PolarMapValue>,
    pub rain: Vec<CartesianMapValue>,
    pub wind: Vec<IconMapValue>,
}

/// Two rain bands crossing the sweep, a rain grid east of the site and a
/// veering wind field on the same grid.
pub fn build(radar: &RadarConfig) -> Scene {
    let radar_center = radar.center();
    let azimuth_step = 360.0 / radar.azimuths.max(1) as f64;

    let mut sweep = Vec::with_capacity(radar.azimuths * radar.gates);
    for ray in 0..radar.azimuths {
        let azimuth = ray as f64 * azimuth_step;
        for gate in 0..radar.gates {
            let distance = (gate + 1) as f64 * radar.gate_meters;
            sweep.push(PolarMapValue::new(band_intensity(azimuth, distance), azimuth, distance));
        }
    }

    let south_west = (radar_center.lat - 0.5, radar_center.lng + 0.2);
    let mut rain = Vec::with_capacity(GRID_CELLS * GRID_CELLS);
    let mut wind = Vec::new();
    for row in 0..GRID_CELLS {
        for col in 0..GRID_CELLS {
            let lat = south_west.0 + row as f64 * GRID_SPACING_DEG;
            let lng = south_west.1 + col as f64 * GRID_SPACING_DEG;
            let id = format!("{}-{}", row, col);
            let value = cell_intensity(row, col);
            rain.push(
                CartesianMapValue::new(value, lat, lng, lat + GRID_SPACING_DEG, lng + GRID_SPACING_DEG)
                    .with_id(id.clone()),
            );
            if row % WIND_STRIDE == 0 && col % WIND_STRIDE == 0 {
                let speed = 4.0 + row as f64 * 0.4;
                let angle = (200.0 + col as f64 * 3.0) % 360.0;
                wind.push(IconMapValue::new(speed, lat, lng, speed, angle).with_id(id));
            }
        }
    }

    Scene {
        radar_center,
        sweep,
        rain,
        wind,
    }
}

/// mm/h along two curved bands, fading with range.
fn band_intensity(azimuth: f64, distance: f64) -> f64 {
    let km = distance / 1000.0;
    let first = gaussian(km - (40.0 + 15.0 * (azimuth.to_radians() * 2.0).sin()), 6.0) * 35.0;
    let second = gaussian(azimuth - 250.0, 25.0) * gaussian(km - 80.0, 12.0) * 60.0;
    let fade = (1.0 - km / 150.0).max(0.0);
    ((first + second) * fade * 100.0).round() / 100.0
}

fn cell_intensity(row: usize, col: usize) -> f64 {
    let (r, c) = (row as f64, col as f64);
    let value = ((r * 0.3).sin() * (c * 0.2).cos() * 12.0).max(0.0) + gaussian(r - c, 4.0) * 8.0;
    (value * 100.0).round() / 100.0
}

fn gaussian(offset: f64, width: f64) -> f64 {
    (-(offset * offset) / (2.0 * width * width)).exp()
}
