//! Synthetic radar data with predictable values.
//!
//! Values are laid out the way drawers expect them: polar sweeps ray by ray
//! (every distance of an azimuth before the next azimuth), grids row by row.

use radar_common::{CartesianMapValue, IconMapValue, MapLatLng, PolarMapValue};

/// A full polar sweep of `azimuths` evenly spaced rays with `gates` samples
/// each, `gate_meters` apart starting at `gate_meters`.
///
/// `value(ray, gate)` gives each sample's intensity; ids are the 1-based
/// sample index.
///
/// ```
/// use test_utils::polar_sweep;
///
/// let sweep = polar_sweep(4, 3, 100.0, |_, gate| gate as f64);
/// assert_eq!(sweep.len(), 12);
/// assert_eq!(sweep[3].azimuth_in_degrees(), 90.0);
/// assert_eq!(sweep[2].distance_in_meters(), 300.0);
/// ```
pub fn polar_sweep<F>(azimuths: usize, gates: usize, gate_meters: f64, value: F) -> Vec<PolarMapValue>
where
    F: Fn(usize, usize) -> f64,
{
    let step = 360.0 / azimuths.max(1) as f64;
    let mut sweep = Vec::with_capacity(azimuths * gates);
    for ray in 0..azimuths {
        for gate in 0..gates {
            let index = sweep.len() + 1;
            sweep.push(
                PolarMapValue::new(value(ray, gate), ray as f64 * step, (gate + 1) as f64 * gate_meters)
                    .with_id(index.to_string()),
            );
        }
    }
    sweep
}

/// Same as [`polar_sweep`] with every sample bound to `center`.
pub fn centered_sweep<F>(
    center: &MapLatLng,
    azimuths: usize,
    gates: usize,
    gate_meters: f64,
    value: F,
) -> Vec<PolarMapValue>
where
    F: Fn(usize, usize) -> f64,
{
    polar_sweep(azimuths, gates, gate_meters, value)
        .into_iter()
        .map(|v| v.with_center(center.clone()))
        .collect()
}

/// A `rows` x `cols` grid of boxes starting at `origin` (south-west),
/// `spacing` degrees apart and `size` degrees wide.
///
/// `value(row, col)` gives each cell's intensity; ids are the 1-based cell
/// index.
pub fn cartesian_grid<F>(
    rows: usize,
    cols: usize,
    origin: (f64, f64),
    spacing: f64,
    size: f64,
    value: F,
) -> Vec<CartesianMapValue>
where
    F: Fn(usize, usize) -> f64,
{
    let mut cells = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let lat = origin.0 + row as f64 * spacing;
            let lng = origin.1 + col as f64 * spacing;
            let index = cells.len() + 1;
            cells.push(
                CartesianMapValue::new(value(row, col), lat, lng, lat + size, lng + size)
                    .with_id(index.to_string()),
            );
        }
    }
    cells
}

/// A rotating wind field: direction turns with the column, speed grows
/// with the row.
pub fn wind_field(rows: usize, cols: usize, origin: (f64, f64), spacing: f64) -> Vec<IconMapValue> {
    let mut icons = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let lat = origin.0 + row as f64 * spacing;
            let lng = origin.1 + col as f64 * spacing;
            let speed = 2.0 + row as f64 * 1.5;
            let angle = (col as f64 * 30.0) % 360.0;
            let index = icons.len() + 1;
            icons.push(IconMapValue::new(speed, lat, lng, speed, angle).with_id(index.to_string()));
        }
    }
    icons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_sweep_is_ray_major() {
        let sweep = polar_sweep(36, 10, 2.0, |_, gate| gate as f64);
        assert_eq!(sweep.len(), 360);
        assert!(sweep[..10].iter().all(|v| v.azimuth_in_degrees() == 0.0));
        assert_eq!(sweep[10].azimuth_in_degrees(), 10.0);
        assert_eq!(sweep[9].distance_in_meters(), 20.0);
        assert_eq!(sweep[0].id(), Some("1"));
    }

    #[test]
    fn test_centered_sweep_binds_center() {
        let center = MapLatLng::new(45.0, 5.0);
        let sweep = centered_sweep(&center, 2, 2, 1000.0, |_, _| 1.0);
        assert!(sweep.iter().all(|v| v.center().lat == 45.0));
        assert!(sweep[0].lat() > 45.0);
    }

    #[test]
    fn test_cartesian_grid_layout() {
        let cells = cartesian_grid(2, 3, (10.0, 20.0), 0.5, 0.1, |row, col| (row * 10 + col) as f64);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[4].latitude, 10.5);
        assert_eq!(cells[4].longitude, 20.5);
        assert_eq!(cells[4].value, 11.0);
        assert_eq!(cells[5].id.as_deref(), Some("6"));
    }

    #[test]
    fn test_wind_field_speeds() {
        let icons = wind_field(2, 2, (0.0, 0.0), 1.0);
        assert_eq!(icons.len(), 4);
        assert_eq!(icons[2].speed, 3.5);
        assert_eq!(icons[1].angle, 30.0);
    }
}
