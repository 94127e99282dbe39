//! Polar drawer: radar rays to screen sectors.

use std::sync::Arc;

use projection::map_tools::polar_distance_ratio;
use projection::{MapView, ScreenPoint};
use radar_common::{ColorScale, MapLatLng, PolarMapValue};
use tracing::{debug, warn};

use super::RenderState;
use crate::optimization::{
    select_optimization, DisplayPredicate, DrawerOptimization, PolarDrawerOptimization,
};
use crate::polar_grid::PolarGridValue;

/// Renders polar samples ordered ray by ray (all distances of an azimuth,
/// then the next azimuth).
pub struct PolarDrawer {
    kind: String,
    geo_values: Vec<PolarMapValue>,
    version: String,
    optimizations: Vec<PolarDrawerOptimization>,
    default_optimization: PolarDrawerOptimization,
    color_scale: ColorScale,
    range: Option<(f64, f64)>,
    view: Option<Arc<dyn MapView>>,
    predicate: Option<DisplayPredicate<PolarMapValue>>,
    last_render: Option<RenderState>,
}

impl PolarDrawer {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            geo_values: Vec::new(),
            version: String::new(),
            optimizations: Vec::new(),
            default_optimization: PolarDrawerOptimization::default(),
            color_scale: ColorScale::default(),
            range: None,
            view: None,
            predicate: None,
            last_render: None,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Bind the map projection and the optional display predicate.
    pub fn bind(&mut self, view: Arc<dyn MapView>, predicate: Option<DisplayPredicate<PolarMapValue>>) {
        self.view = Some(view);
        self.predicate = predicate;
    }

    pub fn set_view(&mut self, view: Arc<dyn MapView>) {
        self.view = Some(view);
    }

    pub fn view(&self) -> Option<&Arc<dyn MapView>> {
        self.view.as_ref()
    }

    /// Swap in the values of a new time frame.
    pub fn update_values(&mut self, values: Vec<PolarMapValue>, version: impl Into<String>) {
        self.geo_values = values;
        self.version = version.into();
    }

    pub fn values(&self) -> &[PolarMapValue] {
        &self.geo_values
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Replace the color scale, value range and optimization list.
    pub fn set_configuration(
        &mut self,
        theme: ColorScale,
        range: Option<(f64, f64)>,
        optimizations: Vec<PolarDrawerOptimization>,
    ) {
        self.color_scale = theme;
        self.range = range;
        self.optimizations = optimizations;
    }

    pub fn color_scale(&self) -> &ColorScale {
        &self.color_scale
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        self.range
    }

    pub fn optimizations(&self) -> &[PolarDrawerOptimization] {
        &self.optimizations
    }

    /// The optimization matching this drawer's type, or the default.
    pub fn get_optimization(&self) -> &PolarDrawerOptimization {
        select_optimization(&self.kind, &self.optimizations).unwrap_or(&self.default_optimization)
    }

    /// Whether a render for this center would differ from the last one.
    pub fn has_changed(&self, center: &MapLatLng, center_point: &ScreenPoint) -> bool {
        let (Some(last), Some(view)) = (&self.last_render, &self.view) else {
            return true;
        };
        let distance_ratio = self.distance_ratio(view.as_ref(), center, center_point);
        let possible_drawing = self.possible_drawing();
        last.differs(&self.version, center, center_point, distance_ratio, possible_drawing)
    }

    /// Emit one primitive per drawable sample (or per merged run when the
    /// optimization groups azimuths). Returns how many primitives `draw`
    /// reported as rendered.
    pub fn render_polar_map_values<F>(
        &mut self,
        center: &MapLatLng,
        center_point: &ScreenPoint,
        mut draw: F,
    ) -> usize
    where
        F: FnMut(PolarGridValue) -> bool,
    {
        let Some(view) = self.view.clone() else {
            warn!(drawer = %self.kind, "No map view bound, nothing to render");
            return 0;
        };

        let possible_drawing = self.possible_drawing();
        if self.geo_values.is_empty() {
            self.remember(center, center_point, 0.0, possible_drawing);
            return 0;
        }

        let distance_ratio = self.distance_ratio(view.as_ref(), center, center_point);
        if !(distance_ratio > 0.0 && distance_ratio.is_finite()) {
            warn!(drawer = %self.kind, distance_ratio, "Degenerate distance ratio, skipping render");
            return 0;
        }

        let (edge_count, azimuth_step) = ray_geometry(&self.geo_values);
        let edge = cell_depth(&self.geo_values, edge_count) * distance_ratio;
        let optimization = self.get_optimization().clone();
        let hard_limit = optimization.hard_limit();
        let grouping = optimization.group_azimuths();
        let filtered =
            optimization.filtering_values(view.zoom_level(), &self.geo_values, self.predicate.as_ref());

        let mut done = 0usize;
        // No draw call once `done` has passed the hard limit.
        let mut emit = |grid: PolarGridValue, done: &mut usize| {
            if *done <= hard_limit && draw(grid) {
                *done += 1;
            }
        };
        let mut pending: Option<PolarGridValue> = None;

        for (index, value) in filtered.iter().enumerate() {
            if done > hard_limit {
                warn!(drawer = %self.kind, hard_limit, "Hard limit reached, stopping render");
                pending = None;
                break;
            }

            let mut cell = value.duplicate();
            cell.set_center(center.clone());
            let grid = PolarGridValue::create(&cell, distance_ratio, &optimization, &self.color_scale)
                .with_geometry(azimuth_step, edge);

            if !grouping {
                emit(grid, &mut done);
                continue;
            }

            let displayed = self.predicate.as_ref().map_or(true, |p| p(&cell));
            if !displayed {
                if let Some(run) = pending.take() {
                    emit(run, &mut done);
                }
                continue;
            }

            pending = match pending.take() {
                Some(mut run) if run.can_merge(&grid) => {
                    run.merge(&grid);
                    Some(run)
                }
                Some(run) => {
                    emit(run, &mut done);
                    Some(grid)
                }
                None => Some(grid),
            };

            // last cell of a ray
            if get_next_offset(index, edge_count) == index + 1 {
                if let Some(run) = pending.take() {
                    emit(run, &mut done);
                }
            }
        }
        if let Some(run) = pending.take() {
            emit(run, &mut done);
        }

        debug!(drawer = %self.kind, version = %self.version, done, possible_drawing, "Polar render pass");
        self.remember(center, center_point, distance_ratio, possible_drawing);
        done
    }

    /// Run `f` on the values that pass the full optimization filter.
    pub fn get_exec_of_visible_points<R, F>(&self, values: &[PolarMapValue], f: F) -> R
    where
        F: FnOnce(Vec<&PolarMapValue>) -> R,
    {
        let zoom = self.view.as_ref().map_or(f64::INFINITY, |v| v.zoom_level());
        let filtered = self
            .get_optimization()
            .filtering_values(zoom, values, self.predicate.as_ref());
        f(filtered)
    }

    /// Run `f` on the values that pass the display predicate only.
    pub fn get_exec_of_window_points<R, F>(&self, values: &[PolarMapValue], f: F) -> R
    where
        F: FnOnce(Vec<&PolarMapValue>) -> R,
    {
        let in_window = values
            .iter()
            .filter(|v| self.predicate.as_ref().map_or(true, |p| p(*v)))
            .collect();
        f(in_window)
    }

    fn possible_drawing(&self) -> usize {
        self.get_exec_of_window_points(&self.geo_values, |points| points.len())
    }

    /// Pixels per meter, measured on the last sample re-centered on `center`.
    fn distance_ratio(&self, view: &dyn MapView, center: &MapLatLng, center_point: &ScreenPoint) -> f64 {
        let Some(last) = self.geo_values.last() else {
            return 0.0;
        };
        let mut sample = last.duplicate();
        sample.set_center(center.clone());
        let projected = view.project(sample.point());
        polar_distance_ratio(center_point, &projected, sample.distance_in_meters())
    }

    fn remember(
        &mut self,
        center: &MapLatLng,
        center_point: &ScreenPoint,
        distance_ratio: f64,
        possible_drawing: usize,
    ) {
        self.last_render = Some(RenderState {
            version: self.version.clone(),
            center: center.clone(),
            center_point: *center_point,
            distance_ratio,
            possible_drawing,
        });
    }
}

impl std::fmt::Debug for PolarDrawer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolarDrawer")
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("values", &self.geo_values.len())
            .field("optimizations", &self.optimizations)
            .finish()
    }
}

/// Index where the ray after the one holding `index` starts.
///
/// `(index + 1)` rounded up to a multiple of `edge_count`; an exact multiple
/// maps to itself.
pub fn get_next_offset(index: usize, edge_count: usize) -> usize {
    let edge_count = edge_count.max(1);
    let next = index + 1;
    if next % edge_count == 0 {
        next
    } else {
        (next / edge_count + 1) * edge_count
    }
}

/// Samples per ray and angular spacing between rays.
fn ray_geometry(values: &[PolarMapValue]) -> (usize, f64) {
    let Some(first) = values.first() else {
        return (1, 360.0);
    };
    let first_azimuth = first.azimuth_in_degrees();
    let edge_count = values
        .iter()
        .take_while(|v| v.azimuth_in_degrees() == first_azimuth)
        .count();
    let azimuth_step = values
        .iter()
        .find(|v| v.azimuth_in_degrees() != first_azimuth)
        .map_or(360.0, |v| (v.azimuth_in_degrees() - first_azimuth).rem_euclid(360.0));
    (edge_count.max(1), azimuth_step)
}

/// Radial spacing in meters between two samples of a ray.
fn cell_depth(values: &[PolarMapValue], edge_count: usize) -> f64 {
    match values {
        [first, second, ..] if edge_count >= 2 => {
            (second.distance_in_meters() - first.distance_in_meters()).abs()
        }
        [first, ..] => first.distance_in_meters(),
        [] => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_offset_examples() {
        assert_eq!(get_next_offset(0, 10), 10);
        assert_eq!(get_next_offset(9, 10), 10);
        assert_eq!(get_next_offset(10, 10), 20);
        assert_eq!(get_next_offset(99, 10), 100);
    }

    #[test]
    fn test_next_offset_properties() {
        for edge_count in 1..=12 {
            for index in 0..200 {
                let next = get_next_offset(index, edge_count);
                assert_eq!(next % edge_count, 0, "index={} edge={}", index, edge_count);
                assert!(next > index, "index={} edge={}", index, edge_count);
                assert!(next <= index + edge_count);
            }
        }
    }

    #[test]
    fn test_ray_geometry() {
        let values: Vec<PolarMapValue> = (0..4)
            .flat_map(|a| (1..=5).map(move |d| PolarMapValue::new(1.0, a as f64 * 2.5, d as f64 * 250.0)))
            .collect();
        let (edge_count, step) = ray_geometry(&values);
        assert_eq!(edge_count, 5);
        assert_eq!(step, 2.5);
        assert_eq!(cell_depth(&values, edge_count), 250.0);
    }

    #[test]
    fn test_single_ray_geometry() {
        let values = vec![PolarMapValue::new(1.0, 45.0, 100.0)];
        assert_eq!(ray_geometry(&values), (1, 360.0));
        assert_eq!(cell_depth(&values, 1), 100.0);
        assert_eq!(ray_geometry(&[]), (1, 360.0));
    }
}
