use std::any::Any;
use std::sync::Arc;

use projection::MapView;
use radar_common::{ColorScale, MapLatLng, PolarMapValue};
use tracing::{debug, warn};

use super::{Layer, LayerState};
use crate::drawer::PolarDrawer;
use crate::optimization::{DisplayPredicate, PolarDrawerOptimization};
use crate::surface::{DrawingSurface, Primitive};

/// A radar sweep drawn as sectors around the radar site.
pub struct PolarLayer {
    state: LayerState,
    radar_center: MapLatLng,
    drawer: PolarDrawer,
    filter: Option<DisplayPredicate<PolarMapValue>>,
    primitives: Vec<Primitive>,
}

impl PolarLayer {
    /// `kind` selects the optimization (see `select_optimization`).
    pub fn new(id: impl Into<String>, kind: impl Into<String>, radar_center: MapLatLng) -> Self {
        Self {
            state: LayerState::new(id),
            radar_center,
            drawer: PolarDrawer::new(kind),
            filter: None,
            primitives: Vec::new(),
        }
    }

    pub fn radar_center(&self) -> &MapLatLng {
        &self.radar_center
    }

    pub fn drawer(&self) -> &PolarDrawer {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut PolarDrawer {
        self.state.dirty = true;
        &mut self.drawer
    }

    pub fn set_configuration(
        &mut self,
        theme: ColorScale,
        range: Option<(f64, f64)>,
        optimizations: Vec<PolarDrawerOptimization>,
    ) {
        self.drawer.set_configuration(theme, range, optimizations);
        self.state.dirty = true;
    }

    /// Extra display filter, combined with viewport containment.
    pub fn set_filter(&mut self, filter: Option<DisplayPredicate<PolarMapValue>>) {
        self.filter = filter;
        if let Some(view) = self.drawer.view().cloned() {
            self.bind(view);
        }
        self.state.dirty = true;
    }

    /// Bind a new sweep to the radar site. Samples whose position cannot
    /// be computed are skipped.
    pub fn set_values(&mut self, values: Vec<PolarMapValue>, version: impl Into<String>) {
        let total = values.len();
        let centered: Vec<PolarMapValue> = values
            .into_iter()
            .map(|mut value| {
                value.set_center(self.radar_center.clone());
                value
            })
            .filter(|value| {
                let valid = value.point().is_valid() && value.value().is_finite();
                if !valid {
                    warn!(
                        layer = %self.state.id,
                        azimuth = value.azimuth_in_degrees(),
                        distance = value.distance_in_meters(),
                        "Skipping polar value with invalid position"
                    );
                }
                valid
            })
            .collect();

        debug!(layer = %self.state.id, kept = centered.len(), total, "Polar values bound");
        self.drawer.update_values(centered, version);
        self.state.dirty = true;
    }

    /// Primitives produced by the last effective render.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    fn bind(&mut self, view: Arc<dyn MapView>) {
        let culling = view.clone();
        let filter = self.filter.clone();
        let predicate: DisplayPredicate<PolarMapValue> = Arc::new(move |value: &PolarMapValue| {
            culling.contains(value.point()) && filter.as_ref().map_or(true, |f| f(value))
        });
        self.drawer.bind(view, Some(predicate));
    }
}

impl Layer for PolarLayer {
    fn id(&self) -> &str {
        &self.state.id
    }

    fn is_visible(&self) -> bool {
        self.state.visible
    }

    fn alpha(&self) -> f32 {
        self.state.alpha
    }

    fn set_visible(&mut self, alpha: f32) {
        self.state.show(alpha);
    }

    fn hide(&mut self) {
        self.state.hide();
    }

    fn set_view(&mut self, view: Arc<dyn MapView>) {
        self.bind(view);
        self.state.dirty = true;
    }

    fn render(&mut self, surface: &mut dyn DrawingSurface) -> usize {
        if self.state.skip_hidden(surface) {
            self.primitives.clear();
            return 0;
        }
        let Some(view) = self.drawer.view().cloned() else {
            warn!(layer = %self.state.id, "Layer has no map view, skipping render");
            return 0;
        };

        let center = self.radar_center.clone();
        let center_point = view.project(&center);
        if !self.state.dirty && !self.drawer.has_changed(&center, &center_point) {
            return 0;
        }

        self.state.prepare(surface);
        self.primitives.clear();

        let id = self.state.id.clone();
        let alpha = self.state.alpha;
        let primitives = &mut self.primitives;
        let drawn = self
            .drawer
            .render_polar_map_values(&center, &center_point, |cell| {
                let primitive = Primitive::PolarCell {
                    center: center_point,
                    cell,
                };
                let painted = surface.paint(&id, &primitive, alpha);
                primitives.push(primitive);
                painted
            });

        self.state.finish();
        debug!(layer = %id, drawn, "Polar layer rendered");
        drawn
    }

    fn polar_drawer(&self) -> Option<&PolarDrawer> {
        Some(&self.drawer)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl std::fmt::Debug for PolarLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolarLayer")
            .field("state", &self.state)
            .field("radar_center", &self.radar_center)
            .field("drawer", &self.drawer)
            .finish()
    }
}
