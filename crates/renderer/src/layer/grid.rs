use std::any::Any;
use std::sync::Arc;

use projection::MapView;
use radar_common::{ColorScale, MapLatLng};
use tracing::{debug, warn};

use super::{Layer, LayerState};
use crate::drawer::{CartesianDrawer, GridValueFactory, IconFactory, RectFactory};
use crate::optimization::{CartesianDrawerOptimization, DisplayPredicate};
use crate::surface::{DrawingSurface, Primitive};

/// A layer of lat/lng boxes, drawn by whatever `F` turns them into.
pub struct GridLayer<F: GridValueFactory> {
    state: LayerState,
    drawer: CartesianDrawer<F>,
    filter: Option<DisplayPredicate<F::Value>>,
    primitives: Vec<Primitive>,
}

/// Rectangles per grid cell.
pub type CartesianLayer = GridLayer<RectFactory>;

/// Wind arrows per grid point.
pub type IconLayer = GridLayer<IconFactory>;

impl CartesianLayer {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::with_drawer(id, CartesianDrawer::<RectFactory>::new(kind))
    }
}

impl IconLayer {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::with_drawer(id, CartesianDrawer::<IconFactory>::new(kind))
    }
}

impl<F: GridValueFactory> GridLayer<F> {
    pub fn with_drawer(id: impl Into<String>, drawer: CartesianDrawer<F>) -> Self {
        Self {
            state: LayerState::new(id),
            drawer,
            filter: None,
            primitives: Vec::new(),
        }
    }

    pub fn drawer(&self) -> &CartesianDrawer<F> {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut CartesianDrawer<F> {
        self.state.dirty = true;
        &mut self.drawer
    }

    pub fn set_configuration(
        &mut self,
        theme: ColorScale,
        range: Option<(f64, f64)>,
        optimizations: Vec<CartesianDrawerOptimization>,
    ) {
        self.drawer.set_configuration(theme, range, optimizations);
        self.state.dirty = true;
    }

    /// Extra display filter, combined with viewport containment.
    pub fn set_filter(&mut self, filter: Option<DisplayPredicate<F::Value>>) {
        self.filter = filter;
        if let Some(view) = self.drawer.view().cloned() {
            self.bind(view);
        }
        self.state.dirty = true;
    }

    /// Replace the values. Cells with a non-finite corner are skipped.
    pub fn set_values(&mut self, values: Vec<F::Value>, version: impl Into<String>) {
        let total = values.len();
        let kept: Vec<F::Value> = values
            .into_iter()
            .filter(|value| {
                let cell = value.as_ref();
                if !cell.is_valid() {
                    warn!(
                        layer = %self.state.id,
                        id = ?cell.id,
                        latitude = cell.latitude,
                        longitude = cell.longitude,
                        "Skipping cell with invalid position"
                    );
                    return false;
                }
                true
            })
            .collect();

        debug!(layer = %self.state.id, kept = kept.len(), total, "Grid values bound");
        self.drawer.update_values(kept, version);
        self.state.dirty = true;
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    fn bind(&mut self, view: Arc<dyn MapView>) {
        let culling = view.clone();
        let filter = self.filter.clone();
        let predicate: DisplayPredicate<F::Value> = Arc::new(move |value: &F::Value| {
            let in_view = culling.intersects(&value.as_ref().bounds());
            in_view && filter.as_ref().map_or(true, |f| f(value))
        });
        self.drawer.bind(view, Some(predicate));
    }
}

impl<F> Layer for GridLayer<F>
where
    F: GridValueFactory,
    F::Grid: Into<Primitive>,
{
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

        let center: MapLatLng = view.center();
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
            .render_cartesian_map_values(&center, &center_point, |grid| {
                let primitive: Primitive = grid.into();
                let painted = surface.paint(&id, &primitive, alpha);
                primitives.push(primitive);
                painted
            });

        self.state.finish();
        debug!(layer = %id, drawn, "Grid layer rendered");
        drawn
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<F: GridValueFactory> std::fmt::Debug for GridLayer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridLayer")
            .field("state", &self.state)
            .field("drawer", &self.drawer)
            .finish()
    }
}
