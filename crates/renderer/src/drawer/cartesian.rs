//! Cartesian drawers: rectangles for grid cells, arrows for icons.
//!
//! Both share one drawer body; what differs is how a value becomes a screen
//! primitive and whether the optimization is fixed. That difference lives in
//! a [`GridValueFactory`].

use std::sync::Arc;

use projection::map_tools::cartesian_distance_ratio;
use projection::{MapView, ScreenPoint};
use radar_common::{CartesianMapValue, ColorScale, IconMapValue, MapLatLng, MeasuredValue};
use tracing::{debug, warn};

use super::RenderState;
use crate::cartesian_grid::{CartesianGridValue, IconGridValue};
use crate::optimization::{
    select_optimization, CartesianDrawerOptimization, DisplayPredicate, DrawerOptimization,
    DEFAULT_HARD_LIMIT,
};

/// Turns a cartesian domain value into its screen primitive.
pub trait GridValueFactory: Send + Sync + 'static {
    type Value: MeasuredValue + AsRef<CartesianMapValue> + Clone + Send + Sync + 'static;
    type Grid: Clone + std::fmt::Debug;

    fn create(&self, value: &Self::Value, view: &dyn MapView, scale: &ColorScale) -> Self::Grid;

    /// An optimization that always applies, ignoring the configured list.
    fn fixed_optimization(&self) -> Option<CartesianDrawerOptimization> {
        None
    }
}

/// Axis-aligned rectangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectFactory;

impl GridValueFactory for RectFactory {
    type Value = CartesianMapValue;
    type Grid = CartesianGridValue;

    fn create(&self, value: &CartesianMapValue, view: &dyn MapView, scale: &ColorScale) -> CartesianGridValue {
        CartesianGridValue::create(value, view, scale)
    }
}

/// Speed/direction arrows.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconFactory;

/// Type of the optimization every icon drawer runs with.
pub const ICON_OPTIMIZATION_TYPE: &str = "icon";

impl GridValueFactory for IconFactory {
    type Value = IconMapValue;
    type Grid = IconGridValue;

    fn create(&self, value: &IconMapValue, view: &dyn MapView, scale: &ColorScale) -> IconGridValue {
        IconGridValue::create(value, view, scale)
    }

    fn fixed_optimization(&self) -> Option<CartesianDrawerOptimization> {
        Some(CartesianDrawerOptimization::new(ICON_OPTIMIZATION_TYPE, DEFAULT_HARD_LIMIT / 2))
    }
}

pub type RectDrawer = CartesianDrawer<RectFactory>;
pub type IconDrawer = CartesianDrawer<IconFactory>;

pub struct CartesianDrawer<F: GridValueFactory> {
    factory: F,
    kind: String,
    geo_values: Vec<F::Value>,
    version: String,
    optimizations: Vec<CartesianDrawerOptimization>,
    default_optimization: CartesianDrawerOptimization,
    color_scale: ColorScale,
    range: Option<(f64, f64)>,
    view: Option<Arc<dyn MapView>>,
    predicate: Option<DisplayPredicate<F::Value>>,
    last_render: Option<RenderState>,
}

impl CartesianDrawer<RectFactory> {
    pub fn new(kind: impl Into<String>) -> Self {
        Self::with_factory(kind, RectFactory)
    }
}

impl CartesianDrawer<IconFactory> {
    pub fn new(kind: impl Into<String>) -> Self {
        Self::with_factory(kind, IconFactory)
    }
}

impl<F: GridValueFactory> CartesianDrawer<F> {
    pub fn with_factory(kind: impl Into<String>, factory: F) -> Self {
        let default_optimization = factory.fixed_optimization().unwrap_or_default();
        Self {
            factory,
            kind: kind.into(),
            geo_values: Vec::new(),
            version: String::new(),
            optimizations: Vec::new(),
            default_optimization,
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

    pub fn bind(&mut self, view: Arc<dyn MapView>, predicate: Option<DisplayPredicate<F::Value>>) {
        self.view = Some(view);
        self.predicate = predicate;
    }

    pub fn set_view(&mut self, view: Arc<dyn MapView>) {
        self.view = Some(view);
    }

    pub fn view(&self) -> Option<&Arc<dyn MapView>> {
        self.view.as_ref()
    }

    pub fn update_values(&mut self, values: Vec<F::Value>, version: impl Into<String>) {
        self.geo_values = values;
        self.version = version.into();
    }

    pub fn values(&self) -> &[F::Value] {
        &self.geo_values
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_configuration(
        &mut self,
        theme: ColorScale,
        range: Option<(f64, f64)>,
        optimizations: Vec<CartesianDrawerOptimization>,
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

    pub fn optimizations(&self) -> &[CartesianDrawerOptimization] {
        &self.optimizations
    }

    /// The fixed optimization when the factory has one, otherwise the single
    /// configured match or the default.
    pub fn get_optimization(&self) -> &CartesianDrawerOptimization {
        if self.factory.fixed_optimization().is_some() {
            return &self.default_optimization;
        }
        select_optimization(&self.kind, &self.optimizations).unwrap_or(&self.default_optimization)
    }

    pub fn has_changed(&self, center: &MapLatLng, center_point: &ScreenPoint) -> bool {
        let (Some(last), Some(view)) = (&self.last_render, &self.view) else {
            return true;
        };
        let distance_ratio = self.distance_ratio(view.as_ref(), center, center_point);
        last.differs(&self.version, center, center_point, distance_ratio, self.possible_drawing())
    }

    /// Emit one primitive per drawable value. Returns how many primitives
    /// `draw` reported as rendered.
    pub fn render_cartesian_map_values<D>(
        &mut self,
        center: &MapLatLng,
        center_point: &ScreenPoint,
        mut draw: D,
    ) -> usize
    where
        D: FnMut(F::Grid) -> bool,
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

        let optimization = self.get_optimization().clone();
        let hard_limit = optimization.hard_limit();
        let filtered =
            optimization.filtering_values(view.zoom_level(), &self.geo_values, self.predicate.as_ref());

        let mut done = 0usize;
        for value in filtered {
            if done > hard_limit {
                warn!(drawer = %self.kind, hard_limit, "Hard limit reached, stopping render");
                break;
            }
            if draw(self.factory.create(value, view.as_ref(), &self.color_scale)) {
                done += 1;
            }
        }

        debug!(drawer = %self.kind, version = %self.version, done, possible_drawing, "Cartesian render pass");
        self.remember(center, center_point, distance_ratio, possible_drawing);
        done
    }

    pub fn get_exec_of_visible_points<R, G>(&self, values: &[F::Value], f: G) -> R
    where
        G: FnOnce(Vec<&F::Value>) -> R,
    {
        let zoom = self.view.as_ref().map_or(f64::INFINITY, |v| v.zoom_level());
        let filtered = self
            .get_optimization()
            .filtering_values(zoom, values, self.predicate.as_ref());
        f(filtered)
    }

    pub fn get_exec_of_window_points<R, G>(&self, values: &[F::Value], f: G) -> R
    where
        G: FnOnce(Vec<&F::Value>) -> R,
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

    /// Pixels per meter, measured from the center to the last cell's corner.
    fn distance_ratio(&self, view: &dyn MapView, center: &MapLatLng, center_point: &ScreenPoint) -> f64 {
        let Some(last) = self.geo_values.last() else {
            return 0.0;
        };
        let corner = last.as_ref().corner();
        let projected = view.project(&corner);
        cartesian_distance_ratio(center, center_point, &corner, &projected)
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

impl<F: GridValueFactory> std::fmt::Debug for CartesianDrawer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartesianDrawer")
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("values", &self.geo_values.len())
            .field("optimizations", &self.optimizations)
            .finish()
    }
}
