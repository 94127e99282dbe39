//! Radar overlay rendering.
//!
//! Turns polar sweeps and lat/lng grids into screen primitives:
//! - Grid values: color and transparency from a color scale
//! - Drawers: optimization-filtered render passes with change detection
//! - Layers: visibility state over a shared drawing surface
//! - Surfaces: in-memory recording and tiny-skia raster output
//! - Service: a single-writer tokio task owning the layer stack

pub mod canvas;
pub mod cartesian_grid;
pub mod drawer;
pub mod grid_value;
pub mod layer;
pub mod optimization;
pub mod polar_grid;
pub mod service;
pub mod surface;

pub use canvas::CanvasSurface;
pub use cartesian_grid::{CartesianGridValue, IconGridValue};
pub use drawer::{
    get_next_offset, CartesianDrawer, GridValueFactory, IconDrawer, IconFactory, PolarDrawer,
    RectDrawer, RectFactory,
};
pub use grid_value::GridValue;
pub use layer::{CartesianLayer, CompositeLayer, GridLayer, IconLayer, Layer, PolarLayer};
pub use optimization::{
    optimizations_from_json, polar_optimizations_from_json, select_optimization,
    CartesianDrawerOptimization, DisplayPredicate, DrawerOptimization, PolarDrawerOptimization,
};
pub use polar_grid::PolarGridValue;
pub use service::{spawn_render_service, RenderCommand, RenderHandle};
pub use surface::{DrawingSurface, Primitive, RecordingSurface};
