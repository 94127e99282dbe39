//! Layers: a drawer plus visibility, bound to a shared surface.

mod composite;
mod grid;
mod polar;

pub use composite::CompositeLayer;
pub use grid::{CartesianLayer, GridLayer, IconLayer};
pub use polar::PolarLayer;

use std::any::Any;
use std::sync::Arc;

use projection::MapView;

use crate::drawer::PolarDrawer;
use crate::surface::DrawingSurface;

/// One renderable overlay.
pub trait Layer: Send + Any {
    fn id(&self) -> &str;

    fn is_visible(&self) -> bool;

    /// Layer opacity in [0, 1].
    fn alpha(&self) -> f32;

    /// Make the layer visible with the given opacity.
    fn set_visible(&mut self, alpha: f32);

    fn hide(&mut self);

    /// Rebind the map projection.
    fn set_view(&mut self, view: Arc<dyn MapView>);

    /// Repaint onto `surface` if anything changed; returns the primitives drawn.
    fn render(&mut self, surface: &mut dyn DrawingSurface) -> usize;

    /// The polar drawer, for layers that have one.
    fn polar_drawer(&self) -> Option<&PolarDrawer> {
        None
    }

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Visibility and paint bookkeeping shared by every layer.
#[derive(Debug, Clone)]
pub(crate) struct LayerState {
    pub id: String,
    pub visible: bool,
    pub alpha: f32,
    /// Forces the next render even when the drawer reports no change.
    pub dirty: bool,
    /// Whether the surface currently holds primitives from this layer.
    pub painted: bool,
}

impl LayerState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visible: false,
            alpha: 1.0,
            dirty: true,
            painted: false,
        }
    }

    pub fn show(&mut self, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if !self.visible || self.alpha != alpha {
            self.dirty = true;
        }
        self.visible = true;
        self.alpha = alpha;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Handle the hidden case of a render pass. Returns true when the pass
    /// should stop here.
    pub fn skip_hidden(&mut self, surface: &mut dyn DrawingSurface) -> bool {
        if self.visible {
            return false;
        }
        if self.painted {
            surface.clear(&self.id);
            self.painted = false;
            self.dirty = true;
        }
        true
    }

    /// Clear old primitives and attach on first paint.
    pub fn prepare(&mut self, surface: &mut dyn DrawingSurface) {
        if !surface.is_attached(&self.id) {
            surface.attach(&self.id);
        }
        if self.painted {
            surface.clear(&self.id);
        }
    }

    pub fn finish(&mut self) {
        self.dirty = false;
        self.painted = true;
    }
}
