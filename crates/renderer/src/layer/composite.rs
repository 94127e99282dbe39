use std::sync::Arc;

use projection::MapView;
use radar_common::{RadarError, RadarResult};
use tracing::{debug, info};

use super::Layer;
use crate::drawer::PolarDrawer;
use crate::surface::DrawingSurface;

/// An ordered stack of layers sharing one drawing surface.
///
/// Visibility changes trigger one aggregate render pass; the returned count
/// is the number of primitives drawn in that pass.
pub struct CompositeLayer<S: DrawingSurface> {
    layers: Vec<Box<dyn Layer>>,
    surface: S,
    view: Option<Arc<dyn MapView>>,
}

impl<S: DrawingSurface> CompositeLayer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            layers: Vec::new(),
            surface,
            view: None,
        }
    }

    /// Append a layer, binding it to the current view if one is set.
    pub fn add_layer(&mut self, mut layer: Box<dyn Layer>) {
        if let Some(view) = &self.view {
            layer.set_view(view.clone());
        }
        debug!(layer = %layer.id(), position = self.layers.len(), "Layer added");
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Look up a layer by exact id and concrete type.
    pub fn layer_mut<L: Layer>(&mut self, id: &str) -> RadarResult<&mut L> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id() == id)
            .ok_or_else(|| RadarError::LayerNotFound(id.to_string()))?;
        layer
            .as_any_mut()
            .downcast_mut::<L>()
            .ok_or_else(|| RadarError::LayerKindMismatch(id.to_string()))
    }

    /// Rebind every layer to a new map view.
    pub fn set_view(&mut self, view: Arc<dyn MapView>) {
        for layer in &mut self.layers {
            layer.set_view(view.clone());
        }
        self.view = Some(view);
    }

    /// Show every layer whose id contains `id`; other layers keep their
    /// visibility.
    pub fn show(&mut self, id: &str, alpha: f32) -> usize {
        for layer in self.layers.iter_mut().filter(|l| l.id().contains(id)) {
            layer.set_visible(alpha);
        }
        self.render()
    }

    /// Show the first layer whose id contains `id` and hide all others.
    pub fn show_the_first_matching_id(&mut self, id: &str, alpha: f32) -> usize {
        let first = self.layers.iter().position(|l| l.id().contains(id));
        for (index, layer) in self.layers.iter_mut().enumerate() {
            if Some(index) == first {
                layer.set_visible(alpha);
            } else {
                layer.hide();
            }
        }
        self.render()
    }

    pub fn show_all(&mut self, alpha: f32) -> usize {
        for layer in &mut self.layers {
            layer.set_visible(alpha);
        }
        self.render()
    }

    pub fn hide_all(&mut self) -> usize {
        for layer in &mut self.layers {
            layer.hide();
        }
        self.render()
    }

    /// Render every layer in order; hidden layers only clear what they
    /// painted before.
    pub fn render(&mut self) -> usize {
        let mut total = 0;
        for layer in &mut self.layers {
            total += layer.render(&mut self.surface);
        }
        let visible = self.layers.iter().filter(|l| l.is_visible()).count();
        info!(layers = self.layers.len(), visible, drawn = total, "Composite render pass");
        total
    }

    /// The drawer of the first polar layer.
    pub fn get_first_drawer(&self) -> Option<&PolarDrawer> {
        self.layers.iter().find_map(|l| l.polar_drawer())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
