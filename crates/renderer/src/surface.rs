//! Drawing surfaces shared by layers.
//!
//! A surface receives primitives tagged with the id of the layer that
//! produced them. Layers attach once, then clear and repaint their own
//! primitives on every effective render pass.

use std::collections::HashMap;

use projection::ScreenPoint;

use crate::cartesian_grid::{CartesianGridValue, IconGridValue};
use crate::grid_value::GridValue;
use crate::polar_grid::PolarGridValue;

/// A screen-ready shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Annular sector around a projected radar center.
    PolarCell {
        center: ScreenPoint,
        cell: PolarGridValue,
    },
    Rect(CartesianGridValue),
    Icon(IconGridValue),
}

impl Primitive {
    pub fn grid(&self) -> GridValue {
        match self {
            Primitive::PolarCell { cell, .. } => cell.grid(),
            Primitive::Rect(rect) => rect.grid(),
            Primitive::Icon(icon) => icon.grid(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Primitive::PolarCell { cell, .. } => cell.id.as_deref(),
            Primitive::Rect(rect) => rect.id.as_deref(),
            Primitive::Icon(icon) => icon.id.as_deref(),
        }
    }
}

impl From<CartesianGridValue> for Primitive {
    fn from(rect: CartesianGridValue) -> Self {
        Primitive::Rect(rect)
    }
}

impl From<IconGridValue> for Primitive {
    fn from(icon: IconGridValue) -> Self {
        Primitive::Icon(icon)
    }
}

/// Target of layer render passes.
pub trait DrawingSurface: Send {
    /// Register a layer with the surface.
    fn attach(&mut self, layer_id: &str);

    fn is_attached(&self, layer_id: &str) -> bool;

    /// Drop every primitive previously painted by the layer.
    fn clear(&mut self, layer_id: &str);

    /// Paint one primitive; returns whether anything was actually drawn.
    fn paint(&mut self, layer_id: &str, primitive: &Primitive, alpha: f32) -> bool;
}

/// In-memory surface that keeps what it was given.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    attach_counts: HashMap<String, usize>,
    painted: HashMap<String, Vec<(Primitive, f32)>>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `attach` was called for the layer.
    pub fn attach_count(&self, layer_id: &str) -> usize {
        self.attach_counts.get(layer_id).copied().unwrap_or(0)
    }

    pub fn primitives(&self, layer_id: &str) -> &[(Primitive, f32)] {
        self.painted.get(layer_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_primitives(&self) -> usize {
        self.painted.values().map(Vec::len).sum()
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl DrawingSurface for RecordingSurface {
    fn attach(&mut self, layer_id: &str) {
        *self.attach_counts.entry(layer_id.to_string()).or_insert(0) += 1;
    }

    fn is_attached(&self, layer_id: &str) -> bool {
        self.attach_counts.contains_key(layer_id)
    }

    fn clear(&mut self, layer_id: &str) {
        self.clears += 1;
        if let Some(painted) = self.painted.get_mut(layer_id) {
            painted.clear();
        }
    }

    fn paint(&mut self, layer_id: &str, primitive: &Primitive, alpha: f32) -> bool {
        self.painted
            .entry(layer_id.to_string())
            .or_default()
            .push((primitive.clone(), alpha));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str) -> Primitive {
        Primitive::Rect(CartesianGridValue {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            color: 0xFF0000,
            transparency: 0.0,
            id: Some(id.to_string()),
            value: 5.0,
        })
    }

    #[test]
    fn test_recording_surface_keeps_layers_apart() {
        let mut surface = RecordingSurface::new();
        surface.attach("a");
        assert!(surface.paint("a", &rect("1"), 1.0));
        assert!(surface.paint("b", &rect("2"), 0.5));

        assert_eq!(surface.primitives("a").len(), 1);
        assert_eq!(surface.primitives("b")[0].1, 0.5);
        assert_eq!(surface.total_primitives(), 2);
        assert!(surface.is_attached("a"));
        assert!(!surface.is_attached("b"));

        surface.clear("a");
        assert!(surface.primitives("a").is_empty());
        assert_eq!(surface.total_primitives(), 1);
        assert_eq!(surface.clear_count(), 1);
    }

    #[test]
    fn test_primitive_accessors() {
        let primitive = rect("42");
        assert_eq!(primitive.id(), Some("42"));
        assert_eq!(primitive.grid().color, 0xFF0000);
        assert_eq!(RecordingSurface::new().attach_count("missing"), 0);
    }
}
