//! Raster surface backed by tiny-skia.
//!
//! Each attached layer paints into its own pixmap so it can be cleared
//! without touching the others; [`CanvasSurface::flatten`] composites them
//! in attach order.

use std::path::Path;

use projection::ScreenPoint;
use radar_common::{RadarError, RadarResult};
use tiny_skia::{
    Color, FillRule, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};
use tracing::{debug, warn};

use crate::cartesian_grid::{CartesianGridValue, IconGridValue};
use crate::grid_value::GridValue;
use crate::polar_grid::PolarGridValue;
use crate::surface::{DrawingSurface, Primitive};

/// Arc segments per degree of sector width.
const ARC_SEGMENTS_PER_DEGREE: f64 = 0.5;

const ICON_STROKE_WIDTH: f32 = 1.5;

/// Arrow head length as a share of the shaft.
const ICON_HEAD_RATIO: f64 = 0.3;

pub struct CanvasSurface {
    width: u32,
    height: u32,
    layers: Vec<(String, Pixmap)>,
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32) -> RadarResult<Self> {
        if Pixmap::new(width, height).is_none() {
            return Err(RadarError::RenderError(format!(
                "Invalid canvas size {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            layers: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Composite all layer pixmaps in attach order.
    pub fn flatten(&self) -> RadarResult<Pixmap> {
        let mut canvas = Pixmap::new(self.width, self.height)
            .ok_or_else(|| RadarError::RenderError("Failed to create pixmap".to_string()))?;
        canvas.fill(Color::TRANSPARENT);
        for (_, layer) in &self.layers {
            canvas.draw_pixmap(
                0,
                0,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
        Ok(canvas)
    }

    pub fn encode_png(&self) -> RadarResult<Vec<u8>> {
        self.flatten()?
            .encode_png()
            .map_err(|e| RadarError::RenderError(format!("PNG encoding failed: {}", e)))
    }

    pub fn write_png(&self, path: impl AsRef<Path>) -> RadarResult<()> {
        let png = self.encode_png()?;
        std::fs::write(path.as_ref(), &png)?;
        debug!(path = %path.as_ref().display(), bytes = png.len(), "Canvas written");
        Ok(())
    }

    fn layer_pixmap(&mut self, layer_id: &str) -> Option<&mut Pixmap> {
        self.layers
            .iter_mut()
            .find(|(id, _)| id == layer_id)
            .map(|(_, pixmap)| pixmap)
    }
}

impl std::fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.layers.iter().map(|(id, _)| id.as_str()).collect();
        f.debug_struct("CanvasSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layers", &ids)
            .finish()
    }
}

impl DrawingSurface for CanvasSurface {
    fn attach(&mut self, layer_id: &str) {
        if self.is_attached(layer_id) {
            return;
        }
        match Pixmap::new(self.width, self.height) {
            Some(pixmap) => self.layers.push((layer_id.to_string(), pixmap)),
            None => warn!(layer = %layer_id, "Failed to allocate layer pixmap"),
        }
    }

    fn is_attached(&self, layer_id: &str) -> bool {
        self.layers.iter().any(|(id, _)| id == layer_id)
    }

    fn clear(&mut self, layer_id: &str) {
        if let Some(pixmap) = self.layer_pixmap(layer_id) {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    fn paint(&mut self, layer_id: &str, primitive: &Primitive, alpha: f32) -> bool {
        let Some(paint) = fill_paint(&primitive.grid(), alpha) else {
            return false;
        };
        let Some(pixmap) = self.layer_pixmap(layer_id) else {
            return false;
        };
        match primitive {
            Primitive::PolarCell { center, cell } => fill_sector(pixmap, center, cell, &paint),
            Primitive::Rect(rect) => fill_rect(pixmap, rect, &paint),
            Primitive::Icon(icon) => stroke_arrow(pixmap, icon, &paint),
        }
    }
}

fn fill_paint(grid: &GridValue, alpha: f32) -> Option<Paint<'static>> {
    let opacity = grid.opacity(alpha);
    if opacity <= 0.0 {
        return None;
    }
    let (r, g, b) = grid.rgb();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, (opacity * 255.0).round() as u8);
    paint.anti_alias = true;
    Some(paint)
}

fn fill_sector(pixmap: &mut Pixmap, center: &ScreenPoint, cell: &PolarGridValue, paint: &Paint) -> bool {
    let (inner, outer) = cell.radii();
    if outer <= inner || cell.azimuth_step <= 0.0 {
        return false;
    }

    let start = cell.azimuth - cell.azimuth_step / 2.0;
    let end = cell.azimuth + cell.azimuth_step / 2.0;
    let segments = ((cell.azimuth_step * ARC_SEGMENTS_PER_DEGREE).ceil() as usize).max(2);
    let at = |degrees: f64, radius: f64| {
        let radians = degrees.to_radians();
        (
            (center.x + radius * radians.sin()) as f32,
            (center.y - radius * radians.cos()) as f32,
        )
    };

    let mut pb = PathBuilder::new();
    let (x, y) = at(start, outer);
    pb.move_to(x, y);
    for i in 1..=segments {
        let (x, y) = at(start + (end - start) * i as f64 / segments as f64, outer);
        pb.line_to(x, y);
    }
    for i in (0..=segments).rev() {
        let (x, y) = at(start + (end - start) * i as f64 / segments as f64, inner);
        pb.line_to(x, y);
    }
    pb.close();

    match pb.finish() {
        Some(path) => {
            pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
            true
        }
        None => false,
    }
}

fn fill_rect(pixmap: &mut Pixmap, rect: &CartesianGridValue, paint: &Paint) -> bool {
    match Rect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32) {
        Some(area) => {
            pixmap.fill_rect(area, paint, Transform::identity(), None);
            true
        }
        None => false,
    }
}

fn stroke_arrow(pixmap: &mut Pixmap, icon: &IconGridValue, paint: &Paint) -> bool {
    let (dx, dy) = icon.vector();
    if dx == 0.0 && dy == 0.0 {
        return false;
    }
    let anchor = icon.anchor();
    let tip = icon.tip();

    // head: two barbs rotated +-150 degrees from the shaft direction
    let head = |turn: f64| {
        let (sin, cos) = turn.to_radians().sin_cos();
        (
            (tip.x + (dx * cos - dy * sin) * ICON_HEAD_RATIO) as f32,
            (tip.y + (dx * sin + dy * cos) * ICON_HEAD_RATIO) as f32,
        )
    };

    let mut pb = PathBuilder::new();
    pb.move_to(anchor.x as f32, anchor.y as f32);
    pb.line_to(tip.x as f32, tip.y as f32);
    let (lx, ly) = head(150.0);
    pb.line_to(lx, ly);
    pb.move_to(tip.x as f32, tip.y as f32);
    let (rx, ry) = head(-150.0);
    pb.line_to(rx, ry);

    let stroke = Stroke {
        width: ICON_STROKE_WIDTH,
        line_cap: LineCap::Round,
        ..Stroke::default()
    };
    match pb.finish() {
        Some(path) => {
            pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64, transparency: f64) -> Primitive {
        Primitive::Rect(CartesianGridValue {
            x,
            y,
            width: w,
            height: h,
            color: 0xFF0000,
            transparency,
            id: None,
            value: 1.0,
        })
    }

    fn pixel(surface: &CanvasSurface, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let pixmap = surface.flatten().unwrap();
        let p = pixmap.pixel(x, y).unwrap();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(CanvasSurface::new(0, 10).is_err());
    }

    #[test]
    fn test_rect_fills_pixels() {
        let mut surface = CanvasSurface::new(20, 20).unwrap();
        surface.attach("cells");
        assert!(surface.paint("cells", &rect(5.0, 5.0, 10.0, 10.0, 0.0), 1.0));
        assert_eq!(pixel(&surface, 10, 10), (255, 0, 0, 255));
        assert_eq!(pixel(&surface, 1, 1).3, 0);
    }

    #[test]
    fn test_invisible_and_unattached_paint_nothing() {
        let mut surface = CanvasSurface::new(20, 20).unwrap();
        assert!(!surface.paint("cells", &rect(0.0, 0.0, 5.0, 5.0, 0.0), 1.0));
        surface.attach("cells");
        assert!(!surface.paint("cells", &rect(0.0, 0.0, 5.0, 5.0, 1.0), 1.0));
        assert!(!surface.paint("cells", &rect(0.0, 0.0, 5.0, 5.0, 0.0), 0.0));
    }

    #[test]
    fn test_clear_only_touches_one_layer() {
        let mut surface = CanvasSurface::new(20, 20).unwrap();
        surface.attach("a");
        surface.attach("b");
        surface.attach("a");
        surface.paint("a", &rect(0.0, 0.0, 10.0, 10.0, 0.0), 1.0);
        surface.paint("b", &rect(10.0, 10.0, 10.0, 10.0, 0.0), 1.0);

        surface.clear("a");
        assert_eq!(pixel(&surface, 5, 5).3, 0);
        assert_eq!(pixel(&surface, 15, 15).3, 255);
        assert!(format!("{:?}", surface).contains("[\"a\", \"b\"]"));
    }

    #[test]
    fn test_sector_north_of_center() {
        let mut surface = CanvasSurface::new(100, 100).unwrap();
        surface.attach("radar");
        let cell = PolarGridValue {
            color: 0x00FF00,
            transparency: 0.0,
            id: None,
            value: 3.0,
            azimuth: 0.0,
            distance: 20.0,
            distance_end: 20.0,
            azimuth_step: 20.0,
            edge: 10.0,
        };
        let primitive = Primitive::PolarCell {
            center: ScreenPoint::new(50.0, 50.0),
            cell,
        };
        assert!(surface.paint("radar", &primitive, 1.0));
        // north is up: the sector covers y = 50 - 25
        assert_eq!(pixel(&surface, 50, 25).1, 255);
        assert_eq!(pixel(&surface, 50, 75).3, 0);
    }

    #[test]
    fn test_png_signature() {
        let mut surface = CanvasSurface::new(8, 8).unwrap();
        surface.attach("cells");
        surface.paint("cells", &rect(0.0, 0.0, 4.0, 4.0, 0.0), 1.0);
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
