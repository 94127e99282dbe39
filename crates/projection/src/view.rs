//! The projection boundary between drawers and the host map.

use radar_common::{LatLngBounds, MapLatLng};

use crate::screen::ScreenPoint;

/// What a drawer needs from the map it renders onto.
pub trait MapView: Send + Sync {
    /// Pixel position of a geographic point.
    fn project(&self, point: &MapLatLng) -> ScreenPoint;

    /// Current zoom level (fractional zooms allowed).
    fn zoom_level(&self) -> f64;

    /// Whether the point lies inside the visible viewport.
    fn contains(&self, _point: &MapLatLng) -> bool {
        true
    }

    /// Whether any part of the box is visible.
    ///
    /// The default checks the box corners against [`MapView::contains`] and
    /// the viewport center against the box, which catches boxes larger than
    /// the viewport.
    fn intersects(&self, bounds: &LatLngBounds) -> bool {
        let corners = [
            MapLatLng::new(bounds.south, bounds.west),
            MapLatLng::new(bounds.north, bounds.west),
            MapLatLng::new(bounds.north, bounds.east),
            MapLatLng::new(bounds.south, bounds.east),
        ];
        corners.iter().any(|corner| self.contains(corner)) || bounds.contains(&self.center())
    }

    /// Geographic center of the viewport.
    fn center(&self) -> MapLatLng;
}

type ProjectFn = dyn Fn(&MapLatLng) -> ScreenPoint + Send + Sync;
type ZoomFn = dyn Fn() -> f64 + Send + Sync;
type ContainsFn = dyn Fn(&MapLatLng) -> bool + Send + Sync;

/// A [`MapView`] assembled from injected closures.
///
/// This is how a host map hands over its projection without the renderer
/// depending on it, and how tests run drawers without a map.
pub struct ClosureView {
    project: Box<ProjectFn>,
    zoom: Box<ZoomFn>,
    contains: Option<Box<ContainsFn>>,
    center: MapLatLng,
}

impl ClosureView {
    pub fn new<P, Z>(project: P, zoom: Z) -> Self
    where
        P: Fn(&MapLatLng) -> ScreenPoint + Send + Sync + 'static,
        Z: Fn() -> f64 + Send + Sync + 'static,
    {
        Self {
            project: Box::new(project),
            zoom: Box::new(zoom),
            contains: None,
            center: MapLatLng::default(),
        }
    }

    pub fn with_contains<C>(mut self, contains: C) -> Self
    where
        C: Fn(&MapLatLng) -> bool + Send + Sync + 'static,
    {
        self.contains = Some(Box::new(contains));
        self
    }

    pub fn with_center(mut self, center: MapLatLng) -> Self {
        self.center = center;
        self
    }
}

impl MapView for ClosureView {
    fn project(&self, point: &MapLatLng) -> ScreenPoint {
        (self.project)(point)
    }

    fn zoom_level(&self) -> f64 {
        (self.zoom)()
    }

    fn contains(&self, point: &MapLatLng) -> bool {
        self.contains.as_ref().map_or(true, |contains| contains(point))
    }

    fn center(&self) -> MapLatLng {
        self.center.clone()
    }
}

impl std::fmt::Debug for ClosureView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureView")
            .field("center", &self.center)
            .field("has_contains", &self.contains.is_some())
            .finish()
    }
}
