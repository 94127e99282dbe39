//! Geographic to screen-space conversions.
//!
//! The renderer never talks to a concrete map: it goes through [`MapView`],
//! which a host map integration implements (or builds from closures with
//! [`ClosureView`]). [`WebMercatorView`] is a self-contained viewport used by
//! the CLI and tests.

pub mod map_tools;
pub mod mercator;
pub mod screen;
pub mod view;

pub use mercator::WebMercatorView;
pub use screen::ScreenPoint;
pub use view::{ClosureView, MapView};
