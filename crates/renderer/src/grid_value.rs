//! Screen-ready values and the color-scale translation they start from.

use radar_common::ColorScale;
use serde::{Deserialize, Serialize};

/// Packed color plus transparency, the part every screen primitive shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridValue {
    /// 24-bit RGB packed as `0xRRGGBB`.
    pub color: u32,
    /// 0 is fully opaque, 1 fully invisible.
    pub transparency: f64,
    #[serde(default)]
    pub id: Option<String>,
}

impl GridValue {
    pub fn new(color: u32, transparency: f64, id: Option<String>) -> Self {
        Self {
            color,
            transparency,
            id,
        }
    }

    /// Translate a scalar intensity through a color scale.
    ///
    /// Walks the ascending stops and keeps the last one whose threshold is
    /// <= `value`; its index drives a logistic transparency curve so higher
    /// buckets are more opaque. Below the smallest threshold the value keeps
    /// the first color at full transparency.
    pub fn translate_color(value: f64, scale: &ColorScale) -> Self {
        let stops = scale.stops();
        let mut color = stops.first().map_or(0, |s| s.color);
        let mut transparency = 1.0;

        for (index, stop) in stops.iter().enumerate() {
            if stop.threshold > value {
                break;
            }
            color = stop.color;
            transparency = transparency_for_index(index);
        }

        Self::new(color, transparency, None)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        radar_common::style::unpack_rgb(self.color)
    }

    /// Opacity in [0, 1] after applying a layer alpha.
    pub fn opacity(&self, alpha: f32) -> f32 {
        ((1.0 - self.transparency.clamp(0.0, 1.0)) as f32 * alpha).clamp(0.0, 1.0)
    }

    pub fn is_visible(&self) -> bool {
        self.transparency < 1.0
    }
}

/// `1 - 1 / (1 + e^(-0.3 * index))`
pub fn transparency_for_index(index: usize) -> f64 {
    1.0 - 1.0 / (1.0 + (-0.3 * index as f64).exp())
}
