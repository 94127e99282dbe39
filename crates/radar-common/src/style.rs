//! Color-scale configuration.
//!
//! A color scale is supplied externally as a mapping from a stringified
//! numeric threshold to a CSS color:
//!
//! ```json
//! { "0.1": "rgb(220, 240, 255)", "0.5": "rgb(104, 202, 255)", "1.5": "#3096f0" }
//! ```
//!
//! Thresholds are parsed to numbers and sorted ascending, so the order of the
//! source mapping does not matter.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, RadarResult};

/// Raw color-scale mapping as found in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorScaleConfig(pub HashMap<String, String>);

impl ColorScaleConfig {
    pub fn from_json(json: &str) -> RadarResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> RadarResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> RadarResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Parse every entry into a color stop.
    pub fn stops(&self) -> RadarResult<Vec<ColorStop>> {
        self.0
            .iter()
            .map(|(threshold, color)| {
                let threshold: f64 = threshold
                    .trim()
                    .parse()
                    .map_err(|_| RadarError::InvalidThreshold(threshold.clone()))?;
                if !threshold.is_finite() {
                    return Err(RadarError::InvalidThreshold(threshold.to_string()));
                }
                Ok(ColorStop::new(threshold, parse_css_color(color)?))
            })
            .collect()
    }
}

/// One (threshold, packed RGB) entry of a color scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub threshold: f64,
    /// 24-bit RGB packed as `0xRRGGBB`.
    pub color: u32,
}

impl ColorStop {
    pub fn new(threshold: f64, color: u32) -> Self {
        Self { threshold, color }
    }
}

/// An ascending list of color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    stops: Vec<ColorStop>,
}

impl ColorScale {
    /// Build a scale from stops in any order.
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        stops.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Self { stops }
    }

    pub fn from_config(config: &ColorScaleConfig) -> RadarResult<Self> {
        let stops = config.stops()?;
        if stops.is_empty() {
            return Err(RadarError::EmptyColorScale);
        }
        Ok(Self::new(stops))
    }

    /// Rain-rate scale in mm/h.
    pub fn radar() -> Self {
        Self::new(vec![
            ColorStop::new(0.1, 0xDCF0FF),
            ColorStop::new(0.5, 0x68CAFF),
            ColorStop::new(1.5, 0x3096F0),
            ColorStop::new(3.0, 0x006ED2),
            ColorStop::new(5.0, 0x00C850),
            ColorStop::new(8.0, 0xFFE600),
            ColorStop::new(12.0, 0xFF9600),
            ColorStop::new(20.0, 0xF02800),
            ColorStop::new(40.0, 0xC80078),
            ColorStop::new(75.0, 0x8C00C8),
        ])
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Index of the last stop whose threshold is <= `value`.
    ///
    /// `None` when the value sits below the smallest threshold (or is NaN).
    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        let mut found = None;
        for (index, stop) in self.stops.iter().enumerate() {
            if stop.threshold > value || value.is_nan() {
                break;
            }
            found = Some(index);
        }
        found
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::radar()
    }
}

/// Parse `rgb(r, g, b)`, `rgba(r, g, b, a)` (alpha ignored) or `#rrggbb`
/// into a packed `0xRRGGBB` integer.
pub fn parse_css_color(color: &str) -> RadarResult<u32> {
    let trimmed = color.trim();
    let invalid = || RadarError::InvalidColor(color.to_string());

    if let Some(hex) = trimmed.strip_prefix('#') {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        return u32::from_str_radix(hex, 16).map_err(|_| invalid());
    }

    let inner = trimmed
        .strip_prefix("rgba(")
        .or_else(|| trimmed.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let channels: Vec<&str> = inner.split(',').map(str::trim).collect();
    if channels.len() < 3 || channels.len() > 4 {
        return Err(invalid());
    }

    let mut packed = 0u32;
    for channel in &channels[..3] {
        if channel.is_empty() || !channel.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let c: u8 = channel.parse().map_err(|_| invalid())?;
        packed = (packed << 8) | c as u32;
    }
    Ok(packed)
}

/// Split a packed color into (r, g, b).
pub fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}
