//! YAML configuration for a render run.
//!
//! Every section is optional; omitted values fall back to a Toulouse-area
//! demo scene.

use anyhow::{Context, Result};
use radar_common::{ColorScale, ColorScaleConfig, MapLatLng};
use renderer::{CartesianDrawerOptimization, PolarDrawerOptimization};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output: OutputConfig,
    pub view: ViewConfig,
    pub radar: RadarConfig,
    /// Threshold to CSS color; the built-in rain scale when absent.
    pub color_scale: Option<ColorScaleConfig>,
    pub polar_optimizations: Vec<PolarDrawerOptimization>,
    pub cartesian_optimizations: Vec<CartesianDrawerOptimization>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    /// Layer opacity in [0, 1].
    pub alpha: f32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            alpha: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            lat: 43.6,
            lng: 1.44,
            zoom: 7.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub id: String,
    /// Drawer type, matched against optimization types.
    pub kind: String,
    pub lat: f64,
    pub lng: f64,
    pub azimuths: usize,
    pub gates: usize,
    pub gate_meters: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            id: "toulouse".to_string(),
            kind: "radar-rain".to_string(),
            lat: 43.6,
            lng: 1.44,
            azimuths: 360,
            gates: 240,
            gate_meters: 500.0,
        }
    }
}

impl RadarConfig {
    pub fn center(&self) -> MapLatLng {
        MapLatLng::new(self.lat, self.lng).with_id(self.id.clone())
    }
}

impl RenderConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: RenderConfig = serde_yaml::from_str(yaml).context("Failed to parse render config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&contents).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.width == 0 || self.output.height == 0 {
            anyhow::bail!(
                "Output size must be positive, got {}x{}",
                self.output.width,
                self.output.height
            );
        }
        for optimization in &self.polar_optimizations {
            optimization.validate()?;
        }
        self.color_scale()?;
        Ok(())
    }

    pub fn color_scale(&self) -> Result<ColorScale> {
        match &self.color_scale {
            Some(config) => ColorScale::from_config(config).context("Invalid color scale"),
            None => Ok(ColorScale::radar()),
        }
    }
}
