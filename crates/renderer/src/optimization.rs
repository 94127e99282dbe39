//! Draw optimization policies.
//!
//! An optimization decides which values are worth drawing for the current
//! zoom and how many primitives a single pass may emit. Drawers pick theirs
//! by matching the optimization `type` inside their own type string.

use std::sync::Arc;

use radar_common::{MeasuredValue, RadarError, RadarResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Caller-supplied display test, typically viewport containment.
pub type DisplayPredicate<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

/// Polar values at or below this are not significant.
pub const POLAR_VALUE_FLOOR: f64 = 0.0;

/// Cartesian values at or below this are not significant.
pub const CARTESIAN_VALUE_FLOOR: f64 = 0.4;

/// Below this zoom, polar values are thinned.
pub const POLAR_ZOOM_LIMIT: f64 = 10.0;

/// Below this zoom, cartesian values are thinned.
pub const CARTESIAN_ZOOM_LIMIT: f64 = 8.0;

/// Hard limit of the fallback optimizations.
pub const DEFAULT_HARD_LIMIT: usize = 20_000;

/// Optimization type that switches polar azimuth grouping on.
pub const GROUPING_TYPE: &str = "???";

/// Optimization type that keeps the color-scale transparency for polar cells.
pub const RAIN_TYPE: &str = "rain";

/// Behaviour shared by polar and cartesian optimizations.
pub trait DrawerOptimization {
    /// Name matched against the drawer type.
    fn kind(&self) -> &str;

    /// Maximum primitives drawn per pass.
    fn hard_limit(&self) -> usize;

    /// Drop non-significant values, apply `predicate`, then thin by zoom.
    fn filtering_values<'a, V: MeasuredValue>(
        &self,
        zoom_level: f64,
        values: &'a [V],
        predicate: Option<&DisplayPredicate<V>>,
    ) -> Vec<&'a V>;
}

fn default_hard_limit() -> usize {
    DEFAULT_HARD_LIMIT
}

fn default_max() -> f64 {
    10.0
}

fn default_step() -> f64 {
    1.0
}

/// Policy for polar drawers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolarDrawerOptimization {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default = "default_hard_limit")]
    hard_limit: usize,
    #[serde(default)]
    min: f64,
    #[serde(default = "default_max")]
    max: f64,
    #[serde(default = "default_step")]
    step: f64,
    #[serde(default)]
    consider_zoom: bool,
    #[serde(default)]
    bypass: bool,
}

impl PolarDrawerOptimization {
    pub fn new(kind: impl Into<String>, hard_limit: usize) -> Self {
        Self {
            kind: kind.into(),
            hard_limit,
            min: 0.0,
            max: default_max(),
            step: default_step(),
            consider_zoom: false,
            bypass: false,
        }
    }

    /// Step range used by the transparency override.
    pub fn with_range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min = min;
        self.max = max;
        self.step = step;
        self
    }

    pub fn with_consider_zoom(mut self, consider_zoom: bool) -> Self {
        self.consider_zoom = consider_zoom;
        self
    }

    pub fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn consider_zoom(&self) -> bool {
        self.consider_zoom
    }

    pub fn bypass(&self) -> bool {
        self.bypass
    }

    /// Whether adjacent cells of a ray are merged into arcs.
    pub fn group_azimuths(&self) -> bool {
        self.kind == GROUPING_TYPE
    }

    /// Transparency from the `[min, max]` step function.
    ///
    /// The floors are `min + k * step` up to `max`; the highest floor <=
    /// `value` wins. `None` when no floor matches or the range is not a
    /// finite, positive-step range.
    pub fn step_transparency(&self, value: f64) -> Option<f64> {
        if !self.has_finite_range() || !(value >= self.min) {
            return None;
        }
        let limit = value.min(self.max);
        let floor_at = |k: f64| self.min + k * self.step;
        let mut k = ((limit - self.min) / self.step).floor();
        // division rounding can land one step off the repeated-addition floor
        if floor_at(k + 1.0) <= limit {
            k += 1.0;
        }
        if k > 0.0 && floor_at(k) > limit {
            k -= 1.0;
        }
        let floor = floor_at(k);
        let range = self.max - self.min + 1.0;
        Some((range - floor) / (range * 2.0))
    }

    fn has_finite_range(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.step > 0.0
            && self.max >= self.min
    }

    pub fn validate(&self) -> RadarResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(RadarError::InvalidOptimization {
                name: self.kind.clone(),
                message: format!("range must be finite, got [{}, {}]", self.min, self.max),
            });
        }
        if self.max < self.min {
            return Err(RadarError::InvalidOptimization {
                name: self.kind.clone(),
                message: format!("max {} is below min {}", self.max, self.min),
            });
        }
        if !(self.step > 0.0) || !self.step.is_finite() {
            return Err(RadarError::InvalidOptimization {
                name: self.kind.clone(),
                message: format!("step must be positive and finite, got {}", self.step),
            });
        }
        Ok(())
    }
}

impl Default for PolarDrawerOptimization {
    fn default() -> Self {
        Self::new("default", DEFAULT_HARD_LIMIT)
    }
}

impl DrawerOptimization for PolarDrawerOptimization {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn hard_limit(&self) -> usize {
        self.hard_limit
    }

    fn filtering_values<'a, V: MeasuredValue>(
        &self,
        zoom_level: f64,
        values: &'a [V],
        predicate: Option<&DisplayPredicate<V>>,
    ) -> Vec<&'a V> {
        filter_values(
            values,
            POLAR_VALUE_FLOOR,
            predicate,
            self.consider_zoom,
            zoom_level,
            POLAR_ZOOM_LIMIT,
        )
    }
}

/// Policy for cartesian (and icon) drawers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartesianDrawerOptimization {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default = "default_hard_limit")]
    hard_limit: usize,
    #[serde(default)]
    consider_zoom: bool,
    #[serde(default)]
    bypass: bool,
}

impl CartesianDrawerOptimization {
    pub fn new(kind: impl Into<String>, hard_limit: usize) -> Self {
        Self {
            kind: kind.into(),
            hard_limit,
            consider_zoom: false,
            bypass: false,
        }
    }

    pub fn with_consider_zoom(mut self, consider_zoom: bool) -> Self {
        self.consider_zoom = consider_zoom;
        self
    }

    pub fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    pub fn consider_zoom(&self) -> bool {
        self.consider_zoom
    }

    pub fn bypass(&self) -> bool {
        self.bypass
    }
}

impl Default for CartesianDrawerOptimization {
    fn default() -> Self {
        Self::new("default", DEFAULT_HARD_LIMIT)
    }
}

impl DrawerOptimization for CartesianDrawerOptimization {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn hard_limit(&self) -> usize {
        self.hard_limit
    }

    fn filtering_values<'a, V: MeasuredValue>(
        &self,
        zoom_level: f64,
        values: &'a [V],
        predicate: Option<&DisplayPredicate<V>>,
    ) -> Vec<&'a V> {
        filter_values(
            values,
            CARTESIAN_VALUE_FLOOR,
            predicate,
            self.consider_zoom,
            zoom_level,
            CARTESIAN_ZOOM_LIMIT,
        )
    }
}

fn filter_values<'a, V: MeasuredValue>(
    values: &'a [V],
    floor: f64,
    predicate: Option<&DisplayPredicate<V>>,
    consider_zoom: bool,
    zoom_level: f64,
    zoom_limit: f64,
) -> Vec<&'a V> {
    let significant = values
        .iter()
        .filter(|v| v.measured_value() > floor)
        .filter(|v| predicate.map_or(true, |p| p(*v)));

    if consider_zoom && zoom_level < zoom_limit {
        thin_by_zoom(significant, zoom_level, zoom_limit)
    } else {
        significant.collect()
    }
}

/// Systematic sampling: keep the first element of every window of
/// `zoom_limit + 1 - floor(zoom)` elements.
fn thin_by_zoom<'a, V, I>(values: I, zoom_level: f64, zoom_limit: f64) -> Vec<&'a V>
where
    I: Iterator<Item = &'a V>,
{
    let modulo = (zoom_limit + 1.0 - zoom_level.floor()).max(1.0) as usize;
    let mut counter = 0usize;
    let mut kept = Vec::new();
    for value in values {
        if counter == 0 {
            kept.push(value);
        }
        counter += 1;
        if counter == modulo {
            counter = 0;
        }
    }
    kept
}

/// Pick the single optimization whose type appears inside `drawer_kind`.
///
/// Matching is case-insensitive and the type must start after position 0 of
/// the drawer type: a drawer type that begins with the optimization type does
/// not match. Zero or several matches return `None` so the caller falls back
/// to its default.
pub fn select_optimization<'a, O: DrawerOptimization>(
    drawer_kind: &str,
    optimizations: &'a [O],
) -> Option<&'a O> {
    let drawer_kind = drawer_kind.to_lowercase();
    let matches: Vec<&O> = optimizations
        .iter()
        .filter(|o| {
            drawer_kind
                .find(&o.kind().to_lowercase())
                .map_or(false, |position| position > 0)
        })
        .collect();

    match matches.as_slice() {
        [single] => Some(*single),
        [] if optimizations.is_empty() => {
            debug!(drawer = %drawer_kind, "No optimization configured, using default");
            None
        }
        _ => {
            warn!(
                drawer = %drawer_kind,
                matches = matches.len(),
                configured = optimizations.len(),
                "No single optimization matches the drawer, using default"
            );
            None
        }
    }
}

/// Parse a JSON array of optimizations.
pub fn optimizations_from_json<O: DeserializeOwned>(json: &str) -> RadarResult<Vec<O>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse and validate a JSON array of polar optimizations.
pub fn polar_optimizations_from_json(json: &str) -> RadarResult<Vec<PolarDrawerOptimization>> {
    let optimizations: Vec<PolarDrawerOptimization> = optimizations_from_json(json)?;
    for optimization in &optimizations {
        optimization.validate()?;
    }
    Ok(optimizations)
}
