//! Error types for the radar overlay crates.

use thiserror::Error;

/// Result type alias using RadarError.
pub type RadarResult<T> = Result<T, RadarError>;

/// Primary error type for configuration and orchestration.
///
/// The render hot path never produces these: degenerate geometry and
/// misconfigured optimizations are logged and resolved in place.
#[derive(Debug, Error)]
pub enum RadarError {
    // === Configuration Errors ===
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid color scale threshold: {0}")]
    InvalidThreshold(String),

    #[error("Color scale has no entries")]
    EmptyColorScale,

    #[error("Invalid optimization '{name}': {message}")]
    InvalidOptimization { name: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("I/O error: {0}")]
    Io(String),

    // === Orchestration Errors ===
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Layer '{0}' does not hold this kind of values")]
    LayerKindMismatch(String),

    #[error("Render service is closed")]
    ServiceClosed,

    #[error("Rendering failed: {0}")]
    RenderError(String),
}

impl From<std::io::Error> for RadarError {
    fn from(err: std::io::Error) -> Self {
        RadarError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RadarError {
    fn from(err: serde_json::Error) -> Self {
        RadarError::ConfigParse(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for RadarError {
    fn from(err: serde_yaml::Error) -> Self {
        RadarError::ConfigParse(format!("YAML error: {}", err))
    }
}
