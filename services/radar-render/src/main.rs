//! Radar overlay renderer.
//!
//! Loads a render configuration, synthesizes a radar sweep, a rain grid and
//! a wind field, runs one composite render pass and writes a PNG.

mod config;
mod scene;

use anyhow::{Context, Result};
use clap::Parser;
use projection::WebMercatorView;
use radar_common::MapLatLng;
use renderer::service::DEFAULT_QUEUE_DEPTH;
use renderer::{
    spawn_render_service, CanvasSurface, CartesianLayer, CompositeLayer, IconLayer, PolarLayer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::RenderConfig;

const RADAR_LAYER: &str = "radar";
const RAIN_LAYER: &str = "rain";
const WIND_LAYER: &str = "wind";

#[derive(Parser, Debug)]
#[command(name = "radar-render")]
#[command(about = "Render radar overlays to a PNG")]
struct Args {
    /// Render configuration (YAML)
    #[arg(short, long, env = "RADAR_RENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, env = "RADAR_RENDER_OUTPUT", default_value = "radar.png")]
    output: PathBuf,

    /// Override the view zoom level
    #[arg(long)]
    zoom: Option<f64>,

    /// Log level
    #[arg(long, env = "RADAR_RENDER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level, args.json_logs)?;

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if let Some(zoom) = args.zoom {
        config.view.zoom = zoom;
    }

    info!(
        config = ?args.config,
        output = %args.output.display(),
        zoom = config.view.zoom,
        "Starting radar-render"
    );

    let drawn = render(&config, &args.output).await?;
    info!(drawn, output = %args.output.display(), "Render complete");
    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Build the layer stack, drive it through the render service and write
/// the result. Returns the number of primitives drawn.
async fn render(config: &RenderConfig, output: &std::path::Path) -> Result<usize> {
    let theme = config.color_scale()?;
    let scene = scene::build(&config.radar);

    let mut radar = PolarLayer::new(RADAR_LAYER, config.radar.kind.clone(), scene.radar_center.clone());
    radar.set_configuration(theme.clone(), None, config.polar_optimizations.clone());

    let mut rain = CartesianLayer::new(RAIN_LAYER, "rain-cells");
    rain.set_configuration(theme.clone(), None, config.cartesian_optimizations.clone());

    let mut wind = IconLayer::new(WIND_LAYER, "wind-icons");
    wind.set_configuration(theme, None, Vec::new());

    let surface = CanvasSurface::new(config.output.width, config.output.height)?;
    let mut composite = CompositeLayer::new(surface);
    composite.add_layer(Box::new(rain));
    composite.add_layer(Box::new(radar));
    composite.add_layer(Box::new(wind));

    let (handle, task) = spawn_render_service(composite, DEFAULT_QUEUE_DEPTH);

    let view = WebMercatorView::new(
        MapLatLng::new(config.view.lat, config.view.lng),
        config.view.zoom,
        config.output.width,
        config.output.height,
    );
    handle.set_view(Arc::new(view)).await?;
    handle.update_polar(RADAR_LAYER, scene.sweep, "demo").await?;
    handle.update_cartesian(RAIN_LAYER, scene.rain, "demo").await?;
    handle.update_icons(WIND_LAYER, scene.wind, "demo").await?;
    let drawn = handle.show_all(config.output.alpha).await?;

    drop(handle);
    let composite = task.await.context("Render service panicked")?;
    composite
        .surface()
        .write_png(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_writes_png() {
        let yaml = r#"
output: { width: 128, height: 128, alpha: 1.0 }
radar: { azimuths: 90, gates: 60, gate_meters: 2000 }
"#;
        let config = RenderConfig::from_yaml_str(yaml).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");

        let drawn = render(&config, &output).await.unwrap();
        assert!(drawn > 0);
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }
}
