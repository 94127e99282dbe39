//! Single-writer render task.
//!
//! The composite layer and its surface live inside one tokio task; callers
//! talk to it through a [`RenderHandle`]. Every drawer mutation and render
//! pass runs on that task, one command at a time.

use std::sync::Arc;

use projection::MapView;
use radar_common::{CartesianMapValue, IconMapValue, PolarMapValue, RadarError, RadarResult};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::layer::{CartesianLayer, CompositeLayer, IconLayer, PolarLayer};
use crate::surface::DrawingSurface;

/// Default command queue depth.
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

pub enum RenderCommand {
    UpdatePolar {
        layer_id: String,
        values: Vec<PolarMapValue>,
        version: String,
        reply: oneshot::Sender<RadarResult<()>>,
    },
    UpdateCartesian {
        layer_id: String,
        values: Vec<CartesianMapValue>,
        version: String,
        reply: oneshot::Sender<RadarResult<()>>,
    },
    UpdateIcons {
        layer_id: String,
        values: Vec<IconMapValue>,
        version: String,
        reply: oneshot::Sender<RadarResult<()>>,
    },
    SetView {
        view: Arc<dyn MapView>,
        reply: oneshot::Sender<usize>,
    },
    Show {
        id: String,
        alpha: f32,
        reply: oneshot::Sender<usize>,
    },
    ShowFirstMatching {
        id: String,
        alpha: f32,
        reply: oneshot::Sender<usize>,
    },
    ShowAll {
        alpha: f32,
        reply: oneshot::Sender<usize>,
    },
    Render {
        reply: oneshot::Sender<usize>,
    },
}

/// Cloneable sender side of the render task.
#[derive(Debug, Clone)]
pub struct RenderHandle {
    tx: mpsc::Sender<RenderCommand>,
}

/// Start the render task. It runs until every handle is dropped, then hands
/// the composite (and its surface) back through the join handle.
pub fn spawn_render_service<S>(
    composite: CompositeLayer<S>,
    queue_depth: usize,
) -> (RenderHandle, JoinHandle<CompositeLayer<S>>)
where
    S: DrawingSurface + 'static,
{
    let (tx, rx) = mpsc::channel(queue_depth.max(1));
    let task = tokio::spawn(run(composite, rx));
    (RenderHandle { tx }, task)
}

async fn run<S: DrawingSurface>(
    mut composite: CompositeLayer<S>,
    mut rx: mpsc::Receiver<RenderCommand>,
) -> CompositeLayer<S> {
    info!(layers = composite.len(), "Render service started");
    while let Some(command) = rx.recv().await {
        handle(&mut composite, command);
    }
    info!("Render service stopped");
    composite
}

fn handle<S: DrawingSurface>(composite: &mut CompositeLayer<S>, command: RenderCommand) {
    // A dropped reply receiver only means the caller stopped waiting.
    match command {
        RenderCommand::UpdatePolar {
            layer_id,
            values,
            version,
            reply,
        } => {
            debug!(layer = %layer_id, version = %version, count = values.len(), "UpdatePolar");
            let result = composite
                .layer_mut::<PolarLayer>(&layer_id)
                .map(|layer| layer.set_values(values, version));
            let _ = reply.send(result);
        }
        RenderCommand::UpdateCartesian {
            layer_id,
            values,
            version,
            reply,
        } => {
            debug!(layer = %layer_id, version = %version, count = values.len(), "UpdateCartesian");
            let result = composite
                .layer_mut::<CartesianLayer>(&layer_id)
                .map(|layer| layer.set_values(values, version));
            let _ = reply.send(result);
        }
        RenderCommand::UpdateIcons {
            layer_id,
            values,
            version,
            reply,
        } => {
            debug!(layer = %layer_id, version = %version, count = values.len(), "UpdateIcons");
            let result = composite
                .layer_mut::<IconLayer>(&layer_id)
                .map(|layer| layer.set_values(values, version));
            let _ = reply.send(result);
        }
        RenderCommand::SetView { view, reply } => {
            composite.set_view(view);
            let _ = reply.send(composite.render());
        }
        RenderCommand::Show { id, alpha, reply } => {
            let _ = reply.send(composite.show(&id, alpha));
        }
        RenderCommand::ShowFirstMatching { id, alpha, reply } => {
            let _ = reply.send(composite.show_the_first_matching_id(&id, alpha));
        }
        RenderCommand::ShowAll { alpha, reply } => {
            let _ = reply.send(composite.show_all(alpha));
        }
        RenderCommand::Render { reply } => {
            let _ = reply.send(composite.render());
        }
    }
}

impl RenderHandle {
    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> RenderCommand) -> RadarResult<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| RadarError::ServiceClosed)?;
        response.await.map_err(|_| RadarError::ServiceClosed)
    }

    pub async fn update_polar(
        &self,
        layer_id: impl Into<String>,
        values: Vec<PolarMapValue>,
        version: impl Into<String>,
    ) -> RadarResult<()> {
        let (layer_id, version) = (layer_id.into(), version.into());
        self.request(|reply| RenderCommand::UpdatePolar {
            layer_id,
            values,
            version,
            reply,
        })
        .await?
    }

    pub async fn update_cartesian(
        &self,
        layer_id: impl Into<String>,
        values: Vec<CartesianMapValue>,
        version: impl Into<String>,
    ) -> RadarResult<()> {
        let (layer_id, version) = (layer_id.into(), version.into());
        self.request(|reply| RenderCommand::UpdateCartesian {
            layer_id,
            values,
            version,
            reply,
        })
        .await?
    }

    pub async fn update_icons(
        &self,
        layer_id: impl Into<String>,
        values: Vec<IconMapValue>,
        version: impl Into<String>,
    ) -> RadarResult<()> {
        let (layer_id, version) = (layer_id.into(), version.into());
        self.request(|reply| RenderCommand::UpdateIcons {
            layer_id,
            values,
            version,
            reply,
        })
        .await?
    }

    /// Rebind every layer and render; returns primitives drawn.
    pub async fn set_view(&self, view: Arc<dyn MapView>) -> RadarResult<usize> {
        self.request(|reply| RenderCommand::SetView { view, reply }).await
    }

    pub async fn show(&self, id: impl Into<String>, alpha: f32) -> RadarResult<usize> {
        let id = id.into();
        self.request(|reply| RenderCommand::Show { id, alpha, reply }).await
    }

    pub async fn show_first_matching(&self, id: impl Into<String>, alpha: f32) -> RadarResult<usize> {
        let id = id.into();
        self.request(|reply| RenderCommand::ShowFirstMatching { id, alpha, reply })
            .await
    }

    pub async fn show_all(&self, alpha: f32) -> RadarResult<usize> {
        self.request(|reply| RenderCommand::ShowAll { alpha, reply }).await
    }

    pub async fn render(&self) -> RadarResult<usize> {
        self.request(|reply| RenderCommand::Render { reply }).await
    }
}
