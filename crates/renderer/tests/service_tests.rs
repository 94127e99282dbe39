//! Render service tests: commands run on one task, in order.

use radar_common::RadarError;
use renderer::service::DEFAULT_QUEUE_DEPTH;
use renderer::{spawn_render_service, CartesianLayer, CompositeLayer, IconLayer, PolarLayer, RecordingSurface};
use test_utils::fixtures::{cartesian_scenario, polar_scenario, sites};
use test_utils::wind_field;

fn stack() -> CompositeLayer<RecordingSurface> {
    let mut composite = CompositeLayer::new(RecordingSurface::new());
    composite.add_layer(Box::new(PolarLayer::new("radar-t0", "radar", sites::toulouse())));
    composite.add_layer(Box::new(PolarLayer::new("radar-t1", "radar", sites::toulouse())));
    composite.add_layer(Box::new(CartesianLayer::new("rain-t0", "cells")));
    composite.add_layer(Box::new(IconLayer::new("wind-t0", "wind")));
    composite
}

#[tokio::test]
async fn test_update_then_show() {
    let (handle, task) = spawn_render_service(stack(), DEFAULT_QUEUE_DEPTH);

    handle.set_view(polar_scenario().view).await.unwrap();
    handle
        .update_polar("radar-t0", polar_scenario().values, "t0")
        .await
        .unwrap();
    handle
        .update_polar("radar-t1", polar_scenario().values, "t1")
        .await
        .unwrap();

    assert_eq!(handle.show_first_matching("t1", 1.0).await.unwrap(), 360);
    assert_eq!(handle.render().await.unwrap(), 0);

    drop(handle);
    let composite = task.await.unwrap();
    assert_eq!(composite.surface().primitives("radar-t1").len(), 360);
    assert!(composite.surface().primitives("radar-t0").is_empty());
}

#[tokio::test]
async fn test_cartesian_and_icons() {
    let (handle, task) = spawn_render_service(stack(), 4);
    let scenario = cartesian_scenario();

    handle.set_view(scenario.view.clone()).await.unwrap();
    handle
        .update_cartesian("rain-t0", scenario.values, "t0")
        .await
        .unwrap();
    handle
        .update_icons("wind-t0", wind_field(3, 3, (-1.0, -1.0), 0.2), "t0")
        .await
        .unwrap();

    assert_eq!(handle.show("rain", 1.0).await.unwrap(), 81);
    assert_eq!(handle.show("wind", 1.0).await.unwrap(), 9);
    assert_eq!(handle.show_all(1.0).await.unwrap(), 0);

    drop(handle);
    let composite = task.await.unwrap();
    assert_eq!(composite.surface().total_primitives(), 90);
}

#[tokio::test]
async fn test_update_errors() {
    let (handle, _task) = spawn_render_service(stack(), DEFAULT_QUEUE_DEPTH);

    let missing = handle.update_polar("radar-t9", Vec::new(), "t9").await;
    assert!(matches!(missing, Err(RadarError::LayerNotFound(_))));

    let wrong_kind = handle
        .update_cartesian("radar-t0", cartesian_scenario().values, "t0")
        .await;
    assert!(matches!(wrong_kind, Err(RadarError::LayerKindMismatch(_))));
}

#[tokio::test]
async fn test_closed_service() {
    let (handle, task) = spawn_render_service(stack(), DEFAULT_QUEUE_DEPTH);
    task.abort();
    let _ = task.await;

    assert!(matches!(handle.render().await, Err(RadarError::ServiceClosed)));
}
