//! Render-pass tests for the polar and cartesian drawers.

use std::sync::Arc;

use projection::ScreenPoint;
use radar_common::{CartesianMapValue, ColorScale, IconMapValue, PolarMapValue};
use renderer::{
    CartesianDrawerOptimization, DisplayPredicate, IconDrawer, PolarDrawer,
    PolarDrawerOptimization, PolarGridValue, RectDrawer,
};
use test_utils::assert_approx_eq;
use test_utils::fixtures::{cartesian_scenario, north_up_view, polar_scenario, sites};
use test_utils::{polar_sweep, wind_field};

fn below_five_polar() -> DisplayPredicate<PolarMapValue> {
    Arc::new(|v: &PolarMapValue| v.value() < 5.0)
}

fn below_five_cells() -> DisplayPredicate<CartesianMapValue> {
    Arc::new(|v: &CartesianMapValue| v.value < 5.0)
}

fn polar_drawer(kind: &str) -> (PolarDrawer, test_utils::fixtures::PolarScenario) {
    let scenario = polar_scenario();
    let mut drawer = PolarDrawer::new(kind);
    drawer.update_values(scenario.values.clone(), "v1");
    drawer.bind(scenario.view.clone(), Some(below_five_polar()));
    (drawer, scenario)
}

// ============================================================================
// PolarDrawer
// ============================================================================

#[test]
fn test_polar_scenario_draws_two_gates_per_ray() {
    let (mut drawer, scenario) = polar_drawer("radar");

    let mut drawn: Vec<PolarGridValue> = Vec::new();
    let done = drawer.render_polar_map_values(&scenario.center, &scenario.center_point, |cell| {
        drawn.push(cell);
        true
    });

    assert_eq!(done, 72);
    assert_eq!(drawn.len(), 72);
    assert_eq!(drawn[0].distance, 0.02);
    assert_eq!(drawn[0].azimuth, 0.0);
    assert_eq!(drawn[0].value, 0.5);
    assert_eq!(drawn[2].azimuth, 10.0);
    assert!(drawn.iter().all(|cell| cell.value < 5.0));
}

#[test]
fn test_polar_cells_carry_ray_geometry() {
    let (mut drawer, scenario) = polar_drawer("radar");

    let mut first = None;
    drawer.render_polar_map_values(&scenario.center, &scenario.center_point, |cell| {
        first.get_or_insert(cell);
        true
    });

    let first = first.unwrap();
    assert_eq!(first.azimuth_step, 10.0);
    // 2 m gates at roughly 0.0091 px/m
    assert_approx_eq!(first.edge, 0.0182, 0.001);
}

#[test]
fn test_polar_count_only_includes_rendered() {
    let (mut drawer, scenario) = polar_drawer("radar");
    let mut calls = 0;
    let done = drawer.render_polar_map_values(&scenario.center, &scenario.center_point, |_| {
        calls += 1;
        calls % 2 == 0
    });
    assert_eq!(calls, 72);
    assert_eq!(done, 36);
}

#[test]
fn test_polar_render_leaves_values_untouched() {
    let (mut drawer, scenario) = polar_drawer("radar");
    let before: Vec<PolarMapValue> = drawer.values().to_vec();
    drawer.render_polar_map_values(&scenario.center, &scenario.center_point, |_| true);
    assert_eq!(drawer.values(), before.as_slice());
    // the fixture values were never bound to a center
    assert!(drawer.values()[0].center().is_origin());
}

#[test]
fn test_polar_hard_limit_respected() {
    let scenario = polar_scenario();
    let mut drawer = PolarDrawer::new("radar-rain");
    drawer.update_values(scenario.values.clone(), "v1");
    drawer.bind(scenario.view.clone(), None);
    drawer.set_configuration(
        ColorScale::radar(),
        None,
        vec![PolarDrawerOptimization::new("rain", 5)],
    );

    let mut calls = 0;
    let done = drawer.render_polar_map_values(&scenario.center, &scenario.center_point, |_| {
        calls += 1;
        true
    });
    assert_eq!(calls, 6);
    assert_eq!(done, 6);
}

#[test]
fn test_polar_degenerate_ratio_draws_nothing() {
    let scenario = polar_scenario();
    let mut drawer = PolarDrawer::new("radar");
    drawer.update_values(scenario.values.clone(), "v1");
    // every point lands on the same pixel
    let flat = projection::ClosureView::new(|_| ScreenPoint::new(5.0, 5.0), || 9.0);
    drawer.bind(Arc::new(flat), None);

    let mut calls = 0;
    let done = drawer.render_polar_map_values(&scenario.center, &ScreenPoint::new(5.0, 5.0), |_| {
        calls += 1;
        true
    });
    assert_eq!(done, 0);
    assert_eq!(calls, 0);
}

#[test]
fn test_polar_zoom_thinning() {
    let scenario = polar_scenario();
    let mut drawer = PolarDrawer::new("radar-rain");
    drawer.update_values(scenario.values.clone(), "v1");
    // zoom 9 is below the polar zoom limit of 10: keep 1 value out of 2
    drawer.bind(scenario.view.clone(), None);
    drawer.set_configuration(
        ColorScale::radar(),
        None,
        vec![PolarDrawerOptimization::new("rain", 20_000).with_consider_zoom(true)],
    );

    let done = drawer.render_polar_map_values(&scenario.center, &scenario.center_point, |_| true);
    assert_eq!(done, 180);
}

#[test]
fn test_polar_grouping_merges_rays() {
    let center = sites::toulouse();
    let view = north_up_view(9.0, center.clone());
    let center_point = projection::MapView::project(&view, &center);

    let mut drawer = PolarDrawer::new("radar???");
    drawer.update_values(polar_sweep(36, 10, 2.0, |_, _| 2.0), "v1");
    drawer.bind(Arc::new(view), None);
    drawer.set_configuration(
        ColorScale::radar(),
        None,
        vec![PolarDrawerOptimization::new("???", 20_000)],
    );
    assert!(drawer.get_optimization().group_azimuths());

    let mut runs: Vec<PolarGridValue> = Vec::new();
    let done = drawer.render_polar_map_values(&center, &center_point, |run| {
        runs.push(run);
        true
    });

    assert_eq!(done, 36);
    assert_eq!(runs[0].distance, 0.02);
    assert_approx_eq!(runs[0].distance_end, 0.18, 0.011);
    assert_eq!(runs[35].azimuth, 350.0);
}

#[test]
fn test_polar_grouping_respects_hard_limit() {
    let center = sites::toulouse();
    let view = Arc::new(north_up_view(9.0, center.clone()));
    let center_point = projection::MapView::project(view.as_ref(), &center);
    // alternating intensities never merge, so every cell flushes a run
    let sweep = polar_sweep(4, 10, 2.0, |_, gate| if gate % 2 == 0 { 0.5 } else { 30.0 });

    for hard_limit in [0usize, 3, 12] {
        let mut drawer = PolarDrawer::new("radar???");
        drawer.update_values(sweep.clone(), "v1");
        drawer.bind(view.clone(), None);
        drawer.set_configuration(
            ColorScale::radar(),
            None,
            vec![PolarDrawerOptimization::new("???", hard_limit)],
        );

        let mut calls = 0;
        let done = drawer.render_polar_map_values(&center, &center_point, |_| {
            calls += 1;
            true
        });
        assert_eq!(calls, hard_limit + 1, "hard_limit {hard_limit}");
        assert_eq!(done, hard_limit + 1);
    }
}

#[test]
fn test_polar_has_changed() {
    let (mut drawer, scenario) = polar_drawer("radar");
    assert!(drawer.has_changed(&scenario.center, &scenario.center_point));

    drawer.render_polar_map_values(&scenario.center, &scenario.center_point, |_| true);
    assert!(!drawer.has_changed(&scenario.center, &scenario.center_point));

    let moved = ScreenPoint::new(scenario.center_point.x + 1.0, scenario.center_point.y);
    assert!(drawer.has_changed(&scenario.center, &moved));

    drawer.update_values(scenario.values.clone(), "v2");
    assert!(drawer.has_changed(&scenario.center, &scenario.center_point));
}

#[test]
fn test_polar_visible_and_window_points() {
    let scenario = polar_scenario();
    let mut drawer = PolarDrawer::new("radar-rain");
    drawer.bind(scenario.view.clone(), Some(below_five_polar()));
    drawer.set_configuration(
        ColorScale::radar(),
        None,
        vec![PolarDrawerOptimization::new("rain", 100).with_consider_zoom(true)],
    );

    let window = drawer.get_exec_of_window_points(&scenario.values, |points| points.len());
    let visible = drawer.get_exec_of_visible_points(&scenario.values, |points| points.len());
    assert_eq!(window, 72);
    assert_eq!(visible, 36);
    assert!(drawer.values().is_empty());
}

// ============================================================================
// CartesianDrawer
// ============================================================================

#[test]
fn test_cartesian_scenario_draws_eighteen_cells() {
    let scenario = cartesian_scenario();
    let mut drawer = RectDrawer::new("cells");
    drawer.update_values(scenario.values.clone(), "v1");
    drawer.bind(scenario.view.clone(), Some(below_five_cells()));

    let mut drawn = Vec::new();
    let done = drawer.render_cartesian_map_values(&scenario.center, &scenario.center_point, |rect| {
        drawn.push(rect);
        true
    });

    assert_eq!(done, 18);
    let first = &drawn[0];
    assert_eq!(first.x, -1000.0);
    assert_eq!(first.y, -1000.0);
    assert_eq!(first.width, 1.0);
    assert_eq!(first.height, 1.0);
    assert_eq!(first.color, 6867711);
    assert_eq!(first.transparency, 0.0);
    assert_eq!(first.id.as_deref(), Some("1"));
}

#[test]
fn test_cartesian_hard_limit_respected() {
    let scenario = cartesian_scenario();
    let mut drawer = RectDrawer::new("radar-cells");
    drawer.update_values(scenario.values.clone(), "v1");
    drawer.bind(scenario.view.clone(), None);
    drawer.set_configuration(
        ColorScale::radar(),
        None,
        vec![CartesianDrawerOptimization::new("cells", 10)],
    );

    let mut calls = 0;
    drawer.render_cartesian_map_values(&scenario.center, &scenario.center_point, |_| {
        calls += 1;
        true
    });
    assert_eq!(calls, 11);
}

#[test]
fn test_cartesian_value_floor() {
    let scenario = cartesian_scenario();
    let mut drawer = RectDrawer::new("cells");
    let mut values = scenario.values.clone();
    values[0].value = 0.4;
    values[1].value = 0.0;
    drawer.update_values(values, "v1");
    drawer.bind(scenario.view.clone(), Some(below_five_cells()));

    let done = drawer.render_cartesian_map_values(&scenario.center, &scenario.center_point, |_| true);
    assert_eq!(done, 16);
}

#[test]
fn test_cartesian_has_changed_tracks_version() {
    let scenario = cartesian_scenario();
    let mut drawer = RectDrawer::new("cells");
    drawer.update_values(scenario.values.clone(), "v1");
    drawer.bind(scenario.view.clone(), None);

    drawer.render_cartesian_map_values(&scenario.center, &scenario.center_point, |_| true);
    assert!(!drawer.has_changed(&scenario.center, &scenario.center_point));

    drawer.update_values(scenario.values.clone(), "v2");
    assert!(drawer.has_changed(&scenario.center, &scenario.center_point));
}

// ============================================================================
// IconDrawer
// ============================================================================

#[test]
fn test_icon_drawer_emits_arrows() {
    let scenario = cartesian_scenario();
    let mut drawer = IconDrawer::new("wind");
    drawer.update_values(wind_field(3, 4, (-1.0, -1.0), 0.2), "v1");
    drawer.bind(scenario.view.clone(), None);

    let mut arrows = Vec::new();
    let done = drawer.render_cartesian_map_values(&scenario.center, &scenario.center_point, |icon| {
        arrows.push(icon);
        true
    });

    assert_eq!(done, 12);
    assert_eq!(arrows[0].x, -1000.0);
    assert_eq!(arrows[0].y, -1000.0);
    assert_eq!(arrows[0].speed, 2.0);
    assert_eq!(arrows[1].angle, 30.0);
}

#[test]
fn test_icon_drawer_never_thins() {
    let scenario = cartesian_scenario();
    let mut drawer = IconDrawer::new("wind-cells");
    let icons: Vec<IconMapValue> = wind_field(9, 9, (-1.0, -1.0), 0.2);
    drawer.update_values(icons, "v1");
    drawer.bind(scenario.view.clone(), None);
    drawer.set_configuration(
        ColorScale::radar(),
        None,
        vec![CartesianDrawerOptimization::new("cells", 3).with_consider_zoom(true)],
    );

    let done = drawer.render_cartesian_map_values(&scenario.center, &scenario.center_point, |_| true);
    assert_eq!(done, 81);
}
