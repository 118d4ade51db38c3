use super::*;
use crate::test_support::{event, placed};

const PARIS: (f64, f64) = (48.8566, 2.3522);
const VERSAILLES: (f64, f64) = (48.8049, 2.1204);
const TOKYO: (f64, f64) = (35.6762, 139.6503);

fn controller() -> ClusterController {
    ClusterController::new(ClusterConfig::default(), ViewportConfig::default())
}

fn sizes(controller: &ClusterController) -> Vec<usize> {
    controller.groups().iter().map(ClusterGroup::len).collect()
}

fn city_events() -> Vec<Event> {
    vec![
        placed(1, PARIS.0, PARIS.1),
        placed(2, VERSAILLES.0, VERSAILLES.1),
        placed(3, TOKYO.0, TOKYO.1),
    ]
}

#[test]
fn nearby_markers_merge_at_world_zoom() {
    let mut controller = controller();
    controller.rebuild(&city_events());
    assert_eq!(sizes(&controller), vec![2, 1]);
    assert_eq!(controller.groups()[0].members, vec![EventId(1), EventId(2)]);
}

#[test]
fn clusters_dissolve_as_zoom_increases() {
    let mut controller = controller();
    controller.rebuild(&city_events());
    controller.set_view(Coordinate::new(PARIS.0, PARIS.1), 12.0);
    assert_eq!(sizes(&controller), vec![1, 1, 1]);
}

#[test]
fn clustering_disabled_at_configured_zoom() {
    let mut controller = controller();
    controller.set_view(Coordinate::new(0.0, 0.0), 17.0);
    controller.rebuild(&[placed(1, 0.0, 0.0), placed(2, 0.0, 0.0)]);
    assert_eq!(sizes(&controller), vec![2]);

    controller.set_view(Coordinate::new(0.0, 0.0), 18.0);
    assert_eq!(sizes(&controller), vec![1, 1]);
}

#[test]
fn events_without_coordinates_are_not_placed() {
    let mut controller = controller();
    let unplaced = event(9, "Online", "2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z");
    controller.rebuild(&[unplaced, placed(1, 10.0, 10.0)]);
    assert_eq!(sizes(&controller), vec![1]);
}

#[test]
fn rebuild_replaces_previous_grouping() {
    let mut controller = controller();
    controller.rebuild(&city_events());
    controller.rebuild(&[placed(7, -33.86, 151.21)]);
    assert_eq!(controller.groups().len(), 1);
    assert_eq!(controller.groups()[0].members, vec![EventId(7)]);
}

#[test]
fn group_reports_bounds_and_mean_position() {
    let groups = group_markers(
        &[
            (EventId(1), Coordinate::new(10.0, 20.0)),
            (EventId(2), Coordinate::new(12.0, 22.0)),
        ],
        2.0,
        &ClusterConfig::default(),
    );
    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.representative, Coordinate::new(11.0, 21.0));
    assert_eq!(
        group.bounds,
        Bounds {
            south: 10.0,
            west: 20.0,
            north: 12.0,
            east: 22.0
        }
    );
    assert!(group.bounds.contains(group.representative));
}

fn tight_pair() -> Vec<Event> {
    vec![placed(1, 0.0, 0.0), placed(2, 0.0, 0.0005)]
}

#[test]
fn activation_from_far_out_caps_at_neighborhood_zoom() {
    let mut controller = controller();
    controller.set_view(Coordinate::new(0.0, 0.0), 4.0);
    controller.rebuild(&tight_pair());
    let cluster = controller.groups()[0].clone();
    assert_eq!(cluster.len(), 2);
    assert_eq!(controller.fit_zoom(&cluster.bounds), 18.0);

    match controller.on_cluster_activate(&cluster) {
        ClusterActivation::Zoom { zoom, .. } => assert_eq!(zoom, 15.0),
        other => panic!("unexpected activation {other:?}"),
    }
    assert_eq!(controller.viewport().destination().zoom, 15.0);
}

#[test]
fn activation_from_local_view_is_uncapped() {
    let mut controller = controller();
    controller.set_view(Coordinate::new(0.0, 0.0), 16.0);
    controller.rebuild(&tight_pair());
    let cluster = controller.groups()[0].clone();
    assert_eq!(cluster.len(), 2);

    match controller.on_cluster_activate(&cluster) {
        ClusterActivation::Zoom { zoom, center } => {
            assert_eq!(zoom, 18.0);
            assert!((center.lng - 0.00025).abs() < 1e-9);
        }
        other => panic!("unexpected activation {other:?}"),
    }
}

#[test]
fn activation_steps_in_when_bounds_already_fit() {
    let mut controller = controller();
    controller.set_view(Coordinate::new(0.0, 0.0), 10.0);
    let wide = ClusterGroup {
        members: vec![EventId(1), EventId(3)],
        bounds: Bounds {
            south: TOKYO.0,
            west: PARIS.1,
            north: PARIS.0,
            east: TOKYO.1,
        },
        representative: Coordinate::new(42.0, 71.0),
    };
    match controller.on_cluster_activate(&wide) {
        ClusterActivation::Zoom { zoom, .. } => assert_eq!(zoom, 11.0),
        other => panic!("unexpected activation {other:?}"),
    }
}

#[test]
fn activation_at_max_zoom_spiderfies() {
    let mut controller = controller();
    controller.set_view(Coordinate::new(0.0, 0.0), 18.0);
    let stacked = ClusterGroup {
        members: vec![EventId(1), EventId(2)],
        bounds: Bounds::around(Coordinate::new(0.0, 0.0)),
        representative: Coordinate::new(0.0, 0.0),
    };
    assert_eq!(
        controller.on_cluster_activate(&stacked),
        ClusterActivation::Spiderfy {
            members: vec![EventId(1), EventId(2)]
        }
    );
    assert_eq!(controller.viewport().phase(), ViewportPhase::Idle);
}

#[test]
fn stacked_markers_spiderfy_when_clustering_outlasts_max_zoom() {
    let config = ClusterConfig {
        disable_clustering_at_zoom: 19.0,
        ..ClusterConfig::default()
    };
    let mut controller = ClusterController::new(config, ViewportConfig::default());
    controller.rebuild(&[placed(1, PARIS.0, PARIS.1), placed(2, PARIS.0, PARIS.1)]);
    controller.set_view(Coordinate::new(PARIS.0, PARIS.1), 18.0);
    assert_eq!(sizes(&controller), vec![2]);

    let stacked = controller.groups()[0].clone();
    assert_eq!(
        controller.on_cluster_activate(&stacked),
        ClusterActivation::Spiderfy {
            members: vec![EventId(1), EventId(2)]
        }
    );
}

#[test]
fn default_config_splits_stacked_markers_at_max_zoom() {
    let mut controller = controller();
    controller.rebuild(&[placed(1, PARIS.0, PARIS.1), placed(2, PARIS.0, PARIS.1)]);
    controller.set_view(Coordinate::new(PARIS.0, PARIS.1), 18.0);
    assert_eq!(sizes(&controller), vec![1, 1]);
    assert!(controller.groups().iter().all(ClusterGroup::is_single));
}

#[test]
fn regroups_when_flight_crosses_zoom_levels() {
    let mut controller = controller();
    controller.rebuild(&city_events());
    assert_eq!(controller.groups().len(), 2);

    controller.focus(Coordinate::new(PARIS.0, PARIS.1), 12.0);
    controller.advance(Duration::from_secs(2));
    assert_eq!(controller.groups().len(), 3);
}

#[test]
fn reset_signal_returns_to_overview() {
    let mut coordinator = ViewCoordinator::new();
    let mut controller = controller();
    controller.attach(&mut coordinator);
    controller.set_view(Coordinate::new(PARIS.0, PARIS.1), 12.0);
    assert!(controller.overview_button_visible());

    coordinator.request_reset();
    assert!(controller.poll_signals());
    controller.advance(Duration::from_secs(2));

    assert_eq!(controller.viewport().zoom(), 2.0);
    assert!(!controller.overview_button_visible());
    assert!(!controller.poll_signals());

    controller.detach(&mut coordinator);
    assert_eq!(coordinator.listener_count(), 0);
}
