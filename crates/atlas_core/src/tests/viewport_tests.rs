use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn projection_round_trips_inside_mercator_band() {
    let point = Coordinate::new(48.8566, 2.3522);
    let back = unproject(project(point, 7.0), 7.0);
    assert!((back.lat - point.lat).abs() < 1e-9);
    assert!((back.lng - point.lng).abs() < 1e-9);
}

#[test]
fn origin_projects_to_world_center() {
    let center = project(Coordinate::new(0.0, 0.0), 0.0);
    assert!(close(center.x, 128.0));
    assert!(close(center.y, 128.0));
}

#[test]
fn starts_idle_at_overview() {
    let viewport = Viewport::new(ViewportConfig::default());
    assert_eq!(viewport.phase(), ViewportPhase::Idle);
    assert_eq!(viewport.camera().center, Coordinate::new(20.0, 0.0));
    assert!(close(viewport.zoom(), 2.0));
    assert!(!viewport.overview_button_visible());
}

#[test]
fn focus_flies_then_settles_after_fixed_duration() {
    let mut viewport = Viewport::new(ViewportConfig::default());
    viewport.focus(Coordinate::new(40.0, 10.0), 12.0);
    assert_eq!(viewport.phase(), ViewportPhase::Flying);

    assert_eq!(
        viewport.advance(Duration::from_millis(750)),
        ViewportPhase::Flying
    );
    assert!(close(viewport.zoom(), 7.0));
    assert!(close(viewport.camera().center.lat, 30.0));

    assert_eq!(
        viewport.advance(Duration::from_millis(750)),
        ViewportPhase::Idle
    );
    assert_eq!(viewport.camera().center, Coordinate::new(40.0, 10.0));
    assert!(viewport.overview_button_visible());
}

#[test]
fn new_flight_retargets_from_current_position() {
    let mut viewport = Viewport::new(ViewportConfig::default());
    viewport.focus(Coordinate::new(40.0, 10.0), 12.0);
    viewport.advance(Duration::from_millis(750));

    viewport.reset();
    assert_eq!(viewport.phase(), ViewportPhase::Flying);
    assert!(close(viewport.destination().zoom, 2.0));
    assert!(close(viewport.zoom(), 7.0));

    viewport.advance(Duration::from_secs(2));
    assert_eq!(viewport.phase(), ViewportPhase::Idle);
    assert!(close(viewport.zoom(), 2.0));
}

#[test]
fn set_view_cancels_flight() {
    let mut viewport = Viewport::new(ViewportConfig::default());
    viewport.focus(Coordinate::new(40.0, 10.0), 12.0);
    viewport.set_view(Coordinate::new(1.0, 1.0), 5.0);
    assert_eq!(viewport.phase(), ViewportPhase::Idle);
    assert_eq!(viewport.advance(Duration::from_secs(1)), ViewportPhase::Idle);
    assert!(close(viewport.zoom(), 5.0));
}

#[test]
fn overview_button_threshold_is_exclusive() {
    let mut viewport = Viewport::new(ViewportConfig::default());
    viewport.set_view(Coordinate::new(0.0, 0.0), 3.0);
    assert!(!viewport.overview_button_visible());
    viewport.set_view(Coordinate::new(0.0, 0.0), 3.5);
    assert!(viewport.overview_button_visible());
}
