use std::cell::Cell;
use std::rc::Rc;

use maploop::geometry::haversine::distance_m;
use maploop::geometry::tolerance::MIN_POINT_SPACING_M;
use maploop::model::{DrawingStatus, GeoPoint};
use maploop::DrawingSession;

fn geo(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng)
}

// ~111 m apart at the equator, under the spacing threshold
const NEAR: GeoPoint = GeoPoint { lat: 0.0, lng: 0.001 };
// ~1113 m apart, over the threshold
const FAR: GeoPoint = GeoPoint { lat: 0.0, lng: 0.01 };

#[test]
fn spacing_fixtures_bracket_the_threshold() {
    let origin = geo(0.0, 0.0);
    assert!(distance_m(origin, NEAR) < MIN_POINT_SPACING_M);
    assert!(distance_m(origin, FAR) >= MIN_POINT_SPACING_M);
}

#[test]
fn start_seeds_single_point_path() {
    let mut s = DrawingSession::new(0.0);
    assert!(s.start(geo(10.0, 20.0), 42.0));

    let st = s.state();
    assert_eq!(st.status, DrawingStatus::Drawing);
    assert_eq!(st.path, vec![geo(10.0, 20.0)]);
    assert_eq!(st.started_at_ms, Some(42.0));
    assert!(!st.loop_closed);
    assert!(!s.was_dragged());
}

#[test]
fn start_replaces_any_prior_state() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);
    s.add_point(FAR);
    s.complete();
    assert_eq!(s.state().status, DrawingStatus::Completed);

    assert!(s.start(geo(5.0, 5.0), 2.0));
    assert_eq!(s.state().path, vec![geo(5.0, 5.0)]);
    assert!(!s.was_dragged());
    assert!(!s.state().loop_closed);
}

#[test]
fn near_point_is_dropped() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);
    let ver = s.state_version();

    assert!(!s.add_point(NEAR));
    assert_eq!(s.state().path, vec![geo(0.0, 0.0)]);
    assert!(!s.was_dragged());
    assert_eq!(s.state_version(), ver, "dropped point must not commit");
}

#[test]
fn far_point_is_appended() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);

    assert!(s.add_point(FAR));
    assert_eq!(s.state().path, vec![geo(0.0, 0.0), FAR]);
    assert!(s.was_dragged());
}

#[test]
fn spacing_is_measured_from_last_recorded_point() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);
    s.add_point(geo(0.0, 0.01));
    // Near the last recorded point, even though far from the start
    assert!(!s.add_point(geo(0.0, 0.011)));
    assert!(s.add_point(geo(0.0, 0.02)));
    assert_eq!(s.state().path.len(), 3);
}

#[test]
fn tap_completes_as_single_point_loop() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(1.0, 2.0), 1.0);

    assert!(s.complete());
    let st = s.state();
    assert_eq!(st.status, DrawingStatus::Completed);
    assert_eq!(st.path, vec![geo(1.0, 2.0)]);
    assert!(st.loop_closed);
}

#[test]
fn drag_completes_as_closed_loop() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);
    s.add_point(geo(0.0, 0.01));
    s.add_point(geo(0.01, 0.01));

    assert!(s.complete());
    assert!(s.state().loop_closed);
    assert_eq!(s.state().path.len(), 3);
}

#[test]
fn complete_without_start_is_noop() {
    let mut s = DrawingSession::new(0.0);
    let ver = s.state_version();
    assert!(!s.complete());
    assert_eq!(s.state().status, DrawingStatus::Idle);
    assert_eq!(s.state_version(), ver);
}

#[test]
fn add_point_outside_drawing_is_noop() {
    let mut s = DrawingSession::new(0.0);
    assert!(!s.add_point(FAR));
    s.start(geo(0.0, 0.0), 1.0);
    s.complete();
    assert!(!s.add_point(FAR));
    assert_eq!(s.state().path.len(), 1);
}

#[test]
fn reset_always_yields_idle() {
    let mut s = DrawingSession::new(0.0);
    assert!(s.reset());

    s.start(geo(0.0, 0.0), 1.0);
    s.add_point(FAR);
    assert!(s.reset());
    assert_eq!(s.state().status, DrawingStatus::Idle);
    assert!(s.state().path.is_empty());
    assert_eq!(s.state().started_at_ms, None);
    assert!(!s.state().loop_closed);
    assert!(!s.was_dragged());

    s.start(geo(0.0, 0.0), 1.0);
    s.complete();
    assert!(s.reset());
    assert_eq!(s.state().status, DrawingStatus::Idle);
}

#[test]
fn display_path_appends_first_point_when_closed() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);
    s.add_point(geo(0.0, 0.01));
    assert_eq!(s.display_path().len(), 2, "open path is presented as-is");

    s.complete();
    let shown = s.display_path();
    assert_eq!(shown.len(), 3);
    assert_eq!(shown.first(), shown.last());
    // The closing point is computed at render time, not recorded
    assert_eq!(s.state().path.len(), 2);
}

#[test]
fn contains_uses_the_drawn_loop() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);
    s.add_point(geo(0.0, 2.0));
    s.add_point(geo(2.0, 2.0));
    s.add_point(geo(2.0, 0.0));
    s.complete();

    assert!(s.contains(geo(1.0, 1.0)));
    assert!(!s.contains(geo(3.0, 3.0)));
}

#[test]
fn contains_is_false_under_three_points() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);
    s.complete();
    assert!(!s.contains(geo(0.0, 0.0)));
}

#[test]
fn listeners_fire_once_per_committed_transition() {
    let mut s = DrawingSession::new(0.0);
    let hits = Rc::new(Cell::new(0u32));
    let h = Rc::clone(&hits);
    let id = s.subscribe(Box::new(move || h.set(h.get() + 1)));

    s.start(geo(0.0, 0.0), 1.0);
    assert_eq!(hits.get(), 1);
    s.add_point(NEAR); // dropped, no notification
    assert_eq!(hits.get(), 1);
    s.add_point(FAR);
    assert_eq!(hits.get(), 2);
    s.complete();
    assert_eq!(hits.get(), 3);
    s.complete(); // no-op
    assert_eq!(hits.get(), 3);
    s.reset();
    assert_eq!(hits.get(), 4);

    assert!(s.unsubscribe(id));
    s.start(geo(0.0, 0.0), 2.0);
    assert_eq!(hits.get(), 4);
    assert!(!s.unsubscribe(id));
}

#[test]
fn version_bumps_only_on_commits() {
    let mut s = DrawingSession::new(0.0);
    let v0 = s.state_version();
    s.add_point(FAR); // idle, no-op
    assert_eq!(s.state_version(), v0);
    s.start(geo(0.0, 0.0), 1.0);
    let v1 = s.state_version();
    assert!(v1 > v0);
    s.reset();
    assert!(s.state_version() > v1);
}

#[test]
fn offline_fires_when_window_elapses() {
    let mut s = DrawingSession::new(1_000.0);
    assert!(!s.is_ready());
    assert!(!s.is_offline());
    assert_eq!(s.connectivity().deadline_ms, Some(11_000.0));

    assert!(!s.poll_connectivity(10_999.0), "window still open");
    assert!(!s.is_offline());

    assert!(s.poll_connectivity(11_000.0));
    assert!(s.is_offline());
    assert!(!s.is_ready());

    // One-shot: a later poll does not fire again
    assert!(!s.poll_connectivity(99_999.0));
}

#[test]
fn ready_signal_wins_over_the_window() {
    let mut s = DrawingSession::new(0.0);
    assert!(s.map_ready());
    assert!(s.is_ready());
    assert!(!s.is_offline());

    // The window is disarmed; a late timer fire changes nothing
    assert!(!s.poll_connectivity(1e9));
    assert!(!s.expire_connectivity());
    assert!(!s.is_offline());

    // Ready is idempotent
    assert!(!s.map_ready());
}

#[test]
fn retry_rearms_the_window() {
    let mut s = DrawingSession::new(0.0);
    assert!(s.poll_connectivity(10_000.0));
    assert!(s.is_offline());

    assert!(s.retry_connectivity(20_000.0));
    assert!(!s.is_offline());
    assert!(!s.is_ready());

    assert!(!s.poll_connectivity(29_999.0));
    assert!(s.poll_connectivity(30_000.0));
    assert!(s.is_offline());
}

#[test]
fn retry_is_noop_once_ready() {
    let mut s = DrawingSession::new(0.0);
    s.map_ready();
    assert!(!s.retry_connectivity(1.0));
    assert!(s.is_ready());
    assert!(!s.poll_connectivity(1e9));
}

#[test]
fn connectivity_is_independent_of_drawing_status() {
    let mut s = DrawingSession::new(0.0);
    s.start(geo(0.0, 0.0), 1.0);
    assert!(s.poll_connectivity(10_000.0));
    assert!(s.is_offline());
    // Drawing state untouched by the connectivity transition
    assert_eq!(s.state().status, DrawingStatus::Drawing);
    assert_eq!(s.state().path.len(), 1);
}
