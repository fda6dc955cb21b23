// Host-side tests for pointer tracking, magnetic pull and ripples.

use glam::Vec2;
use glass_core::interaction::{magnetic_offset, transition};
use glass_core::ripple::RippleSet;
use glass_core::{InteractionController, PointerEvent, PointerOverrides, PointerState, Rect};
use instant::Instant;
use std::time::Duration;

const PANEL: Rect = Rect::new(0.0, 0.0, 270.0, 69.0);

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn magnetic_pull_falls_off_to_a_hard_cutoff() {
    let dir = Vec2::X;
    assert_eq!(magnetic_offset(dir * 0.0, 0.0, true), Vec2::ZERO);

    let at_75 = magnetic_offset(dir * 75.0, 75.0, true);
    assert!(close(at_75.x, 75.0 * 0.5 * 0.1));

    let at_149 = magnetic_offset(dir * 149.0, 149.0, true);
    assert!(close(at_149.x, 149.0 * (1.0 / 150.0) * 0.1));
    assert!(at_149.x > 0.0);

    assert_eq!(magnetic_offset(dir * 150.0, 150.0, true), Vec2::ZERO);
    assert_eq!(magnetic_offset(dir * 151.0, 151.0, true), Vec2::ZERO);
}

#[test]
fn magnetic_pull_can_be_disabled() {
    assert_eq!(magnetic_offset(Vec2::new(10.0, 5.0), 11.18, false), Vec2::ZERO);
    let mut c = InteractionController::new(false);
    c.on_pointer_move(Vec2::new(100.0, 20.0), Some(PANEL));
    assert_eq!(c.state().magnetic_offset, Vec2::ZERO);
    assert!(c.state().distance_from_center > 0.0);
}

#[test]
fn turning_magnetic_pull_off_drops_the_offset() {
    let mut c = InteractionController::default();
    c.on_pointer_move(Vec2::new(85.0, 4.5), Some(PANEL));
    assert_ne!(c.state().magnetic_offset, Vec2::ZERO);

    c.set_magnetic_pull(false);
    assert_eq!(c.state().magnetic_offset, Vec2::ZERO);
    c.on_pointer_move(Vec2::new(90.0, 10.0), Some(PANEL));
    assert_eq!(c.state().magnetic_offset, Vec2::ZERO);

    c.set_magnetic_pull(true);
    c.on_pointer_move(Vec2::new(85.0, 4.5), Some(PANEL));
    assert!(close(c.state().magnetic_offset.x, -3.0564));
}

#[test]
fn move_computes_offsets_against_the_container() {
    let mut c = InteractionController::default();
    // Centre is (135, 34.5); this sample is (-50, -30) away.
    assert!(c.on_pointer_move(Vec2::new(85.0, 4.5), Some(PANEL)));
    let s = c.state();
    assert!(close(s.distance_from_center, 58.3095));
    assert!(close(s.magnetic_offset.x, -3.0564));
    assert!(close(s.magnetic_offset.y, -1.8338));
    assert!(close(s.offset_from_center.x, -50.0 / 270.0 * 100.0));
    assert!(close(s.offset_from_center.y, -30.0 / 69.0 * 100.0));
    assert_eq!(s.global_position, Vec2::new(85.0, 4.5));
}

#[test]
fn unbound_container_ignores_moves() {
    let mut c = InteractionController::default();
    c.on_pointer_move(Vec2::new(100.0, 30.0), Some(PANEL));
    let before = *c.state();
    assert!(!c.on_pointer_move(Vec2::new(5.0, 5.0), None));
    assert_eq!(*c.state(), before);
}

#[test]
fn zero_sized_container_gives_zero_percent_offset() {
    let s = transition(
        PointerState::default(),
        &PointerEvent::Move {
            position: Vec2::new(10.0, 10.0),
            bounds: Some(Rect::new(0.0, 0.0, 0.0, 0.0)),
        },
        true,
    );
    assert_eq!(s.offset_from_center, Vec2::ZERO);
    assert!(s.magnetic_offset.is_finite());
}

#[test]
fn leave_and_rebind_reset_pointer_state() {
    let mut c = InteractionController::default();
    c.on_pointer_enter();
    c.on_pointer_move(Vec2::new(120.0, 30.0), Some(PANEL));
    assert!(c.is_hovered());
    c.on_pointer_leave();
    assert!(!c.is_hovered());
    assert_eq!(*c.state(), PointerState::default());

    c.on_pointer_move(Vec2::new(120.0, 30.0), Some(PANEL));
    c.bind_container();
    assert_eq!(*c.state(), PointerState::default());
}

#[test]
fn overrides_win_over_tracking() {
    let mut c = InteractionController::default();
    c.on_pointer_move(Vec2::new(85.0, 4.5), Some(PANEL));
    c.set_overrides(PointerOverrides {
        global_position: Some(Vec2::new(1.0, 2.0)),
        mouse_offset: None,
    });
    let snap = c.snapshot();
    assert_eq!(snap.global_position, Vec2::new(1.0, 2.0));
    assert_eq!(snap.mouse_offset, c.state().offset_from_center);

    c.set_overrides(PointerOverrides {
        global_position: None,
        mouse_offset: Some(Vec2::new(10.0, -10.0)),
    });
    let snap = c.snapshot();
    assert_eq!(snap.global_position, Vec2::new(85.0, 4.5));
    assert_eq!(snap.mouse_offset, Vec2::new(10.0, -10.0));

    c.set_overrides(PointerOverrides::default());
    assert_eq!(c.snapshot().mouse_offset, c.state().offset_from_center);
}

#[test]
fn click_spawns_a_ripple_at_the_position() {
    let mut c = InteractionController::default();
    let now = Instant::now();
    let id = c.on_click(Vec2::new(10.0, 10.0), now);
    let active: Vec<_> = c.ripples().active(now).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, id);
    assert_eq!((active[0].x, active[0].y), (10.0, 10.0));
}

#[test]
fn ripple_lives_for_exactly_its_lifetime() {
    let mut set = RippleSet::default();
    let t0 = Instant::now();
    set.spawn(Vec2::ZERO, t0);
    assert_eq!(set.active(t0 + Duration::from_millis(599)).count(), 1);
    assert_eq!(set.active(t0 + Duration::from_millis(600)).count(), 1);
    assert_eq!(set.active(t0 + Duration::from_millis(601)).count(), 0);
    // Not pruned until expire runs.
    assert_eq!(set.len(), 1);
    assert_eq!(set.expire(t0 + Duration::from_millis(601)), 1);
    assert!(set.is_empty());
}

#[test]
fn ripple_ids_increase_and_removal_is_by_id() {
    let mut c = InteractionController::default();
    let now = Instant::now();
    let a = c.on_click(Vec2::new(1.0, 1.0), now);
    let b = c.on_click(Vec2::new(2.0, 2.0), now);
    let d = c.on_click(Vec2::new(3.0, 3.0), now);
    assert!(a < b && b < d);

    assert!(c.remove_ripple(b));
    assert!(!c.remove_ripple(b));
    let ids: Vec<_> = c.ripples().active(now).map(|r| r.id).collect();
    assert_eq!(ids, vec![a, d]);
    assert!(c.ripples().contains(a));
    assert!(!c.ripples().contains(b));
}

#[test]
fn ripples_expire_in_creation_order() {
    let mut c = InteractionController::default();
    let t0 = Instant::now();
    c.on_click(Vec2::ZERO, t0);
    let late = c.on_click(Vec2::ZERO, t0 + Duration::from_millis(300));
    assert_eq!(c.expire(t0 + Duration::from_millis(700)), 1);
    let ids: Vec<_> = c.ripples().active(t0 + Duration::from_millis(700)).map(|r| r.id).collect();
    assert_eq!(ids, vec![late]);
}

#[test]
fn ripple_grows_and_fades() {
    let mut set = RippleSet::default();
    let t0 = Instant::now();
    set.spawn(Vec2::new(5.0, 6.0), t0);
    let start = set.appearances(t0)[0];
    assert_eq!(start.diameter, 20.0);
    assert_eq!(start.opacity, 1.0);
    let mid = set.appearances(t0 + Duration::from_millis(300))[0];
    assert!(close(mid.diameter, 60.0));
    assert!(close(mid.opacity, 0.5));
    let end = set.appearances(t0 + Duration::from_millis(600))[0];
    assert!(close(end.diameter, 100.0));
    assert!(close(end.opacity, 0.0));
}

#[test]
fn reset_clears_everything() {
    let mut c = InteractionController::default();
    c.on_pointer_enter();
    c.on_pointer_move(Vec2::new(100.0, 30.0), Some(PANEL));
    c.on_click(Vec2::ZERO, Instant::now());
    c.reset();
    assert!(!c.is_hovered());
    assert!(c.ripples().is_empty());
    assert_eq!(*c.state(), PointerState::default());
}

#[test]
fn zero_lifetime_ripple_is_born_finished() {
    let mut set = RippleSet::with_lifetime(Duration::ZERO);
    let t0 = Instant::now();
    set.spawn(Vec2::ZERO, t0);
    assert_eq!(set.active(t0).count(), 1);
    let look = set.appearances(t0)[0];
    assert!(close(look.diameter, 100.0));
    assert!(close(look.opacity, 0.0));
    assert_eq!(set.expire(t0 + Duration::from_millis(1)), 1);
}
