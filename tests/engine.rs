use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot::Canceled;
use spot_zoom::state::TimerKind;
use spot_zoom::{
    ManualClock, Point, PointerRelease, Transform, ViewportRect, WheelInput, ZoomConfig,
    ZoomDirection, ZoomEngine,
};
use yew::Callback;

struct Harness {
    engine: ZoomEngine,
    clock: ManualClock,
    taps: Rc<RefCell<Vec<PointerRelease>>>,
}

fn harness(width: f64, height: f64) -> Harness {
    let clock = ManualClock::new();
    let taps = Rc::new(RefCell::new(Vec::new()));
    let sink = taps.clone();
    let engine = ZoomEngine::new(
        ZoomConfig::default(),
        Some(ViewportRect::sized(width, height)),
        clock.clone(),
        Callback::from(move |r| sink.borrow_mut().push(r)),
    );
    Harness {
        engine,
        clock,
        taps,
    }
}

fn wheel(x: f64, y: f64, delta: f64) -> WheelInput {
    WheelInput {
        x,
        y,
        vertical_delta: delta,
        ctrl_held: false,
    }
}

fn release(x: f64, y: f64) -> PointerRelease {
    PointerRelease {
        x,
        y,
        hit_target: true,
    }
}

/// Pinch around the viewport centre from 50px to 100px apart.
fn pinch_to_double(h: &mut Harness, cx: f64, cy: f64) {
    h.engine
        .touch_start(&[Point::new(cx - 25.0, cy), Point::new(cx + 25.0, cy)]);
    h.engine
        .touch_move(&[Point::new(cx - 50.0, cy), Point::new(cx + 50.0, cy)]);
    h.engine.touch_end(&[], release(cx + 50.0, cy));
}

#[test]
fn seven_wheel_steps_reach_three_point_eight() {
    let mut h = harness(200.0, 200.0);
    for _ in 0..7 {
        assert!(h.engine.wheel(wheel(100.0, 100.0, -100.0)));
    }
    assert_eq!(h.engine.transform().scale, 3.8);
}

#[test]
fn wheel_step_past_max_is_rejected() {
    let mut h = harness(200.0, 200.0);
    for _ in 0..22 {
        h.engine.wheel(wheel(100.0, 100.0, -100.0));
    }
    assert_eq!(h.engine.transform().scale, 9.8);
    let before = h.engine.transform();
    assert!(!h.engine.wheel(wheel(100.0, 100.0, -100.0)));
    assert_eq!(h.engine.transform(), before);
}

#[test]
fn wheel_down_at_rest_resets_wherever_the_cursor_is() {
    let mut h = harness(200.0, 200.0);
    h.engine.pointer_down(Point::new(100.0, 100.0));
    h.engine.pointer_move(Point::new(160.0, 100.0));
    assert_ne!(h.engine.transform().offset_x, 0.0);
    h.engine.wheel(wheel(5.0, 190.0, 100.0));
    assert_eq!(h.engine.transform(), Transform::IDENTITY);
}

#[test]
fn wheel_out_to_minimum_zeroes_offset() {
    let mut h = harness(200.0, 200.0);
    h.engine.wheel(wheel(20.0, 30.0, -100.0));
    let zoomed = h.engine.transform();
    assert_eq!(zoomed.scale, 1.4);
    assert_ne!(zoomed.offset_x, 0.0);
    h.engine.wheel(wheel(150.0, 170.0, 100.0));
    assert_eq!(h.engine.transform(), Transform::IDENTITY);
}

#[test]
fn pinch_back_to_minimum_zeroes_offset() {
    let mut h = harness(400.0, 400.0);
    h.engine
        .touch_start(&[Point::new(80.0, 100.0), Point::new(120.0, 100.0)]);
    h.engine
        .touch_move(&[Point::new(60.0, 100.0), Point::new(140.0, 100.0)]);
    let t = h.engine.transform();
    assert_eq!(t.scale, 2.0);
    assert_ne!((t.offset_x, t.offset_y), (0.0, 0.0));

    h.engine.touch_end(&[], release(140.0, 100.0));
    h.engine
        .touch_start(&[Point::new(60.0, 100.0), Point::new(140.0, 100.0)]);
    h.engine
        .touch_move(&[Point::new(90.0, 100.0), Point::new(110.0, 100.0)]);
    assert_eq!(h.engine.transform(), Transform::IDENTITY);
}

#[test]
fn zoom_to_minimum_zeroes_offset() {
    let mut h = harness(200.0, 200.0);
    let _done = h
        .engine
        .animate_zoom_to_with(Point::new(20.0, 40.0), 1.0, 100);
    assert_eq!(h.engine.transform(), Transform::IDENTITY);
}

#[test]
fn tap_fires_once_for_small_release_on_target() {
    let mut h = harness(200.0, 200.0);
    h.engine.pointer_down(Point::new(100.0, 100.0));
    h.engine.pointer_up(release(102.0, 101.0));
    assert_eq!(h.taps.borrow().as_slice(), &[release(102.0, 101.0)]);

    h.engine.pointer_down(Point::new(100.0, 100.0));
    h.engine.pointer_up(release(110.0, 100.0));
    assert_eq!(h.taps.borrow().len(), 1);
}

#[test]
fn one_finger_tap_is_reported() {
    let mut h = harness(200.0, 200.0);
    h.engine.touch_start(&[Point::new(100.0, 100.0)]);
    h.engine.touch_end(&[], release(101.0, 102.0));
    assert_eq!(h.taps.borrow().len(), 1);
}

#[test]
fn pinch_release_never_taps() {
    let mut h = harness(200.0, 200.0);
    pinch_to_double(&mut h, 100.0, 100.0);
    assert!(h.taps.borrow().is_empty());
}

#[test]
fn zoom_to_point_jumps_and_completes_after_duration() {
    let mut h = harness(200.0, 200.0);
    let mut done = h
        .engine
        .animate_zoom_to_with(Point::new(50.0, 50.0), 3.0, 800);
    let t = h.engine.transform();
    assert_eq!((t.offset_x, t.offset_y, t.scale), (150.0, 150.0, 3.0));
    assert!(h.engine.is_zooming());
    assert_eq!(h.engine.next_deadline_in(), Some(800));

    h.clock.advance(799.0);
    assert!(h.engine.poll_timers().is_empty());
    assert_eq!(done.try_recv(), Ok(None));
    assert!(h.engine.is_zooming());

    h.clock.advance(1.0);
    assert_eq!(h.engine.poll_timers(), vec![TimerKind::ZoomTo]);
    assert_eq!(done.try_recv(), Ok(Some(())));
    assert!(!h.engine.is_zooming());
    // the transform is not touched by completion
    assert_eq!(h.engine.transform().scale, 3.0);
}

#[test]
fn zoom_to_point_uses_configured_defaults() {
    let mut h = harness(200.0, 200.0);
    let _done = h.engine.animate_zoom_to(Point::new(100.0, 100.0));
    assert_eq!(h.engine.transform().scale, 10.0);
    assert_eq!(h.engine.next_deadline_in(), Some(1600));
}

#[test]
fn newer_zoom_supersedes_pending_one() {
    let mut h = harness(200.0, 200.0);
    let mut first = h
        .engine
        .animate_zoom_to_with(Point::new(50.0, 50.0), 3.0, 800);
    h.clock.advance(500.0);
    let mut second = h
        .engine
        .animate_zoom_to_with(Point::new(150.0, 150.0), 4.0, 800);
    assert_eq!(first.try_recv(), Err(Canceled));

    h.clock.advance(300.0);
    h.engine.poll_timers();
    assert!(h.engine.is_zooming());
    assert_eq!(second.try_recv(), Ok(None));

    h.clock.advance(500.0);
    h.engine.poll_timers();
    assert_eq!(second.try_recv(), Ok(Some(())));
    assert_eq!(h.engine.transform().offset_x, -200.0);
}

#[test]
fn overscrolled_drag_snaps_back_on_release() {
    let mut h = harness(100.0, 100.0);
    pinch_to_double(&mut h, 50.0, 50.0);
    assert_eq!(h.engine.transform().scale, 2.0);
    assert!(!h.engine.is_snapping());

    h.engine.pointer_down(Point::new(0.0, 0.0));
    h.engine.pointer_move(Point::new(150.0, 0.0));
    assert!((h.engine.transform().offset_x - 80.0).abs() < 1e-9);
    assert!(h.engine.is_dragging());

    h.engine.pointer_up(release(150.0, 0.0));
    let t = h.engine.transform();
    assert_eq!((t.offset_x, t.offset_y), (50.0, 0.0));
    assert!(!h.engine.is_dragging());
    assert!(h.engine.is_snapping());

    h.clock.advance(299.0);
    h.engine.poll_timers();
    assert!(h.engine.is_snapping());
    h.clock.advance(1.0);
    assert_eq!(h.engine.poll_timers(), vec![TimerKind::SnapBack]);
    assert!(!h.engine.is_snapping());
}

#[test]
fn overscrolled_touch_drag_snaps_back_on_lift() {
    let mut h = harness(100.0, 100.0);
    pinch_to_double(&mut h, 50.0, 50.0);

    h.engine.touch_start(&[Point::new(0.0, 0.0)]);
    h.engine.touch_move(&[Point::new(150.0, 0.0)]);
    assert!((h.engine.transform().offset_x - 80.0).abs() < 1e-9);

    h.engine.touch_end(&[], release(150.0, 0.0));
    let t = h.engine.transform();
    assert_eq!((t.offset_x, t.offset_y), (50.0, 0.0));
    assert!(h.engine.is_snapping());
    assert!(h.taps.borrow().is_empty());

    h.clock.advance(300.0);
    assert_eq!(h.engine.poll_timers(), vec![TimerKind::SnapBack]);
    assert!(!h.engine.is_snapping());
}

#[test]
fn release_inside_bounds_does_not_snap() {
    let mut h = harness(100.0, 100.0);
    pinch_to_double(&mut h, 50.0, 50.0);
    h.engine.pointer_down(Point::new(0.0, 0.0));
    h.engine.pointer_move(Point::new(30.0, 0.0));
    h.engine.pointer_up(release(30.0, 0.0));
    assert_eq!(h.engine.transform().offset_x, 30.0);
    assert!(!h.engine.is_snapping());
    assert_eq!(h.engine.next_deadline_in(), None);
}

#[test]
fn new_gesture_cancels_pending_snap_back() {
    let mut h = harness(100.0, 100.0);
    pinch_to_double(&mut h, 50.0, 50.0);
    h.engine.pointer_down(Point::new(0.0, 0.0));
    h.engine.pointer_move(Point::new(150.0, 0.0));
    h.engine.pointer_up(release(150.0, 0.0));
    assert!(h.engine.is_snapping());

    h.clock.advance(100.0);
    h.engine.pointer_down(Point::new(10.0, 10.0));
    assert!(!h.engine.is_snapping());
    assert_eq!(h.engine.next_deadline_in(), None);
}

#[test]
fn reset_restores_identity_and_clears_snap() {
    let mut h = harness(100.0, 100.0);
    pinch_to_double(&mut h, 50.0, 50.0);
    h.engine.pointer_down(Point::new(0.0, 0.0));
    h.engine.pointer_move(Point::new(0.0, -150.0));
    h.engine.pointer_up(release(0.0, -150.0));
    assert!(h.engine.is_snapping());

    assert!(h.engine.reset_transform());
    assert_eq!(h.engine.transform(), Transform::IDENTITY);
    assert!(!h.engine.is_snapping());
    assert!(!h.engine.reset_transform());
}

#[test]
fn descriptor_tracks_transform() {
    let mut h = harness(200.0, 200.0);
    let _done = h
        .engine
        .animate_zoom_to_with(Point::new(50.0, 50.0), 3.0, 800);
    assert_eq!(
        h.engine.descriptor().to_css(),
        "translate(150px, 150px) scale(3)"
    );
}

#[test]
fn zoom_out_from_pinched_scale_reaches_rest() {
    let mut h = harness(200.0, 200.0);
    h.engine
        .touch_start(&[Point::new(50.0, 100.0), Point::new(150.0, 100.0)]);
    h.engine
        .touch_move(&[Point::new(45.0, 100.0), Point::new(155.0, 100.0)]);
    h.engine.touch_end(&[], release(155.0, 100.0));
    assert!((h.engine.transform().scale - 1.1).abs() < 1e-9);

    assert!(h.engine.zoom_step(ZoomDirection::Out));
    assert_eq!(h.engine.transform(), Transform::IDENTITY);

    h.engine
        .touch_start(&[Point::new(50.0, 100.0), Point::new(150.0, 100.0)]);
    h.engine
        .touch_move(&[Point::new(40.0, 100.0), Point::new(160.0, 100.0)]);
    h.engine.touch_end(&[], release(160.0, 100.0));
    assert!(h.engine.wheel(wheel(20.0, 20.0, 100.0)));
    assert_eq!(h.engine.transform(), Transform::IDENTITY);
}

#[test]
fn drag_interrupts_running_zoom_to() {
    let mut h = harness(200.0, 200.0);
    let mut done = h
        .engine
        .animate_zoom_to_with(Point::new(50.0, 50.0), 3.0, 1600);
    h.clock.advance(200.0);

    h.engine.pointer_down(Point::new(100.0, 100.0));
    assert!(!h.engine.is_zooming());
    assert_eq!(done.try_recv(), Ok(Some(())));
    assert_eq!(h.engine.next_deadline_in(), None);

    h.engine.pointer_move(Point::new(60.0, 100.0));
    let flags = h.engine.flags();
    assert!(flags.is_dragging && !flags.is_zooming);

    h.clock.advance(2000.0);
    assert!(h.engine.poll_timers().is_empty());
}

#[test]
fn touch_interrupts_running_zoom_to() {
    let mut h = harness(200.0, 200.0);
    let mut done = h.engine.animate_zoom_to(Point::new(50.0, 50.0));
    h.engine
        .touch_start(&[Point::new(80.0, 100.0), Point::new(120.0, 100.0)]);
    assert!(!h.engine.is_zooming());
    assert_eq!(done.try_recv(), Ok(Some(())));
}
