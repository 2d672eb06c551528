//! Gesture-to-transform engine.
//!
//! [`ZoomEngine`] turns mouse, touch and wheel input into a bounded
//! `(scale, offset)` transform:
//!
//! - one pointer or finger pans, with rubber-band damping past the bounds
//!   and a micro-movement filter;
//! - two fingers zoom around the point under their midpoint;
//! - wheel notches step the scale around the cursor;
//! - releasing out of bounds snaps back, flagged for a timed transition;
//! - [`ZoomEngine::animate_zoom_to`] centres a point at a target scale and
//!   resolves a completion signal once the transition time has elapsed.
//!
//! Every handler returns `true` when the transform or the animation flags
//! changed, so the host knows to re-render. Nothing here fails: without a
//! measurable viewport the bounds-dependent work is skipped.

use std::fmt;

use futures::channel::oneshot;
use tracing::{debug, trace};
use yew::Callback;

use crate::config::ZoomConfig;
use crate::model::{
    AnimationFlags, Point, PointerRelease, TransformDescriptor, ViewportRect, WheelInput,
    ZoomDirection,
};
use crate::state::{
    Bounds, Clock, DragSession, GestureSession, PinchSession, TimerKind, TimerQueue, Transform,
    Viewport, clamp, damp, get_bounds,
};
use crate::util::round_tenth;

/// Resolves with `Ok(())` when a zoom-to-point transition has run its course,
/// or with `Err(Canceled)` if a newer call superseded it.
pub type ZoomCompletion = oneshot::Receiver<()>;

pub struct ZoomEngine {
    config: ZoomConfig,
    transform: Transform,
    session: GestureSession,
    timers: TimerQueue,
    zoom_done: Option<oneshot::Sender<()>>,
    viewport: Box<dyn Viewport>,
    clock: Box<dyn Clock>,
    on_tap: Callback<PointerRelease>,
}

impl fmt::Debug for ZoomEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomEngine")
            .field("config", &self.config)
            .field("transform", &self.transform)
            .field("session", &self.session)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

impl ZoomEngine {
    pub fn new(
        config: ZoomConfig,
        viewport: impl Viewport + 'static,
        clock: impl Clock + 'static,
        on_tap: Callback<PointerRelease>,
    ) -> Self {
        let mut transform = Transform::default();
        transform.reset(config.min_scale);
        Self {
            config,
            transform,
            session: GestureSession::None,
            timers: TimerQueue::default(),
            zoom_done: None,
            viewport: Box::new(viewport),
            clock: Box::new(clock),
            on_tap,
        }
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn descriptor(&self) -> TransformDescriptor {
        self.transform.descriptor()
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    pub fn is_snapping(&self) -> bool {
        self.timers.is_pending(TimerKind::SnapBack)
    }

    pub fn is_zooming(&self) -> bool {
        self.timers.is_pending(TimerKind::ZoomTo)
    }

    pub fn flags(&self) -> AnimationFlags {
        AnimationFlags {
            is_dragging: self.is_dragging(),
            is_snapping: self.is_snapping(),
            is_zooming: self.is_zooming(),
        }
    }

    pub fn viewport(&self) -> Option<ViewportRect> {
        self.viewport.measure()
    }

    fn measure(&self) -> Option<ViewportRect> {
        let rect = self.viewport.measure();
        if rect.is_none() {
            debug!("viewport unavailable, skipping");
        }
        rect
    }

    fn bounds_at(&self, scale: f64) -> Option<Bounds> {
        get_bounds(scale, self.measure().as_ref())
    }

    fn tracked(&mut self, f: impl FnOnce(&mut Self)) -> bool {
        let before = (self.transform, self.flags());
        f(self);
        before != (self.transform, self.flags())
    }

    fn enforce_rest(&mut self) {
        if self.transform.enforce_rest(self.config.min_scale) {
            trace!("scale at minimum, offset zeroed");
        }
    }

    fn cancel_snap_back(&mut self) {
        if self.timers.cancel(TimerKind::SnapBack) {
            debug!("snap-back interrupted");
        }
    }

    /// A new gesture takes over: snap-back is dropped and a running zoom-to
    /// completes where it stands.
    fn interrupt_animations(&mut self) {
        self.cancel_snap_back();
        if self.timers.cancel(TimerKind::ZoomTo) {
            debug!("zoom-to interrupted by gesture");
        }
        if let Some(done) = self.zoom_done.take() {
            let _ = done.send(());
        }
    }

    // ---- drag -------------------------------------------------------------

    pub fn pointer_down(&mut self, pos: Point) -> bool {
        self.tracked(|e| {
            e.interrupt_animations();
            e.start_drag(pos, true);
        })
    }

    pub fn pointer_move(&mut self, pos: Point) -> bool {
        self.tracked(|e| e.drag_to(pos))
    }

    pub fn pointer_up(&mut self, release: PointerRelease) -> bool {
        self.tracked(|e| e.end_drag(release))
    }

    fn start_drag(&mut self, pos: Point, tap_eligible: bool) {
        let offset = Point::new(self.transform.offset_x, self.transform.offset_y);
        self.session = GestureSession::Drag(DragSession {
            origin: Point::new(pos.x - offset.x, pos.y - offset.y),
            origin_offset: offset,
            down_pos: pos,
            tap_eligible,
        });
        debug!(x = pos.x, y = pos.y, tap_eligible, "drag start");
    }

    fn drag_to(&mut self, pos: Point) {
        let GestureSession::Drag(drag) = self.session else {
            return;
        };
        let candidate = Point::new(pos.x - drag.origin.x, pos.y - drag.origin.y);
        let threshold = self.config.drag_threshold * self.transform.scale;
        if (candidate.x - self.transform.offset_x).abs() < threshold
            && (candidate.y - self.transform.offset_y).abs() < threshold
        {
            return;
        }
        let Some(b) = self.bounds_at(self.transform.scale) else {
            return;
        };
        let factor = self.config.damp_factor;
        self.transform.offset_x = damp(candidate.x, -b.max_x, b.max_x, factor);
        self.transform.offset_y = damp(candidate.y, -b.max_y, b.max_y, factor);
        trace!(
            x = self.transform.offset_x,
            y = self.transform.offset_y,
            "drag move"
        );
    }

    fn end_drag(&mut self, release: PointerRelease) {
        if !self.session.is_dragging() {
            return;
        }
        let GestureSession::Drag(drag) = self.session.take() else {
            return;
        };
        let moved = drag.down_pos.distance_squared(release.point());
        let radius = self.config.tap_radius;
        if drag.tap_eligible && moved < radius * radius && release.hit_target {
            debug!(x = release.x, y = release.y, "tap");
            self.on_tap.emit(release);
        } else {
            debug!(
                from_x = drag.origin_offset.x,
                from_y = drag.origin_offset.y,
                to_x = self.transform.offset_x,
                to_y = self.transform.offset_y,
                "drag end"
            );
        }
        self.snap_back();
    }

    // ---- touch / pinch ----------------------------------------------------

    /// `touches` is every finger currently down, in order.
    pub fn touch_start(&mut self, touches: &[Point]) -> bool {
        self.tracked(|e| match touches {
            [] => {}
            [p] => {
                e.interrupt_animations();
                e.start_drag(*p, true);
            }
            [a, b, ..] => {
                e.interrupt_animations();
                e.start_pinch(*a, *b);
            }
        })
    }

    pub fn touch_move(&mut self, touches: &[Point]) -> bool {
        self.tracked(|e| match (e.session, touches) {
            (_, []) => {}
            (GestureSession::Pinch(pinch), [a, b, ..]) => e.pinch_to(&pinch, *a, *b),
            (_, [a, b, ..]) => e.start_pinch(*a, *b),
            (GestureSession::Drag(_), [p]) => e.drag_to(*p),
            // A finger left over from a pinch starts panning from here.
            (_, [p]) => e.start_drag(*p, false),
        })
    }

    /// `remaining` are the fingers still down; `released` is the one lifted.
    pub fn touch_end(&mut self, remaining: &[Point], released: PointerRelease) -> bool {
        self.tracked(|e| match e.session {
            GestureSession::Pinch(_) if remaining.len() >= 2 => {}
            GestureSession::Pinch(_) => {
                e.session = GestureSession::None;
                debug!(remaining = remaining.len(), "pinch end");
                if remaining.is_empty() {
                    e.snap_back();
                }
            }
            GestureSession::Drag(_) if remaining.is_empty() => e.end_drag(released),
            GestureSession::Drag(_) => {}
            GestureSession::None if remaining.is_empty() => e.snap_back(),
            GestureSession::None => {}
        })
    }

    fn start_pinch(&mut self, a: Point, b: Point) {
        let Some(vp) = self.measure() else {
            self.session = GestureSession::None;
            return;
        };
        let center = vp.center();
        let mid = a.midpoint(b);
        let t = self.transform;
        let pinch = PinchSession {
            initial_distance: a.distance(b),
            initial_scale: t.scale,
            anchor: Point::new(
                (mid.x - center.x - t.offset_x) / t.scale,
                (mid.y - center.y - t.offset_y) / t.scale,
            ),
            center,
        };
        debug!(
            distance = pinch.initial_distance,
            scale = pinch.initial_scale,
            "pinch start"
        );
        self.session = GestureSession::Pinch(pinch);
    }

    fn pinch_to(&mut self, pinch: &PinchSession, a: Point, b: Point) {
        if pinch.initial_distance == 0.0 {
            // Fingers started on the same spot: measure from the first spread.
            if a.distance(b) > 0.0 {
                self.start_pinch(a, b);
            }
            return;
        }
        let ratio = a.distance(b) / pinch.initial_distance;
        let scale = clamp(
            pinch.initial_scale * ratio,
            self.config.min_scale,
            self.config.max_scale,
        );
        let Some(bounds) = self.bounds_at(scale) else {
            return;
        };
        let mid = a.midpoint(b);
        let x = mid.x - pinch.center.x - scale * pinch.anchor.x;
        let y = mid.y - pinch.center.y - scale * pinch.anchor.y;
        self.transform.scale = scale;
        self.transform.offset_x = clamp(x, -bounds.max_x, bounds.max_x);
        self.transform.offset_y = clamp(y, -bounds.max_y, bounds.max_y);
        self.enforce_rest();
        trace!(scale, "pinch move");
    }

    // ---- wheel ------------------------------------------------------------

    pub fn wheel(&mut self, input: WheelInput) -> bool {
        if input.ctrl_held {
            return false;
        }
        let Some(dir) = ZoomDirection::from_wheel_delta(input.vertical_delta) else {
            return false;
        };
        self.tracked(|e| e.wheel_step(Point::new(input.x, input.y), dir))
    }

    /// One wheel notch anchored at the viewport centre.
    pub fn zoom_step(&mut self, dir: ZoomDirection) -> bool {
        if dir == ZoomDirection::Out && self.transform.scale == self.config.min_scale {
            return self.reset_transform();
        }
        let Some(vp) = self.measure() else {
            return false;
        };
        self.tracked(|e| e.wheel_step(vp.center(), dir))
    }

    fn wheel_step(&mut self, cursor: Point, dir: ZoomDirection) {
        let cfg = &self.config;
        if self.transform.scale == cfg.min_scale && dir == ZoomDirection::Out {
            self.transform.reset(cfg.min_scale);
            self.cancel_snap_back();
            return;
        }
        let old = self.transform.scale;
        let mut new = round_tenth(old + cfg.wheel_step * dir.sign());
        // Off-grid scales (left by a pinch) step out to rest rather than stall.
        if dir == ZoomDirection::Out && new < cfg.min_scale && old > cfg.min_scale {
            new = cfg.min_scale;
        }
        if new > cfg.max_scale || new < cfg.min_scale {
            trace!(from = old, to = new, "wheel step out of range");
            return;
        }
        let weight = cfg.wheel_weight() * dir.sign();
        let Some(vp) = self.measure() else {
            return;
        };
        // Cursor position inside the scaled content box, in unscaled pixels.
        let left = vp.left + vp.width / 2.0 + self.transform.offset_x - old * vp.width / 2.0;
        let top = vp.top + vp.height / 2.0 + self.transform.offset_y - old * vp.height / 2.0;
        let x = (cursor.x - left) / old;
        let y = (cursor.y - top) / old;

        let t = &mut self.transform;
        t.scale = new;
        t.offset_x += -x * weight * 2.0 + vp.width * weight;
        t.offset_y += -y * weight * 2.0 + vp.height * weight;
        if let Some(b) = get_bounds(new, Some(&vp)) {
            t.offset_x = clamp(t.offset_x, -b.max_x, b.max_x);
            t.offset_y = clamp(t.offset_y, -b.max_y, b.max_y);
        }
        self.enforce_rest();
        debug!(from = old, to = new, "wheel zoom");
    }

    // ---- animations -------------------------------------------------------

    fn snap_back(&mut self) {
        let Some(b) = self.bounds_at(self.transform.scale) else {
            return;
        };
        let t = &mut self.transform;
        if b.contains(t.offset_x, t.offset_y) {
            return;
        }
        t.offset_x = clamp(t.offset_x, -b.max_x, b.max_x);
        t.offset_y = clamp(t.offset_y, -b.max_y, b.max_y);
        let now = self.clock.now_ms();
        self.timers
            .schedule(TimerKind::SnapBack, now, self.config.snap_back_ms);
        debug!(x = t.offset_x, y = t.offset_y, "snap-back");
    }

    /// Centre `target` (unscaled viewport pixels) at the configured scale.
    pub fn animate_zoom_to(&mut self, target: Point) -> ZoomCompletion {
        let (scale, duration) = (self.config.zoom_to_scale, self.config.zoom_to_ms);
        self.animate_zoom_to_with(target, scale, duration)
    }

    /// Jump to `scale` with `target` centred. The transform changes at once;
    /// `duration_ms` only governs how long `is_zooming` stays set.
    pub fn animate_zoom_to_with(
        &mut self,
        target: Point,
        scale: f64,
        duration_ms: u32,
    ) -> ZoomCompletion {
        let (done, signal) = oneshot::channel();
        let Some(vp) = self.measure() else {
            let _ = done.send(());
            return signal;
        };
        if self.zoom_done.take().is_some() {
            debug!("zoom-to superseded");
        }
        self.cancel_snap_back();
        self.session = GestureSession::None;

        let scale = clamp(scale, self.config.min_scale, self.config.max_scale);
        self.transform.scale = scale;
        self.transform.offset_x = (vp.width / 2.0 - target.x) * scale;
        self.transform.offset_y = (vp.height / 2.0 - target.y) * scale;
        self.enforce_rest();

        let now = self.clock.now_ms();
        self.timers.schedule(TimerKind::ZoomTo, now, duration_ms);
        self.zoom_done = Some(done);
        debug!(x = target.x, y = target.y, scale, duration_ms, "zoom-to start");
        signal
    }

    /// Fire every timer that is due. Returns the kinds that fired.
    pub fn poll_timers(&mut self) -> Vec<TimerKind> {
        let fired = self.timers.drain_due(self.clock.now_ms());
        for kind in &fired {
            match kind {
                TimerKind::SnapBack => debug!("snap-back settled"),
                TimerKind::ZoomTo => {
                    if let Some(done) = self.zoom_done.take() {
                        let _ = done.send(());
                    }
                    debug!("zoom-to complete");
                }
            }
        }
        fired
    }

    /// Milliseconds until the next timer is due, if any.
    pub fn next_deadline_in(&self) -> Option<u32> {
        let due = self.timers.next_deadline()?;
        let wait = (due - self.clock.now_ms()).ceil().max(0.0);
        Some(wait as u32)
    }

    pub fn reset_transform(&mut self) -> bool {
        self.tracked(|e| {
            e.transform.reset(e.config.min_scale);
            e.cancel_snap_back();
        })
    }

    /// Map a client point to unscaled viewport-local pixels under it.
    pub fn to_content(&self, client: Point) -> Option<Point> {
        let vp = self.measure()?;
        let c = vp.center();
        let t = self.transform;
        Some(Point::new(
            (client.x - c.x - t.offset_x) / t.scale + vp.width / 2.0,
            (client.y - c.y - t.offset_y) / t.scale + vp.height / 2.0,
        ))
    }
}
