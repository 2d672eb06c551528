//! Deadline-based, cancellable timers.
//!
//! The engine never sleeps. It records when each pending timer is due and the
//! host calls back in (`ZoomEngine::poll_timers`) once that time has passed.
//! At most one timer per [`TimerKind`] exists; scheduling a kind again
//! replaces the stale deadline, which then never fires.

use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    /// Monotonic-enough milliseconds.
    fn now_ms(&self) -> f64;
}

/// Wall clock of the JS host.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    SnapBack,
    ZoomTo,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    snap_back: Option<f64>,
    zoom_to: Option<f64>,
}

impl TimerQueue {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<f64> {
        match kind {
            TimerKind::SnapBack => &mut self.snap_back,
            TimerKind::ZoomTo => &mut self.zoom_to,
        }
    }

    /// Arm `kind` to fire at `now + delay_ms`. Returns true if a pending
    /// timer of the same kind was replaced.
    pub fn schedule(&mut self, kind: TimerKind, now: f64, delay_ms: u32) -> bool {
        self.slot(kind).replace(now + f64::from(delay_ms)).is_some()
    }

    /// Returns true if a timer was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.slot(kind).take().is_some()
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::SnapBack => self.snap_back.is_some(),
            TimerKind::ZoomTo => self.zoom_to.is_some(),
        }
    }

    pub fn next_deadline(&self) -> Option<f64> {
        match (self.snap_back, self.zoom_to) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<TimerKind> {
        let mut due = Vec::new();
        for kind in [TimerKind::SnapBack, TimerKind::ZoomTo] {
            if let Some(at) = *self.slot(kind) {
                if at <= now {
                    due.push((at, kind));
                    *self.slot(kind) = None;
                }
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, kind)| kind).collect()
    }
}
