// Transient gesture state. Exactly one session is live at a time; ending a
// gesture replaces it with `None`, so nothing leaks into the next one.
use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer position minus the offset at drag start.
    pub origin: Point,
    pub origin_offset: Point,
    pub down_pos: Point,
    /// False when the drag was inherited from a collapsing pinch.
    pub tap_eligible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSession {
    pub initial_distance: f64,
    pub initial_scale: f64,
    /// Content point under the finger midpoint, relative to the content
    /// centre, in unscaled pixels.
    pub anchor: Point,
    /// Untransformed viewport centre in client pixels.
    pub center: Point,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum GestureSession {
    #[default]
    None,
    Drag(DragSession),
    Pinch(PinchSession),
}

impl GestureSession {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Drag(_))
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self, Self::Pinch(_))
    }

    /// Take the session out, leaving `None` behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
