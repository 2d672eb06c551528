//! Input event shapes consumed by the zoom engine and the values it exposes.
//! Coordinates are client pixels unless stated otherwise.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Pointer or finger release. `hit_target` is true when the release landed on
/// the image element that accepts guesses.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerRelease {
    pub x: f64,
    pub y: f64,
    pub hit_target: bool,
}

impl PointerRelease {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    pub x: f64,
    pub y: f64,
    /// DOM `deltaY`: negative scrolls up (zoom in), positive scrolls down.
    pub vertical_delta: f64,
    /// Ctrl held means the browser is doing its own page zoom.
    pub ctrl_held: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Direction for a wheel delta; `None` for a zero delta.
    pub fn from_wheel_delta(delta: f64) -> Option<Self> {
        if delta < 0.0 {
            Some(Self::In)
        } else if delta > 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Self::In => 1.0,
            Self::Out => -1.0,
        }
    }
}

/// Untransformed on-screen rectangle of the viewport element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub const fn sized(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// `translate(x px, y px) scale(s)` with a centre transform origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformDescriptor {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl TransformDescriptor {
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TransformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFlags {
    pub is_dragging: bool,
    pub is_snapping: bool,
    pub is_zooming: bool,
}
