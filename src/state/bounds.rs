// Pan limits and the two position-correction policies.

use crate::model::ViewportRect;

/// Maximum pan offset on each axis at a given scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.abs() <= self.max_x && y.abs() <= self.max_y
    }
}

/// `None` when the viewport cannot be measured.
pub fn get_bounds(scale: f64, viewport: Option<&ViewportRect>) -> Option<Bounds> {
    let vp = viewport?;
    Some(Bounds {
        max_x: vp.width * (scale - 1.0) / 2.0,
        max_y: vp.height * (scale - 1.0) / 2.0,
    })
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Rubber band: the part of `value` past a bound is compressed by `factor`.
pub fn damp(value: f64, min: f64, max: f64, factor: f64) -> f64 {
    if value > max {
        max + (value - max) * factor
    } else if value < min {
        min + (value - min) * factor
    } else {
        value
    }
}
