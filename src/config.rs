//! Tunable constants for the zoom engine.
//!
//! Every field has a default matching the shipped game, so a partial JSON
//! override (as stored in `localStorage`) only needs the keys it changes.

use serde::{Deserialize, Serialize};

/// Smallest allowed scale. At this scale panning is disabled.
pub const MIN_SCALE: f64 = 1.0;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 10.0;

/// Error type for loading or validating a [`ZoomConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scale range must satisfy 0 < min < max, got min={min} max={max}")]
    ScaleRange { min: f64, max: f64 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("damp factor must be in (0, 1], got {0}")]
    DampFactor(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per wheel notch. Half of it is the per-step translation weight.
    pub wheel_step: f64,
    /// Fraction of overscroll kept while dragging past the bounds.
    pub damp_factor: f64,
    /// Micro-movement filter in pixels, multiplied by the current scale.
    pub drag_threshold: f64,
    /// Releases closer than this to the press position count as taps.
    pub tap_radius: f64,
    pub snap_back_ms: u32,
    pub zoom_to_ms: u32,
    pub zoom_to_scale: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            wheel_step: 0.4,
            damp_factor: 0.3,
            drag_threshold: 10.0,
            tap_radius: 5.0,
            snap_back_ms: 300,
            zoom_to_ms: 1600,
            zoom_to_scale: 10.0,
        }
    }
}

impl ZoomConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale > 0.0 && self.min_scale < self.max_scale) {
            return Err(ConfigError::ScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        let positive = [
            ("wheel_step", self.wheel_step),
            ("drag_threshold", self.drag_threshold),
            ("tap_radius", self.tap_radius),
            ("snap_back_ms", f64::from(self.snap_back_ms)),
            ("zoom_to_ms", f64::from(self.zoom_to_ms)),
            ("zoom_to_scale", self.zoom_to_scale),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.damp_factor > 0.0 && self.damp_factor <= 1.0) {
            return Err(ConfigError::DampFactor(self.damp_factor));
        }
        Ok(())
    }

    /// Translation weight applied per wheel step, signed by direction.
    pub fn wheel_weight(&self) -> f64 {
        self.wheel_step / 2.0
    }
}
