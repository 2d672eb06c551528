//! Pan, zoom and pinch engine for a "spot the object" picture viewport,
//! plus the Yew components that host it.

pub mod components;
pub mod config;
pub mod engine;
pub mod model;
pub mod state;
pub mod target;
pub mod util;

pub use config::{ConfigError, MAX_SCALE, MIN_SCALE, ZoomConfig};
pub use engine::{ZoomCompletion, ZoomEngine};
pub use model::{
    AnimationFlags, Point, PointerRelease, TransformDescriptor, ViewportRect, WheelInput,
    ZoomDirection,
};
pub use state::{BrowserClock, Clock, ManualClock, Transform, Viewport};
