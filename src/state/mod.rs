pub mod bounds;
pub mod gesture;
pub mod timers;
pub mod transform;
pub mod viewport;

pub use bounds::{Bounds, clamp, damp, get_bounds};
pub use gesture::{DragSession, GestureSession, PinchSession};
pub use timers::{BrowserClock, Clock, ManualClock, TimerKind, TimerQueue};
pub use transform::Transform;
pub use viewport::Viewport;
