pub mod app;
pub mod found_overlay;
pub mod zoom_controls;
pub mod zoom_view;

pub use app::App;
pub use zoom_view::{FocusRequest, ViewportTap, ZoomView};
