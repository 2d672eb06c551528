// Viewport measurement. The host may not have mounted the element yet, in
// which case every bounds-dependent operation is skipped.
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::NodeRef;

use crate::model::ViewportRect;

pub trait Viewport {
    fn measure(&self) -> Option<ViewportRect>;
}

/// Fixed answer, handy for tests and headless hosts.
impl Viewport for Option<ViewportRect> {
    fn measure(&self) -> Option<ViewportRect> {
        *self
    }
}

/// Measures a mounted DOM element. Uses layout size, which ignores CSS
/// transforms, and the bounding box position.
impl Viewport for NodeRef {
    fn measure(&self) -> Option<ViewportRect> {
        let el = self.get()?.dyn_into::<HtmlElement>().ok()?;
        let rect = el.get_bounding_client_rect();
        let width = el.offset_width() as f64;
        let height = el.offset_height() as f64;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(ViewportRect {
            left: rect.left(),
            top: rect.top(),
            width,
            height,
        })
    }
}
