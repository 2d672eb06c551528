use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, EventTarget, HtmlElement, MouseEvent, TouchEvent, TouchList, WheelEvent};
use yew::prelude::*;

use super::zoom_controls::ZoomControls;
use crate::config::ZoomConfig;
use crate::engine::ZoomEngine;
use crate::model::{AnimationFlags, Point, PointerRelease, ViewportRect, WheelInput, ZoomDirection};
use crate::state::BrowserClock;

/// Class of the element that accepts guesses.
pub const HIT_CLASS: &str = "spot-img";

/// Ask the view to zoom onto `point` (unscaled viewport pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusRequest {
    pub id: u32,
    pub point: Point,
    pub scale: f64,
    pub duration_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTap {
    /// Unscaled viewport pixels under the tap.
    pub content: Point,
    pub viewport: ViewportRect,
}

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomViewProps {
    pub src: AttrValue,
    #[prop_or_default]
    pub config: ZoomConfig,
    pub on_tap: Callback<ViewportTap>,
    #[prop_or_default]
    pub focus: Option<FocusRequest>,
    #[prop_or_default]
    pub on_focus_done: Callback<u32>,
}

/// CSS transition for the transformed layer given the engine flags.
pub fn transition_css(flags: AnimationFlags, zoom_ms: u32, snap_ms: u32) -> String {
    if flags.is_zooming {
        format!("transform {zoom_ms}ms ease")
    } else if flags.is_snapping {
        format!("transform {snap_ms}ms ease-out")
    } else {
        "none".to_string()
    }
}

fn touch_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(t.client_x() as f64, t.client_y() as f64))
        .collect()
}

fn client_point(e: &MouseEvent) -> Point {
    Point::new(e.client_x() as f64, e.client_y() as f64)
}

fn on_hit_target(target: Option<EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|el| el.class_list().contains(HIT_CLASS))
}

/// Wake up when the engine's next timer is due. Extra wake-ups are harmless:
/// polling only fires deadlines that have passed.
fn arm_timers(
    engine: &Rc<RefCell<ZoomEngine>>,
    armed: &Rc<RefCell<Option<f64>>>,
    redraw: &UseForceUpdateHandle,
) {
    let Some(wait) = engine.borrow().next_deadline_in() else {
        return;
    };
    let due = js_sys::Date::now() + f64::from(wait);
    if armed.borrow().is_some_and(|at| at <= due) {
        return;
    }
    *armed.borrow_mut() = Some(due);
    let engine = engine.clone();
    let armed = armed.clone();
    let redraw = redraw.clone();
    Timeout::new(wait, move || {
        *armed.borrow_mut() = None;
        let fired = engine.borrow_mut().poll_timers();
        if !fired.is_empty() {
            redraw.force_update();
        }
        arm_timers(&engine, &armed, &redraw);
    })
    .forget();
}

#[function_component(ZoomView)]
pub fn zoom_view(props: &ZoomViewProps) -> Html {
    let viewport_ref = use_node_ref();
    let redraw = use_force_update();
    let taps = use_mut_ref(Vec::<PointerRelease>::new);
    let armed = use_mut_ref(|| None::<f64>);
    let on_tap_ref = use_mut_ref(|| props.on_tap.clone());
    let engine = {
        let viewport_ref = viewport_ref.clone();
        let taps = taps.clone();
        let config = props.config.clone();
        use_mut_ref(move || {
            let sink = Callback::from(move |r: PointerRelease| taps.borrow_mut().push(r));
            ZoomEngine::new(config, viewport_ref, BrowserClock, sink)
        })
    };

    // Effect: keep the latest tap handler
    {
        let on_tap_ref = on_tap_ref.clone();
        use_effect_with(props.on_tap.clone(), move |cb| {
            *on_tap_ref.borrow_mut() = cb.clone();
            || ()
        });
    }

    // Runs after every engine call: redraw, re-arm timers, report taps.
    let settle: Rc<dyn Fn(bool)> = {
        let engine = engine.clone();
        let taps = taps.clone();
        let armed = armed.clone();
        let redraw = redraw.clone();
        let on_tap_ref = on_tap_ref.clone();
        Rc::new(move |changed: bool| {
            let tapped: Vec<ViewportTap> = {
                let e = engine.borrow();
                taps.borrow_mut()
                    .drain(..)
                    .filter_map(|r| {
                        Some(ViewportTap {
                            content: e.to_content(r.point())?,
                            viewport: e.viewport()?,
                        })
                    })
                    .collect()
            };
            if changed {
                redraw.force_update();
            }
            arm_timers(&engine, &armed, &redraw);
            let cb = on_tap_ref.borrow().clone();
            for tap in tapped {
                cb.emit(tap);
            }
        })
    };

    // Mount effect: DOM listeners
    {
        let engine = engine.clone();
        let viewport_ref = viewport_ref.clone();
        let settle = settle.clone();
        use_effect_with((), move |_| {
            let (Some(window), Some(viewport)) =
                (web_sys::window(), viewport_ref.cast::<HtmlElement>())
            else {
                debug!("viewport not mounted, no listeners attached");
                return Box::new(|| ()) as Box<dyn FnOnce()>;
            };
            let mousedown_cb = {
                let engine = engine.clone();
                let settle = settle.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    if e.button() != 0 {
                        return;
                    }
                    e.prevent_default();
                    let changed = engine.borrow_mut().pointer_down(client_point(&e));
                    settle(changed);
                }) as Box<dyn FnMut(_)>)
            };
            viewport
                .add_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                )
                .ok();
            let mousemove_cb = {
                let engine = engine.clone();
                let settle = settle.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    if !engine.borrow().is_dragging() {
                        return;
                    }
                    e.prevent_default();
                    let changed = engine.borrow_mut().pointer_move(client_point(&e));
                    settle(changed);
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                )
                .ok();
            let mouseup_cb = {
                let engine = engine.clone();
                let settle = settle.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let release = PointerRelease {
                        x: e.client_x() as f64,
                        y: e.client_y() as f64,
                        hit_target: on_hit_target(e.target()),
                    };
                    let changed = engine.borrow_mut().pointer_up(release);
                    settle(changed);
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .ok();
            let wheel_cb = {
                let engine = engine.clone();
                let settle = settle.clone();
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    // Leave ctrl+wheel to the browser's own page zoom.
                    if e.ctrl_key() {
                        return;
                    }
                    e.prevent_default();
                    let changed = engine.borrow_mut().wheel(WheelInput {
                        x: e.client_x() as f64,
                        y: e.client_y() as f64,
                        vertical_delta: e.delta_y(),
                        ctrl_held: e.ctrl_key(),
                    });
                    settle(changed);
                }) as Box<dyn FnMut(_)>)
            };
            viewport
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .ok();
            // Touch
            let touch_start_cb = {
                let engine = engine.clone();
                let settle = settle.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    let changed = engine.borrow_mut().touch_start(&touch_points(&e.touches()));
                    settle(changed);
                }) as Box<dyn FnMut(_)>)
            };
            viewport
                .add_event_listener_with_callback(
                    "touchstart",
                    touch_start_cb.as_ref().unchecked_ref(),
                )
                .ok();
            let touch_move_cb = {
                let engine = engine.clone();
                let settle = settle.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    let changed = engine.borrow_mut().touch_move(&touch_points(&e.touches()));
                    settle(changed);
                }) as Box<dyn FnMut(_)>)
            };
            viewport
                .add_event_listener_with_callback(
                    "touchmove",
                    touch_move_cb.as_ref().unchecked_ref(),
                )
                .ok();
            let touch_end_cb = {
                let engine = engine.clone();
                let settle = settle.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let Some(lifted) = e.changed_touches().get(0) else {
                        return;
                    };
                    e.prevent_default();
                    let release = PointerRelease {
                        x: lifted.client_x() as f64,
                        y: lifted.client_y() as f64,
                        hit_target: e.type_() == "touchend" && on_hit_target(e.target()),
                    };
                    let remaining = touch_points(&e.touches());
                    let changed = engine.borrow_mut().touch_end(&remaining, release);
                    settle(changed);
                }) as Box<dyn FnMut(_)>)
            };
            viewport
                .add_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref())
                .ok();
            viewport
                .add_event_listener_with_callback(
                    "touchcancel",
                    touch_end_cb.as_ref().unchecked_ref(),
                )
                .ok();
            // Cleanup
            Box::new(move || {
                let _ = viewport.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let _ = viewport
                    .remove_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());
                let _ = viewport.remove_event_listener_with_callback(
                    "touchstart",
                    touch_start_cb.as_ref().unchecked_ref(),
                );
                let _ = viewport.remove_event_listener_with_callback(
                    "touchmove",
                    touch_move_cb.as_ref().unchecked_ref(),
                );
                let _ = viewport.remove_event_listener_with_callback(
                    "touchend",
                    touch_end_cb.as_ref().unchecked_ref(),
                );
                let _ = viewport.remove_event_listener_with_callback(
                    "touchcancel",
                    touch_end_cb.as_ref().unchecked_ref(),
                );
                let _keep_alive = (
                    &mousedown_cb,
                    &mousemove_cb,
                    &mouseup_cb,
                    &wheel_cb,
                    &touch_start_cb,
                    &touch_move_cb,
                    &touch_end_cb,
                );
            }) as Box<dyn FnOnce()>
        });
    }

    // Effect: programmatic zoom onto a point
    {
        let engine = engine.clone();
        let settle = settle.clone();
        let done = props.on_focus_done.clone();
        use_effect_with(props.focus, move |focus| {
            if let Some(req) = *focus {
                let signal =
                    engine
                        .borrow_mut()
                        .animate_zoom_to_with(req.point, req.scale, req.duration_ms);
                settle(true);
                wasm_bindgen_futures::spawn_local(async move {
                    match signal.await {
                        Ok(()) => done.emit(req.id),
                        Err(_) => debug!(id = req.id, "focus superseded"),
                    }
                });
            }
            || ()
        });
    }

    let on_zoom_in = {
        let engine = engine.clone();
        let settle = settle.clone();
        Callback::from(move |_| {
            let changed = engine.borrow_mut().zoom_step(ZoomDirection::In);
            settle(changed);
        })
    };
    let on_zoom_out = {
        let engine = engine.clone();
        let settle = settle.clone();
        Callback::from(move |_| {
            let changed = engine.borrow_mut().zoom_step(ZoomDirection::Out);
            settle(changed);
        })
    };
    let on_reset = {
        let engine = engine.clone();
        let settle = settle.clone();
        Callback::from(move |_| {
            let changed = engine.borrow_mut().reset_transform();
            settle(changed);
        })
    };

    let (desc, flags) = {
        let e = engine.borrow();
        (e.descriptor(), e.flags())
    };
    let zoom_ms = props
        .focus
        .map_or(props.config.zoom_to_ms, |f| f.duration_ms);
    let transition = transition_css(flags, zoom_ms, props.config.snap_back_ms);
    let cursor = if flags.is_dragging { "grabbing" } else { "grab" };
    let layer_style = format!(
        "width:100%; height:100%; transform-origin:center center; transform:{desc}; transition:{transition};"
    );
    html! {
        <div style="position:relative; width:100%; height:100%;">
            <div ref={viewport_ref} style={format!("position:absolute; inset:0; overflow:hidden; touch-action:none; background:#0d1117; cursor:{cursor};")}>
                <div style={layer_style}>
                    <img class={HIT_CLASS} src={props.src.clone()} draggable="false" style="width:100%; height:100%; object-fit:contain; user-select:none; display:block;" />
                </div>
            </div>
            <ZoomControls scale={desc.scale} {on_zoom_in} {on_zoom_out} {on_reset} />
        </div>
    }
}
