use super::{
    found_overlay::FoundOverlay,
    zoom_view::{FocusRequest, ViewportTap, ZoomView},
};
use crate::config::ZoomConfig;
use crate::target::{Polygon, Target};
use tracing::{info, warn};
use yew::prelude::*;

const CONFIG_KEY: &str = "spot_zoom_config";
const SCENE_SRC: &str = "assets/scene.jpg";

/// Puzzles for the bundled scene. Polygons are in natural image pixels.
fn demo_targets() -> Vec<Target> {
    [
        ("red kite", "1212,188,1290,160,1334,214,1262,252"),
        ("lost glove", "402,842,458,826,472,880,414,896"),
        ("sleeping cat", "980,700,1080,690,1096,748,990,760"),
    ]
    .into_iter()
    .filter_map(|(name, coords)| match Polygon::parse(coords) {
        Ok(polygon) => Some(Target {
            name: name.to_string(),
            natural_width: 1600.0,
            natural_height: 1067.0,
            polygon,
        }),
        Err(err) => {
            warn!(puzzle = name, %err, "skipping target");
            None
        }
    })
    .collect()
}

fn load_config() -> ZoomConfig {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            if let Ok(Some(raw)) = store.get_item(CONFIG_KEY) {
                match ZoomConfig::from_json(&raw) {
                    Ok(cfg) => return cfg,
                    Err(err) => warn!(%err, "ignoring stored zoom config"),
                }
            }
        }
    }
    ZoomConfig::default()
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| load_config());
    let targets = use_memo((), |_| demo_targets());
    let index = use_state(|| 0_usize);
    let misses = use_state(|| 0_u32);
    let focus = use_state(|| None::<FocusRequest>);
    let found = use_state(|| false);

    let Some(target) = targets.get(*index % targets.len().max(1)).cloned() else {
        return html! { <p>{"No targets configured."}</p> };
    };

    let on_tap = {
        let target = target.clone();
        let config = config.clone();
        let focus = focus.clone();
        let misses = misses.clone();
        let index = index.clone();
        Callback::from(move |tap: ViewportTap| {
            if focus.is_some() {
                return;
            }
            let size = (tap.viewport.width, tap.viewport.height);
            if target.guess(tap.content, size) {
                info!(name = %target.name, "guess hit");
                focus.set(Some(FocusRequest {
                    id: *index as u32,
                    point: target.focus_point(size),
                    scale: config.zoom_to_scale,
                    duration_ms: config.zoom_to_ms,
                }));
            } else {
                misses.set(*misses + 1);
            }
        })
    };
    let on_focus_done = {
        let found = found.clone();
        Callback::from(move |_id: u32| found.set(true))
    };
    let next = {
        let index = index.clone();
        let misses = misses.clone();
        let focus = focus.clone();
        let found = found.clone();
        Callback::from(move |_| {
            index.set(*index + 1);
            misses.set(0);
            focus.set(None);
            found.set(false);
        })
    };

    html! {
        <div style="position:relative; width:100vw; height:100vh; background:#0d1117; color:#c9d1d9; font-family:sans-serif;">
            <div style="position:absolute; top:12px; left:50%; transform:translateX(-50%); z-index:10; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:6px 14px;">
                { format!("Find the {}  ·  misses: {}", target.name, *misses) }
            </div>
            <ZoomView
                key={*index}
                src={SCENE_SRC}
                config={(*config).clone()}
                {on_tap}
                focus={*focus}
                {on_focus_done}
            />
            <FoundOverlay show={*found} name={target.name.clone()} misses={*misses} {next} />
        </div>
    }
}
