use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct FoundOverlayProps {
    pub show: bool,
    pub name: AttrValue,
    pub misses: u32,
    pub next: Callback<()>,
}

#[function_component]
pub fn FoundOverlay(props: &FoundOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let next_btn = {
        let cb = props.next.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #3fb950; padding:24px 32px; border-radius:12px; text-align:center; min-width:280px;">
            <h2 style="margin:0 0 12px 0; color:#3fb950;">{"Found!"}</h2>
            <p style="margin:4px 0;">{ format!("You spotted the {}.", props.name) }</p>
            <p style="margin:4px 0;">{ format!("Missed guesses: {}", props.misses) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={next_btn}>{"Next"}</button>
            </div>
        </div>
    }
}
