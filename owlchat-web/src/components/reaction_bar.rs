use shared::models::ReactionKind;
use yew::{Callback, Html, Properties, function_component, html};

#[derive(Properties, PartialEq, Clone)]
pub struct ReactionBarProps {
    /// Non-zero counts in display order
    pub counts: Vec<(ReactionKind, usize)>,
    pub on_react: Callback<ReactionKind>,
}

fn icon(kind: ReactionKind) -> Html {
    html! {
        <iconify-icon icon={format!("twemoji:{}", kind.icon())} aria-label={kind.to_string()}></iconify-icon>
    }
}

#[function_component(ReactionBar)]
pub fn reaction_bar(props: &ReactionBarProps) -> Html {
    let counts = props.counts.iter().map(|&(kind, count)| {
        let on_react = props.on_react.clone();
        html! {
            <button
                class="badge badge-outline gap-1"
                type="button"
                title={kind.to_string()}
                onclick={Callback::from(move |_| on_react.emit(kind))}
            >
                { icon(kind) }
                <span>{ count }</span>
            </button>
        }
    });

    let choices = ReactionKind::all().map(|kind| {
        let on_react = props.on_react.clone();
        html! {
            <li>
                <button type="button" onclick={Callback::from(move |_| on_react.emit(kind))}>
                    { icon(kind) }
                    <span>{ kind.label() }</span>
                </button>
            </li>
        }
    });

    html! {
        <div class="flex flex-wrap items-center gap-1 text-xs">
            { for counts }
            <div class="dropdown dropdown-hover">
                <button class="btn btn-ghost btn-xs" type="button" tabindex="0">{"React"}</button>
                <ul tabindex="0" class="dropdown-content menu menu-horizontal z-10 rounded-box bg-base-100 p-1 shadow">
                    { for choices }
                </ul>
            </div>
        </div>
    }
}
