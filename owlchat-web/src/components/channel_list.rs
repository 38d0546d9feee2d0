use web_sys::HtmlInputElement;
use yew::{Callback, Html, TargetCast, function_component, html, use_state};
use yewdux::prelude::use_store;

use crate::models::app_state::AppState;
use crate::session;

#[function_component(ChannelList)]
pub fn channel_list() -> Html {
    let (state, dispatch) = use_store::<AppState>();
    let draft = use_state(String::new);

    if state.workspace.is_none() {
        return html! {
            <p class="text-sm text-base-content/60">{"Pick a workspace to see its channels."}</p>
        };
    }

    let on_refresh = {
        let dispatch = dispatch.clone();
        Callback::from(move |_| session::refresh_channels(dispatch.clone()))
    };

    let on_delete = {
        let dispatch = dispatch.clone();
        Callback::from(move |_| session::delete_channel(dispatch.clone()))
    };

    let on_draft = {
        let draft = draft.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let target: HtmlInputElement = event.target_unchecked_into();
            draft.set(target.value());
        })
    };

    let on_create = {
        let dispatch = dispatch.clone();
        let draft = draft.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            session::create_channel(dispatch.clone(), (*draft).clone());
            draft.set(String::new());
        })
    };

    let channels = state.channels.iter().map(|name| {
        let on_pick = {
            let dispatch = dispatch.clone();
            let name = name.clone();
            Callback::from(move |_| session::select_channel(dispatch.clone(), name.clone()))
        };
        html! {
            <li>
                <label class="label cursor-pointer justify-start gap-2">
                    <input
                        type="radio"
                        name="channel"
                        class="radio radio-primary radio-sm"
                        checked={state.channel.as_deref() == Some(name.as_str())}
                        onchange={on_pick}
                    />
                    <span class="label-text">{ format!("# {name}") }</span>
                </label>
            </li>
        }
    });

    html! {
        <div class="space-y-2">
            <div class="flex items-center justify-between">
                <h2 class="text-sm font-semibold uppercase tracking-wide">{"Channels"}</h2>
                <div class="flex gap-1">
                    <button class="btn btn-ghost btn-xs" type="button" onclick={on_refresh}>{"Refresh"}</button>
                    <button
                        class="btn btn-ghost btn-xs text-error"
                        type="button"
                        disabled={state.channel.is_none()}
                        onclick={on_delete}
                    >
                        {"Delete"}
                    </button>
                </div>
            </div>
            if state.channels.is_empty() {
                <p class="text-sm text-base-content/60">{"No channels yet."}</p>
            }
            <ul class="space-y-1">{ for channels }</ul>
            <form class="join w-full" onsubmit={on_create}>
                <input
                    class="input input-bordered input-sm join-item w-full"
                    placeholder="New channel"
                    value={(*draft).clone()}
                    oninput={on_draft}
                />
                <button class="btn btn-primary btn-sm join-item" type="submit">{"Add"}</button>
            </form>
        </div>
    }
}
