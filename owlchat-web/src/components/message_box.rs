use chrono::{DateTime, Local};
use shared::markup::{BOLD_SNIPPET, ITALIC_SNIPPET, LINK_SNIPPET, emoji_snippet};
use shared::models::ReactionKind;
use web_sys::HtmlTextAreaElement;
use yew::{Callback, Html, TargetCast, classes, function_component, html, use_state};
use yewdux::prelude::use_store;

use crate::components::schedule_picker::SchedulePicker;
use crate::models::app_state::AppState;
use crate::session;

fn send_label(send_at: Option<&DateTime<Local>>) -> String {
    send_at.map_or_else(
        || "Send: Now".to_string(),
        |at| format!("Send: {}", at.format("%Y-%m-%d %H:%M")),
    )
}

/// Composer for the selected channel.
#[function_component(MessageBox)]
pub fn message_box() -> Html {
    let (state, dispatch) = use_store::<AppState>();
    let draft = use_state(String::new);
    let send_at = use_state(|| None::<DateTime<Local>>);
    let picking = use_state(|| false);

    let append = |snippet: String| {
        let draft = draft.clone();
        Callback::from(move |_: yew::events::MouseEvent| {
            draft.set(format!("{}{snippet}", *draft));
        })
    };

    let on_change = {
        let draft = draft.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let target: HtmlTextAreaElement = event.target_unchecked_into();
            draft.set(target.value());
        })
    };

    let submit = {
        let dispatch = dispatch.clone();
        let draft = draft.clone();
        let send_at = send_at.clone();
        Callback::from(move |()| {
            if session::submit_post(&dispatch, &draft, *send_at) {
                draft.set(String::new());
                send_at.set(None);
            }
        })
    };

    let on_keydown = {
        let submit = submit.clone();
        Callback::from(move |event: yew::events::KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                submit.emit(());
            }
        })
    };

    let on_submit = Callback::from(move |event: yew::events::SubmitEvent| {
        event.prevent_default();
        submit.emit(());
    });

    let on_pick = {
        let send_at = send_at.clone();
        let picking = picking.clone();
        Callback::from(move |at: Option<DateTime<Local>>| {
            send_at.set(at);
            picking.set(false);
        })
    };

    let open_picker = {
        let picking = picking.clone();
        Callback::from(move |_| picking.set(true))
    };

    let close_picker = {
        let picking = picking.clone();
        Callback::from(move |()| picking.set(false))
    };

    let cancel_reply = {
        let dispatch = dispatch.clone();
        Callback::from(move |_| session::reply_to(&dispatch, None))
    };

    if state.channel.is_none() {
        return html! {};
    }

    let emoji_buttons = ReactionKind::all().map(|kind| {
        html! {
            <button class="btn btn-ghost btn-xs" type="button" title={kind.to_string()} onclick={append(emoji_snippet(kind))}>
                <iconify-icon icon={format!("twemoji:{}", kind.icon())} aria-label={kind.to_string()}></iconify-icon>
            </button>
        }
    });

    html! {
        <>
        <form class="space-y-2 border-t border-base-300 p-4" onsubmit={on_submit}>
            if let Some(parent) = state.reply_to.clone() {
                <div class="alert py-1 text-sm">
                    <span>{ format!("Replying to {parent}") }</span>
                    <button class="btn btn-ghost btn-xs" type="button" onclick={cancel_reply}>{"Cancel"}</button>
                </div>
            }
            <div class="flex flex-wrap items-center gap-1">
                <button class="btn btn-ghost btn-xs font-bold" type="button" onclick={append(BOLD_SNIPPET.to_string())}>{"B"}</button>
                <button class="btn btn-ghost btn-xs italic" type="button" onclick={append(ITALIC_SNIPPET.to_string())}>{"I"}</button>
                <button class="btn btn-ghost btn-xs underline" type="button" onclick={append(LINK_SNIPPET.to_string())}>{"Link"}</button>
                { for emoji_buttons }
            </div>
            <textarea
                class={classes!("textarea", "textarea-bordered", "w-full", "min-h-[5rem]")}
                placeholder="Write a message"
                value={(*draft).clone()}
                oninput={on_change}
                onkeydown={on_keydown}
            />
            <div class="flex items-center justify-between">
                <button class="btn btn-ghost btn-sm" type="button" onclick={open_picker}>
                    { send_label((*send_at).as_ref()) }
                </button>
                <button class="btn btn-primary btn-sm" type="submit" disabled={draft.trim().is_empty()}>
                    {"Send"}
                </button>
            </div>
        </form>
        if *picking {
            <SchedulePicker on_pick={on_pick} on_close={close_picker} />
        }
        </>
    }
}
