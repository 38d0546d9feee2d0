use shared::models::ReactionKind;
use yew::{Callback, Html, function_component, html};
use yewdux::prelude::use_store;

use crate::components::post_node::PostNode;
use crate::models::app_state::AppState;
use crate::session;

/// Threaded posts of the selected channel, oldest first.
#[function_component(ChannelFeedView)]
pub fn channel_feed_view() -> Html {
    let (state, dispatch) = use_store::<AppState>();

    let on_reply = {
        let dispatch = dispatch.clone();
        Callback::from(move |path: String| session::reply_to(&dispatch, Some(path)))
    };
    let on_react = {
        let dispatch = dispatch.clone();
        Callback::from(move |(path, kind): (String, ReactionKind)| {
            session::react(dispatch.clone(), path, kind);
        })
    };

    let Some(channel) = state.channel.clone() else {
        return html! {
            <div class="flex flex-1 items-center justify-center text-base-content/60">
                {"Select a channel to start reading."}
            </div>
        };
    };

    let entries = state.feed.entries();
    html! {
        <section class="flex-1 overflow-y-auto p-4">
            <h2 class="mb-4 text-lg font-semibold">{ format!("# {channel}") }</h2>
            if entries.is_empty() {
                <p class="text-base-content/60">{"No posts yet."}</p>
            }
            { for entries.into_iter().map(|entry| html! {
                <PostNode
                    key={entry.post.path.clone()}
                    post={entry.post.clone()}
                    depth={entry.depth}
                    selected={state.reply_to.as_deref() == Some(entry.post.path.as_str())}
                    on_reply={on_reply.clone()}
                    on_react={on_react.clone()}
                />
            }) }
        </section>
    }
}
