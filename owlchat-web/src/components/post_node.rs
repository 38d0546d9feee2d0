use chrono::Local;
use shared::models::{PostItem, ReactionKind};
use yew::{Callback, Html, Properties, classes, function_component, html};

use crate::components::markup_view::MarkupView;
use crate::components::reaction_bar::ReactionBar;

#[derive(Properties, PartialEq, Clone)]
pub struct PostNodeProps {
    pub post: PostItem,
    pub depth: usize,
    /// `true` while this post is the reply target
    #[prop_or(false)]
    pub selected: bool,
    pub on_reply: Callback<String>,
    pub on_react: Callback<(String, ReactionKind)>,
}

fn indent_style(depth: usize) -> String {
    let rem = depth as f32 * 1.5;
    format!("margin-left: {rem}rem;")
}

fn format_time(post: &PostItem) -> String {
    post.created_at().map_or_else(
        || post.creation_time.to_string(),
        |at| at.with_timezone(&Local).format("%b %e, %Y %l:%M %p").to_string(),
    )
}

#[function_component(PostNode)]
pub fn post_node(props: &PostNodeProps) -> Html {
    let post = &props.post;

    let reply_callback = {
        let on_reply = props.on_reply.clone();
        let path = post.path.clone();
        Callback::from(move |_| on_reply.emit(path.clone()))
    };

    let react_callback = {
        let on_react = props.on_react.clone();
        let path = post.path.clone();
        Callback::from(move |kind: ReactionKind| on_react.emit((path.clone(), kind)))
    };

    let bubble = classes!(
        "rounded-xl",
        "px-4",
        "py-3",
        "shadow-sm",
        "bg-base-200",
        props.selected.then_some("ring ring-primary")
    );

    html! {
        <div class="mb-3 space-y-1" style={indent_style(props.depth)}>
            <div class="flex items-center gap-2 text-xs text-base-content/70">
                <span class="font-semibold">{ post.author.clone() }</span>
                <span>{ format_time(post) }</span>
            </div>
            <div class={bubble}>
                <MarkupView text={post.contents.clone()} />
            </div>
            <div class="flex items-center gap-2">
                <button class="btn btn-ghost btn-xs" type="button" onclick={reply_callback}>
                    {"Reply"}
                </button>
                <ReactionBar counts={post.reaction_counts()} on_react={react_callback} />
            </div>
        </div>
    }
}
