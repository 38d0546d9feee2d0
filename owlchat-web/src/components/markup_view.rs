use shared::markup::{Inline, is_safe_url, parse};
use yew::{AttrValue, Html, Properties, function_component, html};

#[derive(Properties, PartialEq, Clone)]
pub struct MarkupViewProps {
    pub text: AttrValue,
}

fn render_inline(inline: Inline) -> Html {
    match inline {
        Inline::Text(text) => html! { { text } },
        Inline::Bold(text) => html! { <strong>{ text }</strong> },
        Inline::Italic(text) => html! { <em>{ text }</em> },
        Inline::Link { text, url } if is_safe_url(&url) => html! {
            <a class="link link-primary" href={url} target="_blank" rel="noopener noreferrer">{ text }</a>
        },
        Inline::Link { text, url } => html! { { format!("[{text}]({url})") } },
        Inline::Emoji(kind) => html! {
            <iconify-icon icon={format!("twemoji:{}", kind.icon())} aria-label={kind.to_string()}></iconify-icon>
        },
        Inline::LineBreak => html! { <br /> },
    }
}

/// Post text with inline formatting, links, and emoji.
#[function_component(MarkupView)]
pub fn markup_view(props: &MarkupViewProps) -> Html {
    html! {
        <span class="whitespace-pre-wrap break-words">
            { for parse(&props.text).into_iter().map(render_inline) }
        </span>
    }
}
