//! Inline markup for post text.
//!
//! Supported forms: `**bold**`, `*italic*`, `[text](url)`, `:emoji:` for the
//! reaction names, and a literal `\n` for a line break.

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::models::ReactionKind;

/// Appended by the composer's bold button.
pub const BOLD_SNIPPET: &str = " **Type bolded message here**";
/// Appended by the composer's italics button.
pub const ITALIC_SNIPPET: &str = " *Type italics message here*";
/// Appended by the composer's link button.
pub const LINK_SNIPPET: &str = " [Message to be shown goes here](Link goes here)";

static INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^*]+)\*\*|\*([^*]+)\*|\[([^\]]+)\]\(([^)]+)\)|:([A-Za-z_]+):|\\n")
        .unwrap_or_else(|_| unreachable!("inline markup pattern is a valid literal"))
});

/// One formatted run of post text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text
    Text(String),
    /// Strong emphasis
    Bold(String),
    /// Emphasis
    Italic(String),
    /// Hyperlink
    Link {
        /// Visible text
        text: String,
        /// Target
        url: String,
    },
    /// Emoji named after a reaction kind
    Emoji(ReactionKind),
    /// Hard line break
    LineBreak,
}

/// Text the composer appends for an emoji button.
pub fn emoji_snippet(kind: ReactionKind) -> String {
    format!(" :{kind}:")
}

/// Splits `msg` into formatted runs.
pub fn parse(msg: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(msg) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut out, &msg[last..whole.start()]);
        last = whole.end();

        if let Some(bold) = caps.get(1) {
            out.push(Inline::Bold(bold.as_str().to_string()));
        } else if let Some(italic) = caps.get(2) {
            out.push(Inline::Italic(italic.as_str().to_string()));
        } else if let (Some(text), Some(url)) = (caps.get(3), caps.get(4)) {
            out.push(Inline::Link {
                text: text.as_str().to_string(),
                url: url.as_str().trim().to_string(),
            });
        } else if let Some(name) = caps.get(5) {
            match ReactionKind::from_str(name.as_str()) {
                Ok(kind) => out.push(Inline::Emoji(kind)),
                Err(_) => push_text(&mut out, whole.as_str()),
            }
        } else {
            out.push(Inline::LineBreak);
        }
    }

    push_text(&mut out, &msg[last..]);
    out
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(previous)) = out.last_mut() {
        previous.push_str(text);
    } else {
        out.push(Inline::Text(text.to_string()));
    }
}

/// Returns `true` for link targets that are safe to put in an `href`.
pub fn is_safe_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:")
}

/// Renders `msg` as escaped HTML.
pub fn to_html(msg: &str) -> String {
    let mut html = String::with_capacity(msg.len());
    for inline in parse(msg) {
        match inline {
            Inline::Text(text) => html.push_str(&escape(&text)),
            Inline::Bold(text) => {
                html.push_str(&format!("<strong>{}</strong>", escape(&text)));
            }
            Inline::Italic(text) => {
                html.push_str(&format!("<em>{}</em>", escape(&text)));
            }
            Inline::Link { text, url } if is_safe_url(&url) => {
                html.push_str(&format!("<a href=\"{}\">{}</a>", escape(&url), escape(&text)));
            }
            Inline::Link { text, url } => {
                html.push_str(&escape(&format!("[{text}]({url})")));
            }
            Inline::Emoji(kind) => {
                html.push_str(&format!(
                    "<iconify-icon icon=\"twemoji:{}\" aria-label=\"{kind}\"></iconify-icon>",
                    kind.icon()
                ));
            }
            Inline::LineBreak => html.push_str("<br>"),
        }
    }
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
