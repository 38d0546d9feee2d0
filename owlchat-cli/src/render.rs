//! Terminal rendering for feeds and listings.

use std::fmt::Write as _;

use chrono::Local;
use colored::Colorize;
use shared::feed::{ChannelFeed, FeedEntry};
use shared::markup::{Inline, is_safe_url, parse};
use shared::models::{DbDocument, PostItem};

/// Formats post text for a terminal. Continuation lines start with `indent`.
pub fn markup(msg: &str, indent: &str) -> String {
    let mut out = String::new();
    for inline in parse(msg) {
        match inline {
            Inline::Text(text) => out.push_str(&text),
            Inline::Bold(text) => {
                let _ = write!(out, "{}", text.bold());
            }
            Inline::Italic(text) => {
                let _ = write!(out, "{}", text.italic());
            }
            Inline::Link { text, url } if is_safe_url(&url) => {
                let _ = write!(out, "{} <{}>", text.underline(), url);
            }
            Inline::Link { text, url } => {
                let _ = write!(out, "[{text}]({url})");
            }
            Inline::Emoji(kind) => out.push_str(kind.glyph()),
            Inline::LineBreak => {
                out.push('\n');
                out.push_str(indent);
            }
        }
    }
    out
}

/// Header, body, and reaction counts of one post.
pub fn post(post: &PostItem, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let when = post.created_at().map_or_else(
        || post.creation_time.to_string(),
        |at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    );

    let mut out = format!(
        "{indent}{} @ {}  {}\n{indent}  {}",
        post.author.bold(),
        when,
        post.path.dimmed(),
        markup(&post.contents, &format!("{indent}  "))
    );

    let counts = post.reaction_counts();
    if !counts.is_empty() {
        let line = counts
            .iter()
            .map(|(kind, count)| format!("{} {count}", kind.label()))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = write!(out, "\n{indent}  {}", line.cyan());
    }
    out
}

/// The whole threaded feed.
pub fn feed(feed: &ChannelFeed) -> String {
    if feed.is_empty() {
        return "No posts yet.".to_string();
    }
    feed.entries()
        .iter()
        .map(|FeedEntry { depth, post: item }| post(item, *depth))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One name per line, or `empty` when there are none.
pub fn names(documents: &[DbDocument], empty: &str) -> String {
    if documents.is_empty() {
        return empty.to_string();
    }
    documents
        .iter()
        .map(|doc| format!("- {}", doc.name()))
        .collect::<Vec<_>>()
        .join("\n")
}
