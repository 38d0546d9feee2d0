use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Reactor usernames keyed by reaction kind, as stored in a post body.
pub type Reactions = BTreeMap<String, Vec<String>>;

/// The reactions a post can receive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReactionKind {
    /// Grinning face
    Smile,
    /// Frowning face
    Frown,
    /// Thumbs up
    Like,
    /// Party popper face
    Celebrate,
}

impl ReactionKind {
    /// Twemoji icon name used when rendering the reaction.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Smile => "grinning-face-with-big-eyes",
            Self::Frown => "frowning-face",
            Self::Like => "thumbs-up",
            Self::Celebrate => "partying-face",
        }
    }

    /// Short label used in reaction menus.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Smile => ":)",
            Self::Frown => ":(",
            Self::Like => "\u{1F44D}",
            Self::Celebrate => "\u{1F389}",
        }
    }

    /// Plain glyph used by terminal output.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Smile => "\u{1F603}",
            Self::Frown => "\u{2639}",
            Self::Like => "\u{1F44D}",
            Self::Celebrate => "\u{1F973}",
        }
    }

    /// All kinds in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// A reactions map with every known kind present and no reactors.
pub fn empty_reactions() -> Reactions {
    ReactionKind::all()
        .map(|kind| (kind.to_string(), Vec::new()))
        .collect()
}

/// Non-zero reaction counts in display order. Unknown kinds are skipped.
pub fn reaction_counts(reactions: &Reactions) -> Vec<(ReactionKind, usize)> {
    ReactionKind::all()
        .filter_map(|kind| {
            let count = reactions.get(kind.as_ref()).map_or(0, Vec::len);
            (count > 0).then_some((kind, count))
        })
        .collect()
}
