use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ClientError, ClientResult};
use crate::models::document::DbDocument;
use crate::models::reaction::{ReactionKind, Reactions, empty_reactions, reaction_counts};

/// Free-form extension fields carried by a post.
pub type Extensions = serde_json::Map<String, Value>;

/// Extension key holding the scheduled send time in milliseconds.
pub const SCHEDULED_TIME_KEY: &str = "scheduledTime";

/// Body of a post document. This is also the payload of a create-post request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostBody {
    /// Message text, with inline markup
    pub msg: String,
    /// Path of the post this one replies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Reactor lists keyed by reaction kind
    #[serde(default)]
    pub reactions: Reactions,
    /// Extension fields such as `scheduledTime`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

/// A post as stored in the database.
pub type PostDocument = DbDocument<PostBody>;

/// A post that has not been sent yet.
pub type NewPost = PostBody;

impl PostBody {
    /// Builds a post to send now. Every reaction kind starts with no reactors.
    pub fn new(msg: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            msg: msg.into(),
            parent: parent.filter(|path| !path.is_empty()),
            reactions: empty_reactions(),
            extensions: None,
        }
    }

    /// Builds a post to be sent once `at_ms` has passed.
    pub fn scheduled(msg: impl Into<String>, parent: Option<String>, at_ms: i64) -> Self {
        let mut extensions = Extensions::new();
        extensions.insert(
            SCHEDULED_TIME_KEY.to_string(),
            Value::String(at_ms.to_string()),
        );
        Self {
            extensions: Some(extensions),
            ..Self::new(msg, parent)
        }
    }

    /// Scheduled send time in milliseconds.
    ///
    /// # Errors
    /// Returns [`ClientError::Schedule`] when the extension or the time is missing.
    pub fn scheduled_time(&self) -> ClientResult<i64> {
        scheduled_time(self.extensions.as_ref())
    }
}

/// The client's flattened view of a post document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostItem {
    /// Document path, unique per post
    pub path: String,
    /// Username that created the post
    pub author: String,
    /// Creation time in milliseconds since the Unix epoch
    pub creation_time: i64,
    /// Message text
    pub contents: String,
    /// Path of the parent post, `None` for top-level posts
    pub parent: Option<String>,
    /// Reactor lists keyed by reaction kind
    pub reactions: Reactions,
    /// Extension fields
    pub extensions: Option<Extensions>,
}

impl PostItem {
    /// Returns `true` when the post has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Creation time as a UTC timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.creation_time)
    }

    /// Scheduled send time, if the post carries one.
    pub fn scheduled_time(&self) -> Option<i64> {
        scheduled_time(self.extensions.as_ref()).ok()
    }

    /// Non-zero reaction counts in display order.
    pub fn reaction_counts(&self) -> Vec<(ReactionKind, usize)> {
        reaction_counts(&self.reactions)
    }
}

impl From<PostDocument> for PostItem {
    fn from(document: PostDocument) -> Self {
        Self {
            path: document.path,
            author: document.meta.created_by,
            creation_time: document.meta.created_at,
            contents: document.doc.msg,
            parent: document.doc.parent.filter(|path| !path.is_empty()),
            reactions: document.doc.reactions,
            extensions: document.doc.extensions,
        }
    }
}

fn scheduled_time(extensions: Option<&Extensions>) -> ClientResult<i64> {
    let extensions = extensions
        .ok_or_else(|| ClientError::schedule("Error! No extension found on post object"))?;
    let missing = || ClientError::schedule("Error! No scheduled time found on post object");
    match extensions.get(SCHEDULED_TIME_KEY).ok_or_else(missing)? {
        Value::String(raw) => raw.trim().parse::<i64>().map_err(|_| missing()),
        Value::Number(number) => number.as_i64().ok_or_else(missing),
        _ => Err(missing()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(parent: &str) -> PostDocument {
        serde_json::from_value(json!({
            "path": "/team/channels/general/posts/abc",
            "meta": {
                "createdBy": "ada",
                "createdAt": 1_000,
                "lastModifiedBy": "ada",
                "lastModifiedAt": 1_000
            },
            "doc": {
                "msg": "hello",
                "parent": parent,
                "reactions": {"smile": ["bob"], "like": []}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_post_item_projection() {
        let item = PostItem::from(document("/team/channels/general/posts/root"));
        assert_eq!(item.author, "ada");
        assert_eq!(item.creation_time, 1_000);
        assert_eq!(item.contents, "hello");
        assert_eq!(
            item.parent.as_deref(),
            Some("/team/channels/general/posts/root")
        );
        assert_eq!(item.reaction_counts(), vec![(ReactionKind::Smile, 1)]);
    }

    #[test]
    fn test_empty_parent_is_root() {
        let item = PostItem::from(document(""));
        assert!(item.is_root());
    }

    #[test]
    fn test_new_post_serializes_all_reaction_kinds() {
        let post = NewPost::new("hi", None);
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["msg"], "hi");
        assert!(value.get("parent").is_none());
        assert_eq!(value["reactions"]["celebrate"], json!([]));
        assert!(value.get("extensions").is_none());
    }

    #[test]
    fn test_scheduled_post_carries_string_time() {
        let post = NewPost::scheduled("later", Some("/p".into()), 1_700_000_000_000);
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["extensions"]["scheduledTime"], "1700000000000");
        assert_eq!(post.scheduled_time().unwrap(), 1_700_000_000_000);
    }

    #[test]
    fn test_scheduled_time_errors() {
        let post = NewPost::new("now", None);
        assert_eq!(
            post.scheduled_time().unwrap_err().to_string(),
            "Error! No extension found on post object"
        );

        let mut other = NewPost::new("now", None);
        other.extensions = Some(Extensions::new());
        assert_eq!(
            other.scheduled_time().unwrap_err().to_string(),
            "Error! No scheduled time found on post object"
        );
    }

    #[test]
    fn test_numeric_scheduled_time_is_accepted() {
        let mut post = NewPost::new("now", None);
        let mut extensions = Extensions::new();
        extensions.insert(SCHEDULED_TIME_KEY.into(), json!(42));
        post.extensions = Some(extensions);
        assert_eq!(post.scheduled_time().unwrap(), 42);
    }
}
