use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bookkeeping the database attaches to every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Username of the creator
    pub created_by: String,
    /// Creation time in milliseconds since the Unix epoch
    pub created_at: i64,
    /// Username of the last writer
    #[serde(default)]
    pub last_modified_by: String,
    /// Last modification time in milliseconds since the Unix epoch
    #[serde(default)]
    pub last_modified_at: i64,
}

/// A document as returned by the database, with a typed body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbDocument<T = Value> {
    /// Absolute document path below the database, e.g. `/ws/channels/general`
    pub path: String,
    /// Creation and modification metadata
    pub meta: Meta,
    /// Document body
    pub doc: T,
}

impl<T> DbDocument<T> {
    /// Display name of the document, the decoded last path segment.
    pub fn name(&self) -> String {
        doc_name(&self.path)
    }
}

/// Returns the decoded last `/` segment of a document path.
pub fn doc_name(path: &str) -> String {
    let segment = path.rsplit('/').next().unwrap_or(path);
    urlencoding::decode(segment).map_or_else(|_| segment.to_string(), |name| name.into_owned())
}
