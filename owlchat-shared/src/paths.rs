//! URL construction for database resources.

use urlencoding::encode;

/// Builds resource URLs below one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPaths {
    base: String,
    auth: String,
}

impl DbPaths {
    /// `host` is the server origin, `db_path` the database path (e.g.
    /// `/v1/owlchat`) and `auth_path` the login endpoint path.
    pub fn new(host: &str, db_path: &str, auth_path: &str) -> Self {
        let host = host.trim_end_matches('/');
        let db_path = db_path.trim_end_matches('/');
        Self {
            base: format!("{host}{db_path}"),
            auth: format!("{host}{auth_path}"),
        }
    }

    /// The database itself.
    pub fn database(&self) -> String {
        self.base.clone()
    }

    /// Login and logout endpoint.
    pub fn auth(&self) -> &str {
        &self.auth
    }

    /// Collection of workspaces.
    pub fn workspaces(&self) -> String {
        format!("{}/", self.base)
    }

    /// One workspace document.
    pub fn workspace(&self, ws: &str) -> String {
        format!("{}/{}", self.base, encode(ws))
    }

    /// Channel collection of a workspace.
    pub fn channels(&self, ws: &str) -> String {
        format!("{}/channels/", self.workspace(ws))
    }

    /// One channel document.
    pub fn channel(&self, ws: &str, ch: &str) -> String {
        format!("{}/channels/{}", self.workspace(ws), encode(ch))
    }

    /// Post collection of a channel.
    pub fn posts(&self, ws: &str, ch: &str) -> String {
        format!("{}/posts/", self.channel(ws, ch))
    }

    /// Subscription endpoint for a channel's posts.
    pub fn subscribe(&self, ws: &str, ch: &str) -> String {
        format!("{}?mode=subscribe", self.posts(ws, ch))
    }

    /// A document path returned by the server, appended as is.
    pub fn document(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}
