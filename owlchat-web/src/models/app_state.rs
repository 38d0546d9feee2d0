use shared::models::{NewPost, PostItem};
use shared::{ChannelFeed, ClientResult, FeedChange, ScheduleQueue, StreamEvent};
use yewdux::Store;

#[derive(Default, Clone, PartialEq, Store)]
pub struct AppState {
    /// Logged-in username, `None` while logged out
    pub username: Option<String>,
    pub workspaces: Vec<String>,
    pub workspace: Option<String>,
    pub channels: Vec<String>,
    pub channel: Option<String>,
    pub feed: ChannelFeed,
    /// Posts held back until their send time
    pub queue: ScheduleQueue,
    /// Parent path for the next post
    pub reply_to: Option<String>,
    /// Message shown in the error modal
    pub error: Option<String>,
}

impl AppState {
    /// Clears the feed, the selected channel, and the channel list.
    pub fn reset_channel_display(&mut self) {
        self.feed.clear();
        self.channel = None;
        self.channels.clear();
        self.reply_to = None;
    }

    pub fn logged_in(&mut self, username: String) {
        *self = Self {
            username: Some(username),
            ..Self::default()
        };
    }

    pub fn logged_out(&mut self) {
        *self = Self::default();
    }

    pub fn select_workspace(&mut self, name: String) {
        self.reset_channel_display();
        self.workspace = Some(name);
    }

    /// State after a workspace was created or deleted.
    pub fn workspaces_changed(&mut self) {
        self.reset_channel_display();
        self.workspace = None;
    }

    /// Marks `name` selected with an empty feed until its posts arrive.
    pub fn begin_channel(&mut self, name: String) {
        self.channel = Some(name);
        self.reply_to = None;
        self.feed.clear();
    }

    /// Loads `posts` if `ws`/`name` is still the selection. Returns `false`
    /// for a late response.
    pub fn load_channel(&mut self, ws: &str, name: &str, posts: Vec<PostItem>) -> bool {
        if self.workspace.as_deref() != Some(ws) || self.channel.as_deref() != Some(name) {
            return false;
        }
        self.feed.load(posts);
        true
    }

    pub fn apply_post(&mut self, post: PostItem) -> FeedChange {
        self.feed.apply(post)
    }

    /// Applies one subscription event. A keepalive releases the first due
    /// scheduled post, which the caller sends.
    pub fn handle_stream_event(
        &mut self,
        event: ClientResult<StreamEvent>,
        now_ms: i64,
    ) -> Option<NewPost> {
        match event {
            Ok(StreamEvent::Post(post)) => {
                let path = post.path.clone();
                if self.apply_post(post) == FeedChange::Queued {
                    tracing::debug!(%path, "reply waiting for its parent");
                }
                None
            }
            Ok(StreamEvent::KeepAlive) => self.take_due(now_ms),
            Ok(event @ StreamEvent::Violation(_)) => {
                if let Some(err) = event.violation() {
                    tracing::warn!(%err, "ignoring subscription event");
                }
                None
            }
            Err(err) => {
                tracing::warn!(%err, "subscription error");
                None
            }
        }
    }

    /// Removes the first due scheduled post.
    pub fn take_due(&mut self, now_ms: i64) -> Option<NewPost> {
        match self.queue.take_due(now_ms) {
            Ok(post) => post,
            Err(err) => {
                tracing::error!(%err, "scheduled post check failed");
                None
            }
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use shared::ClientError;
    use shared::models::Reactions;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn post(path: &str, parent: Option<&str>, at: i64) -> PostItem {
        PostItem {
            path: path.to_string(),
            author: "ada".to_string(),
            creation_time: at,
            contents: "hi".to_string(),
            parent: parent.map(str::to_string),
            reactions: Reactions::new(),
            extensions: None,
        }
    }

    fn browsing() -> AppState {
        let mut state = AppState::default();
        state.logged_in("ada".to_string());
        state.workspaces = vec!["team".to_string()];
        state.select_workspace("team".to_string());
        state.channels = vec!["general".to_string()];
        state.begin_channel("general".to_string());
        assert!(state.load_channel("team", "general", vec![post("/p/1", None, 1)]));
        state.reply_to = Some("/p/1".to_string());
        state
    }

    #[wasm_bindgen_test]
    fn test_selecting_workspace_resets_channel_display() {
        let mut state = browsing();
        state.select_workspace("other".to_string());
        assert_eq!(state.workspace.as_deref(), Some("other"));
        assert!(state.channel.is_none());
        assert!(state.channels.is_empty());
        assert!(state.feed.is_empty());
        assert!(state.reply_to.is_none());
    }

    #[wasm_bindgen_test]
    fn test_workspace_change_clears_current_workspace() {
        let mut state = browsing();
        state.workspaces_changed();
        assert!(state.workspace.is_none());
        assert!(state.feed.is_empty());
        assert_eq!(state.username.as_deref(), Some("ada"));
    }

    #[wasm_bindgen_test]
    fn test_logout_resets_everything() {
        let mut state = browsing();
        state.logged_out();
        assert!(state == AppState::default());
    }

    #[wasm_bindgen_test]
    fn test_reply_waits_for_parent() {
        let mut state = browsing();
        assert_eq!(state.apply_post(post("/p/3", Some("/p/2"), 3)), FeedChange::Queued);
        assert_eq!(
            state.apply_post(post("/p/2", None, 2)),
            FeedChange::Added { released: 1 }
        );
        assert_eq!(state.feed.len(), 3);
    }

    #[wasm_bindgen_test]
    fn test_begin_channel_clears_previous_feed() {
        let mut state = browsing();
        state.begin_channel("random".to_string());
        assert_eq!(state.channel.as_deref(), Some("random"));
        assert!(state.feed.is_empty());
        assert!(state.reply_to.is_none());
    }

    #[wasm_bindgen_test]
    fn test_late_posts_for_other_channel_are_dropped() {
        let mut state = browsing();
        state.begin_channel("random".to_string());
        assert!(!state.load_channel("team", "general", vec![post("/p/9", None, 9)]));
        assert_eq!(state.channel.as_deref(), Some("random"));
        assert!(state.feed.is_empty());

        assert!(state.load_channel("team", "random", vec![post("/p/2", None, 2)]));
        assert_eq!(state.feed.len(), 1);
    }

    #[wasm_bindgen_test]
    fn test_late_posts_for_other_workspace_are_dropped() {
        let mut state = browsing();
        state.select_workspace("other".to_string());
        state.begin_channel("general".to_string());
        assert!(!state.load_channel("team", "general", vec![post("/p/9", None, 9)]));
        assert!(state.feed.is_empty());
    }

    #[wasm_bindgen_test]
    fn test_stream_post_is_applied() {
        let mut state = browsing();
        let reply = post("/p/2", Some("/p/1"), 2);
        let due = state.handle_stream_event(Ok(StreamEvent::Post(reply)), 0);
        assert!(due.is_none());
        assert_eq!(state.feed.len(), 2);
    }

    #[wasm_bindgen_test]
    fn test_keepalive_releases_due_post() {
        let mut state = browsing();
        state.queue.schedule(NewPost::scheduled("later", None, 50));
        assert!(state.handle_stream_event(Ok(StreamEvent::KeepAlive), 10).is_none());

        let due = state.handle_stream_event(Ok(StreamEvent::KeepAlive), 60);
        assert_eq!(due.map(|p| p.msg), Some("later".to_string()));
        assert!(state.queue.is_empty());
    }

    #[wasm_bindgen_test]
    fn test_violation_and_errors_leave_state_unchanged() {
        let mut state = browsing();
        let before = state.clone();
        let events = [
            Ok(StreamEvent::Violation("delete".to_string())),
            Err(ClientError::transport("connection reset")),
        ];
        for event in events {
            assert!(state.handle_stream_event(event, 0).is_none());
        }
        assert!(state == before);
    }

    #[wasm_bindgen_test]
    fn test_take_due_sends_one_post_at_a_time() {
        let mut state = AppState::default();
        state.queue.schedule(NewPost::scheduled("a", None, 10));
        state.queue.schedule(NewPost::scheduled("b", None, 20));
        assert_eq!(state.take_due(100).map(|p| p.msg), Some("a".to_string()));
        assert_eq!(state.take_due(100).map(|p| p.msg), Some("b".to_string()));
        assert!(state.take_due(100).is_none());
    }

    #[wasm_bindgen_test]
    fn test_take_due_stops_at_post_without_time() {
        let mut state = AppState::default();
        state.queue.schedule(NewPost::new("no time", None));
        assert!(state.take_due(100).is_none());
        assert_eq!(state.queue.len(), 1);
    }
}
