//! Failure texts shown when a database call fails.

/// Listing workspaces failed.
pub const WORKSPACES_FAILED: &str = "There was an error getting the workspaces";
/// Listing channels failed.
pub const CHANNELS_FAILED: &str = "There was an error loading the channels";
/// Refreshing channels failed.
pub const CHANNELS_REFRESH_FAILED: &str = "There was an error refreshing the channels.";
/// Creating a post failed.
pub const POST_FAILED: &str = "There was an error creating the post";
/// Adding a reaction failed.
pub const REACTION_FAILED: &str = "There was an error creating the reaction";
/// Creating a workspace failed.
pub const WORKSPACE_CREATE_FAILED: &str = "Error creating workspace";

/// Listing the posts of `channel` failed.
pub fn posts_failed(channel: &str) -> String {
    format!("There was an error getting the posts from '{channel}'")
}

/// Deleting `channel` failed.
pub fn channel_delete_failed(channel: &str) -> String {
    format!("There was an error deleting the channel '{channel}'")
}
