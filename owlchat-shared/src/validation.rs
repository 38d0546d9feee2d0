//! Checks applied to user input before anything is sent to the database.
//!
//! Every failure is a [`ClientError::Validation`] whose text is shown to the
//! user as is.

use crate::errors::{ClientError, ClientResult};

/// Rejects a blank username.
///
/// # Errors
/// Returns a validation error when `username` is empty after trimming.
pub fn validate_username(username: &str) -> ClientResult<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation(
            "Please enter a non-empty username.",
        ));
    }
    Ok(trimmed)
}

/// Rejects a blank workspace name or one already in `existing`.
///
/// # Errors
/// Returns a validation error describing the problem.
pub fn validate_workspace_name<'a, I, S>(name: &'a str, existing: I) -> ClientResult<&'a str>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation("Try again with a non-empty name."));
    }
    if existing.into_iter().any(|other| other.as_ref() == trimmed) {
        return Err(ClientError::validation(format!(
            "Error: Workspace \"{trimmed}\" already exists."
        )));
    }
    Ok(trimmed)
}

/// Rejects a blank channel name or one already in `existing`.
///
/// # Errors
/// Returns a validation error describing the problem.
pub fn validate_channel_name<'a, I, S>(name: &'a str, existing: I) -> ClientResult<&'a str>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation(
            "Attempted to make a channel with no name. Try again with a non-empty name.",
        ));
    }
    if existing.into_iter().any(|other| other.as_ref() == trimmed) {
        return Err(ClientError::validation(format!(
            "Another channel already has the name '{trimmed}', please choose another name. "
        )));
    }
    Ok(trimmed)
}

/// Requires a selected workspace.
///
/// # Errors
/// Returns a validation error when nothing is selected.
pub fn require_workspace(current: Option<&str>) -> ClientResult<&str> {
    current
        .filter(|ws| !ws.is_empty())
        .ok_or_else(|| ClientError::validation("Please select a workspace. No workspace is selected"))
}

/// Requires a selected channel.
///
/// # Errors
/// Returns a validation error when nothing is selected.
pub fn require_channel(current: Option<&str>) -> ClientResult<&str> {
    current
        .filter(|ch| !ch.is_empty())
        .ok_or_else(|| ClientError::validation("No channel selected. Please select a channel."))
}

/// Rejects an empty post.
///
/// # Errors
/// Returns a validation error when `msg` has no visible text.
pub fn validate_post_message(msg: &str) -> ClientResult<&str> {
    if msg.trim().is_empty() {
        return Err(ClientError::validation(
            "You cannot have a post with no input. Try again with a non-empty name.",
        ));
    }
    Ok(msg)
}
