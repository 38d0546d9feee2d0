//! User actions that talk to the database and update the store.
//!
//! Each action runs on the browser's task queue. Failures end up in
//! [`AppState::error`], which the error modal shows.

use chrono::{DateTime, Local, Utc};
use gloo_timers::future::sleep;
use shared::models::{DbDocument, NewPost, ReactionKind};
use shared::notices::{
    CHANNELS_FAILED, CHANNELS_REFRESH_FAILED, POST_FAILED, REACTION_FAILED, WORKSPACE_CREATE_FAILED,
    WORKSPACES_FAILED, channel_delete_failed, posts_failed,
};
use shared::validation::{
    require_channel, require_workspace, validate_channel_name, validate_post_message,
    validate_username, validate_workspace_name,
};
use shared::{ClientError, ClientResult, StreamEvent};
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;
use yewdux::Dispatch;

use crate::api::{client, subscription};
use crate::config::app_config;
use crate::models::app_state::AppState;

type Store = Dispatch<AppState>;

fn names(docs: &[DbDocument]) -> Vec<String> {
    docs.iter().map(DbDocument::name).collect()
}

/// Message for a failed action. Validation errors are shown as they are.
fn notice(context: &str, err: &ClientError) -> String {
    if err.is_validation() {
        err.user_message()
    } else {
        format!("{context}: {}", err.user_message())
    }
}

fn fail(store: &Store, message: String) {
    tracing::warn!(%message, "action failed");
    store.reduce_mut(|state| state.fail(message));
}

pub fn dismiss_error(store: &Store) {
    store.reduce_mut(|state| state.error = None);
}

pub fn login(store: Store, username: String) {
    let username = match validate_username(&username) {
        Ok(name) => name.to_string(),
        Err(err) => return fail(&store, err.user_message()),
    };
    spawn_local(async move {
        match client().login(&username).await {
            Ok(_) => {
                tracing::info!(%username, "logged in");
                store.reduce_mut(|state| state.logged_in(username));
                load_workspaces(&store).await;
            }
            Err(err) => fail(&store, format!("Login failed: {}", err.user_message())),
        }
    });
}

pub fn logout(store: Store) {
    subscription().cancel();
    store.reduce_mut(AppState::logged_out);
    spawn_local(async move {
        if let Err(err) = client().logout().await {
            tracing::warn!(%err, "logout request failed");
        }
    });
}

async fn load_workspaces(store: &Store) {
    match client().get_workspaces().await {
        Ok(docs) => store.reduce_mut(|state| state.workspaces = names(&docs)),
        Err(err) => fail(store, notice(WORKSPACES_FAILED, &err)),
    }
}

pub fn refresh_workspaces(store: Store) {
    spawn_local(async move { load_workspaces(&store).await });
}

async fn load_channels(store: &Store, failure: &str) {
    let Some(ws) = store.get().workspace.clone() else {
        return;
    };
    match client().get_channels(&ws).await {
        Ok(docs) => store.reduce_mut(|state| {
            if state.workspace.as_deref() == Some(ws.as_str()) {
                state.channels = names(&docs);
            }
        }),
        Err(err) => fail(store, notice(failure, &err)),
    }
}

pub fn select_workspace(store: Store, name: String) {
    subscription().cancel();
    store.reduce_mut(|state| state.select_workspace(name));
    spawn_local(async move { load_channels(&store, CHANNELS_FAILED).await });
}

pub fn refresh_channels(store: Store) {
    spawn_local(async move { load_channels(&store, CHANNELS_REFRESH_FAILED).await });
}

/// Validates `name` against the current list without touching the network.
pub fn check_workspace_name(store: &Store, name: &str) -> ClientResult<String> {
    let state = store.get();
    validate_workspace_name(name, &state.workspaces).map(str::to_string)
}

pub fn create_workspace(store: Store, name: String) {
    let name = match check_workspace_name(&store, &name) {
        Ok(name) => name,
        Err(err) => return fail(&store, err.user_message()),
    };
    subscription().cancel();
    store.reduce_mut(AppState::workspaces_changed);
    spawn_local(async move {
        if let Err(err) = client().create_workspace(&name).await {
            fail(&store, notice(WORKSPACE_CREATE_FAILED, &err));
        }
        load_workspaces(&store).await;
    });
}

pub fn delete_workspace(store: Store) {
    let ws = match require_workspace(store.get().workspace.as_deref()) {
        Ok(ws) => ws.to_string(),
        Err(err) => return fail(&store, err.user_message()),
    };
    subscription().cancel();
    store.reduce_mut(AppState::workspaces_changed);
    spawn_local(async move {
        if let Err(err) = client().delete_workspace(&ws).await {
            fail(&store, format!("Error deleting workspace {ws}: {}", err.user_message()));
        }
        load_workspaces(&store).await;
    });
}

pub fn create_channel(store: Store, name: String) {
    let state = store.get();
    let checked = require_workspace(state.workspace.as_deref()).and_then(|ws| {
        validate_channel_name(&name, &state.channels).map(|ch| (ws.to_string(), ch.to_string()))
    });
    let (ws, ch) = match checked {
        Ok(pair) => pair,
        Err(err) => return fail(&store, err.user_message()),
    };
    spawn_local(async move {
        if let Err(err) = client().create_channel(&ws, &ch).await {
            fail(&store, notice("Error creating channel", &err));
        }
        load_channels(&store, CHANNELS_REFRESH_FAILED).await;
    });
}

pub fn delete_channel(store: Store) {
    let state = store.get();
    let checked = require_workspace(state.workspace.as_deref()).and_then(|ws| {
        require_channel(state.channel.as_deref()).map(|ch| (ws.to_string(), ch.to_string()))
    });
    let (ws, ch) = match checked {
        Ok(pair) => pair,
        Err(err) => return fail(&store, err.user_message()),
    };
    subscription().cancel();
    store.reduce_mut(AppState::reset_channel_display);
    spawn_local(async move {
        if let Err(err) = client().delete_channel(&ws, &ch).await {
            fail(&store, notice(&channel_delete_failed(&ch), &err));
        }
        load_channels(&store, CHANNELS_REFRESH_FAILED).await;
    });
}

/// Loads the posts of `name` and follows the channel until another channel
/// is selected. A response for a channel that is no longer selected is
/// dropped.
pub fn select_channel(store: Store, name: String) {
    let Some(ws) = store.get().workspace.clone() else {
        return;
    };
    subscription().cancel();
    store.reduce_mut(|state| state.begin_channel(name.clone()));
    spawn_local(async move {
        let posts = match client().get_posts(&ws, &name).await {
            Ok(posts) => posts,
            Err(err) => return fail(&store, notice(&posts_failed(&name), &err)),
        };
        if store.reduce_mut(|state| state.load_channel(&ws, &name, posts)) {
            follow(store, ws, name).await;
        } else {
            tracing::debug!(channel = %name, "dropping posts of a deselected channel");
        }
    });
}

async fn follow(store: Store, ws: String, ch: String) {
    let retry = Duration::from_millis(app_config().subscription.retry_delay_ms);
    subscription()
        .follow(
            || client().subscribe(&ws, &ch),
            || sleep(retry),
            |event| handle_event(&store, event),
        )
        .await;
    tracing::debug!(channel = %ch, "stopped following");
}

fn handle_event(store: &Store, event: ClientResult<StreamEvent>) {
    let now = Utc::now().timestamp_millis();
    if let Some(post) = store.reduce_mut(|state| state.handle_stream_event(event, now)) {
        send(store.clone(), post);
    }
}

fn send(store: Store, post: NewPost) {
    let state = store.get();
    let (Some(ws), Some(ch)) = (state.workspace.clone(), state.channel.clone()) else {
        return fail(&store, POST_FAILED.to_string());
    };
    spawn_local(async move {
        if let Err(err) = client().create_post(&ws, &ch, &post).await {
            fail(&store, notice(POST_FAILED, &err));
        }
    });
}

/// Sends `text` now, or queues it when `send_at` is set. Returns `true` when
/// the draft was accepted.
pub fn submit_post(store: &Store, text: &str, send_at: Option<DateTime<Local>>) -> bool {
    let state = store.get();
    let checked = require_workspace(state.workspace.as_deref())
        .and_then(|_| require_channel(state.channel.as_deref()))
        .and_then(|_| validate_post_message(text));
    let text = match checked {
        Ok(text) => text.to_string(),
        Err(err) => {
            fail(store, err.user_message());
            return false;
        }
    };
    let parent = state.reply_to.clone();
    store.reduce_mut(|state| state.reply_to = None);

    match send_at {
        Some(at) => store.reduce_mut(|state| {
            state
                .queue
                .schedule(NewPost::scheduled(text, parent, at.timestamp_millis()));
        }),
        None => send(store.clone(), NewPost::new(text, parent)),
    }
    true
}

pub fn reply_to(store: &Store, path: Option<String>) {
    store.reduce_mut(|state| state.reply_to = path);
}

pub fn react(store: Store, path: String, kind: ReactionKind) {
    let Some(user) = store.get().username.clone() else {
        return fail(&store, ClientError::NotAuthenticated.user_message());
    };
    spawn_local(async move {
        if let Err(err) = client().add_reaction(&path, kind, &user).await {
            fail(&store, notice(REACTION_FAILED, &err));
        }
    });
}
