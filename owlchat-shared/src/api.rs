//! # OWLDB client
//!
//! [`OwlClient`] wraps every REST call the chat clients make and opens the
//! post subscription. Both the CLI and the browser build use it; reqwest picks
//! the right transport per target.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_stream::stream;
use futures::stream::{AbortHandle, Abortable, abortable};
use futures_util::{Stream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::Config;
use crate::errors::{ClientError, ClientResult};
use crate::models::{
    CreatedResponse, DbDocument, LoginRequest, NewPost, PatchOp, PostDocument, PostItem,
    ReactionKind, TokenResponse,
};
use crate::paths::DbPaths;
use crate::schema::{validate_document, validate_post};
use crate::sse::{SseDecoder, StreamEvent};
use crate::validation::validate_username;

const JSON: &str = "application/json";
const EVENT_STREAM: &str = "text/event-stream";

/// Persists the bearer token between runs.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Returns the stored token, if any.
    ///
    /// # Errors
    /// Returns [`ClientError::Storage`] when the backing store fails.
    fn load(&self) -> ClientResult<Option<String>>;

    /// Stores `token`, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`ClientError::Storage`] when the backing store fails.
    fn save(&self, token: &str) -> ClientResult<()>;

    /// Forgets the stored token.
    ///
    /// # Errors
    /// Returns [`ClientError::Storage`] when the backing store fails.
    fn clear(&self) -> ClientResult<()>;
}

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        self.token
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| ClientError::storage("token lock poisoned"))
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| ClientError::storage("token lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| ClientError::storage("token lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Client for one OWLDB database.
#[derive(Clone, Debug)]
pub struct OwlClient {
    http: Client,
    paths: DbPaths,
    tokens: Arc<dyn TokenStore>,
}

impl OwlClient {
    /// Creates a client for `paths` that keeps its token in `tokens`.
    pub fn new(paths: DbPaths, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http: Client::new(),
            paths,
            tokens,
        }
    }

    /// Creates a client for the database named in `config`.
    pub fn from_config(config: &Config, tokens: Arc<dyn TokenStore>) -> Self {
        Self::new(config.paths(), tokens)
    }

    /// URL builder in use.
    pub fn paths(&self) -> &DbPaths {
        &self.paths
    }

    /// Returns `true` when a token is stored.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.tokens.load(), Ok(Some(_)))
    }

    fn token(&self) -> ClientResult<String> {
        self.tokens.load()?.ok_or(ClientError::NotAuthenticated)
    }

    fn authorized(&self, method: Method, url: &str, accept: &str) -> ClientResult<RequestBuilder> {
        let token = self.token()?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header(ACCEPT, accept))
    }

    async fn send(request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = status.canonical_reason().unwrap_or("Unknown status");
            tracing::debug!(status = status.as_u16(), text, "request rejected");
            return Err(ClientError::http(status.as_u16(), text));
        }
        Ok(response)
    }

    async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> ClientResult<Response> {
        tracing::debug!(%method, url, "owldb request");
        let mut request = self.authorized(method, url, JSON)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::send(request).await
    }

    async fn list<T, F>(&self, url: &str, validate: F) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&Value) -> ClientResult<()>,
    {
        let value: Value = self.call(Method::GET, url, None).await?.json().await?;
        let Value::Array(items) = value else {
            return Err(ClientError::decode(format!("expected a JSON array from {url}")));
        };

        items
            .into_iter()
            .map(|item| {
                validate(&item)?;
                Ok(serde_json::from_value(item)?)
            })
            .collect()
    }

    /// Lists every workspace in the database.
    ///
    /// # Errors
    /// Fails on transport, status, or validation errors.
    pub async fn get_workspaces(&self) -> ClientResult<Vec<DbDocument>> {
        self.list(&self.paths.workspaces(), validate_document).await
    }

    /// Lists the channels of `ws`.
    ///
    /// # Errors
    /// Fails on transport, status, or validation errors.
    pub async fn get_channels(&self, ws: &str) -> ClientResult<Vec<DbDocument>> {
        self.list(&self.paths.channels(ws), validate_document).await
    }

    /// Lists the posts of `ch` in `ws`.
    ///
    /// # Errors
    /// Fails on transport, status, or validation errors.
    pub async fn get_posts(&self, ws: &str, ch: &str) -> ClientResult<Vec<PostItem>> {
        let documents: Vec<PostDocument> =
            self.list(&self.paths.posts(ws, ch), validate_post).await?;
        Ok(documents.into_iter().map(PostItem::from).collect())
    }

    /// Creates the database itself.
    ///
    /// # Errors
    /// Fails on transport or status errors.
    pub async fn create_database(&self) -> ClientResult<()> {
        self.call(Method::PUT, &self.paths.database(), None).await?;
        Ok(())
    }

    /// Creates workspace `ws` and its channel collection.
    ///
    /// # Errors
    /// Fails on transport or status errors from either request.
    pub async fn create_workspace(&self, ws: &str) -> ClientResult<()> {
        self.call(Method::PUT, &self.paths.workspace(ws), Some(&json!({}))).await?;
        self.call(Method::PUT, &self.paths.channels(ws), None).await?;
        tracing::info!(workspace = ws, "workspace created");
        Ok(())
    }

    /// Creates channel `ch` in `ws` and its post collection.
    ///
    /// # Errors
    /// Fails on transport or status errors from either request.
    pub async fn create_channel(&self, ws: &str, ch: &str) -> ClientResult<()> {
        self.call(Method::PUT, &self.paths.channel(ws, ch), Some(&json!({}))).await?;
        self.call(Method::PUT, &self.paths.posts(ws, ch), None).await?;
        tracing::info!(workspace = ws, channel = ch, "channel created");
        Ok(())
    }

    /// Deletes workspace `ws`.
    ///
    /// # Errors
    /// Fails on transport or status errors.
    pub async fn delete_workspace(&self, ws: &str) -> ClientResult<()> {
        self.call(Method::DELETE, &self.paths.workspace(ws), None).await?;
        Ok(())
    }

    /// Deletes channel `ch` from `ws`.
    ///
    /// # Errors
    /// Fails on transport or status errors.
    pub async fn delete_channel(&self, ws: &str, ch: &str) -> ClientResult<()> {
        self.call(Method::DELETE, &self.paths.channel(ws, ch), None).await?;
        Ok(())
    }

    /// Creates a post in `ch`.
    ///
    /// # Errors
    /// Fails on transport or status errors.
    pub async fn create_post(
        &self,
        ws: &str,
        ch: &str,
        post: &NewPost,
    ) -> ClientResult<Option<CreatedResponse>> {
        let body = serde_json::to_value(post)?;
        let response = self.call(Method::POST, &self.paths.posts(ws, ch), Some(&body)).await?;
        let created = response.json::<CreatedResponse>().await.ok();
        if let Some(created) = &created {
            tracing::debug!(uri = %created.uri, "post created");
        }
        Ok(created)
    }

    /// Adds `user` to the `kind` reactors of the post at `post_path`.
    ///
    /// # Errors
    /// Fails on transport or status errors.
    pub async fn add_reaction(
        &self,
        post_path: &str,
        kind: ReactionKind,
        user: &str,
    ) -> ClientResult<()> {
        let body = serde_json::to_value(vec![PatchOp::add_reaction(kind, user)])?;
        self.call(Method::PATCH, &self.paths.document(post_path), Some(&body)).await?;
        Ok(())
    }

    /// Logs in as `username` and stores the returned token.
    ///
    /// # Errors
    /// Rejects a blank username before sending anything. Otherwise fails on
    /// transport, status, decode, or storage errors.
    pub async fn login(&self, username: &str) -> ClientResult<String> {
        let username = validate_username(username)?;
        tracing::debug!(username, url = self.paths.auth(), "logging in");

        let request = self
            .http
            .post(self.paths.auth())
            .header(ACCEPT, JSON)
            .json(&LoginRequest {
                username: username.to_string(),
            });
        let body: TokenResponse = Self::send(request).await?.json().await?;
        self.tokens.save(&body.token)?;
        tracing::info!(username, "logged in");
        Ok(username.to_string())
    }

    /// Ends the session. The stored token is cleared even if the request fails.
    ///
    /// # Errors
    /// Returns the request failure, or a storage error from clearing the token.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = match self.tokens.load()? {
            Some(_) => self
                .call(Method::DELETE, self.paths.auth(), None)
                .await
                .map(|_| ()),
            None => Ok(()),
        };
        self.tokens.clear()?;
        tracing::info!("logged out");
        result
    }

    /// Opens the live update stream for the posts of `ch`.
    ///
    /// The stream ends when the server closes the connection. Transport
    /// failures are yielded once and end the stream; malformed frames are
    /// yielded as errors and the stream continues.
    pub fn subscribe(
        &self,
        ws: &str,
        ch: &str,
    ) -> impl Stream<Item = ClientResult<StreamEvent>> + use<> {
        let client = self.clone();
        let url = self.paths.subscribe(ws, ch);

        stream! {
            tracing::debug!(url = %url, "opening subscription");
            let request = match client.authorized(Method::GET, &url, EVENT_STREAM) {
                Ok(request) => request,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };
            let response = match Self::send(request).await {
                Ok(response) => response,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            let mut body = response.bytes_stream();
            let mut decoder = SseDecoder::new();
            while let Some(chunk) = body.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        tracing::warn!(%err, "subscription chunk error");
                        yield Err(ClientError::from(err));
                        return;
                    }
                };
                for frame in decoder.push_bytes(&bytes) {
                    yield frame.classify();
                }
            }
            tracing::debug!(url = %url, "subscription closed by server");
        }
    }
}

/// Holds the abort handle of the active subscription.
///
/// Cloning shares the slot, so replacing from any clone stops the stream
/// opened by another.
#[derive(Clone, Debug, Default)]
pub struct Subscription {
    current: Arc<Mutex<Option<AbortHandle>>>,
}

impl Subscription {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the previous stream, if any, and makes `stream` the active one.
    pub fn replace<S: Stream>(&self, stream: S) -> Abortable<S> {
        let (stream, handle) = abortable(stream);
        if let Ok(mut guard) = self.current.lock()
            && let Some(previous) = guard.replace(handle)
        {
            tracing::debug!("aborting previous subscription");
            previous.abort();
        }
        stream
    }

    /// Aborts the active stream.
    pub fn cancel(&self) {
        if let Ok(mut guard) = self.current.lock()
            && let Some(handle) = guard.take()
        {
            handle.abort();
        }
    }

    /// Returns `true` while a stream is registered and not aborted.
    pub fn is_active(&self) -> bool {
        self.current
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|handle| !handle.is_aborted()))
            .unwrap_or(false)
    }

    /// Keeps the stream from `open` registered in this slot and feeds its
    /// items to `on_event`. A stream that ends on its own is reopened after
    /// `pause`. Returns once the slot is cancelled or taken by another stream,
    /// including while paused.
    pub async fn follow<S, O, P, F, E>(&self, mut open: O, mut pause: P, mut on_event: E)
    where
        S: Stream,
        O: FnMut() -> S,
        P: FnMut() -> F,
        F: Future<Output = ()>,
        E: FnMut(S::Item),
    {
        loop {
            let mut stream = std::pin::pin!(self.replace(open()));
            while let Some(item) = stream.next().await {
                on_event(item);
            }
            if stream.is_aborted() {
                return;
            }
            tracing::info!("subscription ended, reconnecting");
            pause().await;
            if stream.is_aborted() {
                tracing::debug!("subscription released during reconnect delay");
                return;
            }
        }
    }
}
