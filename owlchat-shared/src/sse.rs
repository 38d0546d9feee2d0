//! Server-sent event framing for the post subscription.

use serde_json::Value;

use crate::errors::{ClientError, ClientResult};
use crate::models::{PostDocument, PostItem};
use crate::schema::validate_post;

/// Event name the database uses for removed documents.
pub const DELETE_EVENT: &str = "delete";

/// One dispatched SSE frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    /// Value of the `event:` field
    pub event: Option<String>,
    /// `data:` lines joined with newlines
    pub data: String,
    /// Value of the `id:` field
    pub id: Option<String>,
}

/// What a frame means to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A post was created or changed
    Post(PostItem),
    /// The stream is alive and nothing changed
    KeepAlive,
    /// The server sent an event the client does not accept
    Violation(String),
}

impl StreamEvent {
    /// The error to report for a [`StreamEvent::Violation`].
    pub fn violation(&self) -> Option<ClientError> {
        match self {
            Self::Violation(name) => {
                Some(ClientError::protocol(format!("unexpected '{name}' event")))
            }
            _ => None,
        }
    }
}

impl SseFrame {
    /// Classifies the frame.
    ///
    /// # Errors
    /// Returns [`ClientError::Decode`] or [`ClientError::Schema`] when a post
    /// payload is malformed.
    pub fn classify(&self) -> ClientResult<StreamEvent> {
        let event = self.event.as_deref().unwrap_or("").trim();
        if event == DELETE_EVENT {
            return Ok(StreamEvent::Violation(event.to_string()));
        }
        if event.is_empty() || self.data.trim().is_empty() {
            return Ok(StreamEvent::KeepAlive);
        }

        let value: Value = serde_json::from_str(&self.data)?;
        validate_post(&value)?;
        let document: PostDocument = serde_json::from_value(value)?;
        Ok(StreamEvent::Post(document.into()))
    }
}

/// Incremental decoder for an SSE body delivered in arbitrary chunks.
#[derive(Debug, Default)]
pub struct SseDecoder {
    partial: Vec<u8>,
    buffer: String,
    current: SseFrame,
    has_data: bool,
    seen: bool,
}

impl SseDecoder {
    /// Creates a decoder with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw body bytes. A multi-byte character split across chunks is
    /// held back until the rest of it arrives.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.partial.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.partial) {
            Ok(text) => text.len(),
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(_) => {
                let text = String::from_utf8_lossy(&self.partial).into_owned();
                self.partial.clear();
                return self.push(&text);
            }
        };
        let rest = self.partial.split_off(valid);
        let head = std::mem::replace(&mut self.partial, rest);
        let text = String::from_utf8_lossy(&head).into_owned();
        self.push(&text)
    }

    /// Feeds a chunk and returns every frame completed by it.
    pub fn push(&mut self, chunk: &str) -> Vec<SseFrame> {
        self.buffer.push_str(chunk);
        let mut frames = Vec::new();

        while let Some(end) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=end).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                if self.seen {
                    frames.push(std::mem::take(&mut self.current));
                    self.has_data = false;
                    self.seen = false;
                }
                continue;
            }
            self.seen = true;
            self.field(line);
        }
        frames
    }

    fn field(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }
        let Some((name, value)) = line.split_once(':') else {
            tracing::trace!(line, "ignoring non-field line");
            return;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        match name {
            "event" => self.current.event = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.current.data.push('\n');
                }
                self.current.data.push_str(value);
                self.has_data = true;
            }
            "id" => self.current.id = Some(value.to_string()),
            _ => tracing::trace!(field = name, "ignoring unknown field"),
        }
    }
}
