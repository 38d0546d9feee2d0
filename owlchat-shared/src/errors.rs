//! # Client Error Types
//!
//! Error types shared by every OwlChat surface. Validation variants carry the
//! exact text shown to the user.

use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to OWLDB or validating user input
#[derive(Error, Debug)]
pub enum ClientError {
    /// The database answered with a non-success status
    #[error("{status} {text}")]
    Http { status: u16, text: String },

    /// The request never produced a response
    #[error("Network error: {message}")]
    Transport { message: String },

    /// A response body could not be decoded
    #[error("Unable to decode response: {message}")]
    Decode { message: String },

    /// A document failed JSON schema validation
    #[error("Error with JSON validation: {message}")]
    Schema { message: String },

    /// User input was rejected before any request was made
    #[error("{message}")]
    Validation { message: String },

    /// A scheduled post could not be evaluated
    #[error("{message}")]
    Schedule { message: String },

    /// The subscription stream sent something the client does not accept
    #[error("Protocol violation: {message}")]
    Protocol { message: String },

    /// The bearer token could not be read or written
    #[error("Token storage error: {message}")]
    Storage { message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {field} - {message}")]
    Config { field: String, message: String },

    /// No bearer token is stored
    #[error("Not logged in. Log in before using the database.")]
    NotAuthenticated,
}

impl ClientError {
    /// Create an HTTP status error
    pub fn http<T: Into<String>>(status: u16, text: T) -> Self {
        Self::Http {
            status,
            text: text.into(),
        }
    }

    /// Create a transport error
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode<T: Into<String>>(message: T) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a schema validation error
    pub fn schema<T: Into<String>>(message: T) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a user-facing validation error
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a schedule error
    pub fn schedule<T: Into<String>>(message: T) -> Self {
        Self::Schedule {
            message: message.into(),
        }
    }

    /// Create a protocol violation error
    pub fn protocol<T: Into<String>>(message: T) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a token storage error
    pub fn storage<T: Into<String>>(message: T) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<T: Into<String>, U: Into<String>>(field: T, message: U) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by user input rather than the network.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Text suitable for an error dialog or terminal message.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown status"),
            );
        }
        if error.is_decode() {
            return Self::decode(error.to_string());
        }
        Self::transport(error.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}
