#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)] // TODO(deps-001): remove once transitive dependencies converge.

pub mod api;
pub mod config;
pub mod errors;
pub mod feed;
pub mod markup;
pub mod models;
pub mod notices;
pub mod paths;
pub mod scheduler;
pub mod schema;
pub mod sse;
pub mod validation;

pub use api::{MemoryTokenStore, OwlClient, Subscription, TokenStore};
pub use errors::{ClientError, ClientResult};
pub use feed::{ChannelFeed, FeedChange, FeedEntry};
pub use scheduler::ScheduleQueue;
pub use sse::StreamEvent;
