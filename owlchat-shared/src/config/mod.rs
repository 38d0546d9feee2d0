//! # Configuration
//!
//! Client configuration shared by the CLI and the web front end. File and
//! environment loading is only available on native targets.

pub mod client;

pub use client::{Config, DatabaseConfig, LogFormat, LoggingConfig, SubscriptionConfig};
