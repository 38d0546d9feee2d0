use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::errors::{ClientError, ClientResult};
use crate::paths::DbPaths;

#[cfg(not(target_arch = "wasm32"))]
use std::{env, fs, path::PathBuf};

/// Default database host.
pub const DEFAULT_HOST: &str = "http://localhost:3318";
/// Default database path below the host.
pub const DEFAULT_DB_PATH: &str = "/v1/owlchat";
/// Default authentication endpoint path.
pub const DEFAULT_AUTH_PATH: &str = "/auth";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Where the database lives.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Server origin, e.g. `http://localhost:3318`
    pub host: String,
    /// Database path below the host
    pub path: String,
    /// Login endpoint path below the host
    pub auth_path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            path: DEFAULT_DB_PATH.to_string(),
            auth_path: DEFAULT_AUTH_PATH.to_string(),
        }
    }
}

/// Logging settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset
    pub level: String,
    /// Line format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Live update settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Delay before reconnecting a dropped subscription
    pub retry_delay_ms: u64,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: 1000,
        }
    }
}

/// The main configuration structure for OwlChat clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    /// Database location
    pub database: DatabaseConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Subscription settings
    pub subscription: SubscriptionConfig,
}

impl Config {
    /// Generates a default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// URL builder for the configured database.
    pub fn paths(&self) -> DbPaths {
        DbPaths::new(
            &self.database.host,
            &self.database.path,
            &self.database.auth_path,
        )
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a `yaml` or `json` configuration file.
    /// * `host_override` - Optional database host that wins over every other source.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] when the file cannot be read or parsed,
    /// or when the resolved configuration is invalid.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(
        config_path: Option<PathBuf>,
        host_override: Option<String>,
    ) -> ClientResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::with_defaults(),
        };

        // Environment variables only fill values the file left at their default
        let defaults = Self::with_defaults();
        if config.database.host == defaults.database.host
            && let Ok(host) = env::var("OWLCHAT_DATABASE_HOST")
        {
            config.database.host = host;
        }
        if config.database.path == defaults.database.path
            && let Ok(path) = env::var("OWLCHAT_DATABASE_PATH")
        {
            config.database.path = path;
        }
        if config.database.auth_path == defaults.database.auth_path
            && let Ok(auth_path) = env::var("OWLCHAT_AUTH_PATH")
        {
            config.database.auth_path = auth_path;
        }
        if config.logging.level == defaults.logging.level
            && let Ok(level) = env::var("OWLCHAT_LOG_LEVEL")
        {
            config.logging.level = level.to_ascii_lowercase();
        }
        if config.logging.format == defaults.logging.format
            && let Ok(format) = env::var("OWLCHAT_LOG_FORMAT")
        {
            config.logging.format = format.parse().map_err(|_| {
                ClientError::config("OWLCHAT_LOG_FORMAT", "must be 'text' or 'json'")
            })?;
        }

        if let Some(host) = host_override {
            config.database.host = host;
        }

        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_file(path: &std::path::Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| ClientError::config(path.display().to_string(), err.to_string()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => serde_yml::from_str(&content)
                .map_err(|err| ClientError::config(path.display().to_string(), err.to_string())),
            Some("json") => serde_json::from_str(&content)
                .map_err(|err| ClientError::config(path.display().to_string(), err.to_string())),
            _ => Err(ClientError::config(
                path.display().to_string(),
                "Unsupported configuration format. Use 'yaml' or 'json'.",
            )),
        }
    }

    /// Serializes the configuration as YAML.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if serialization fails.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn to_yaml(&self) -> ClientResult<String> {
        serde_yml::to_string(self).map_err(|err| ClientError::config("yaml", err.to_string()))
    }

    /// Serializes the configuration as pretty JSON.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if serialization fails.
    pub fn to_json(&self) -> ClientResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| ClientError::config("json", err.to_string()))
    }

    /// Checks the resolved values.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] naming the first invalid field.
    pub fn validate(&self) -> ClientResult<()> {
        let host = url::Url::parse(&self.database.host)
            .map_err(|err| ClientError::config("database.host", err.to_string()))?;
        if !matches!(host.scheme(), "http" | "https") {
            return Err(ClientError::config(
                "database.host",
                "must be an http or https URL",
            ));
        }
        if !self.database.path.starts_with('/') {
            return Err(ClientError::config("database.path", "must start with '/'"));
        }
        if !self.database.auth_path.starts_with('/') {
            return Err(ClientError::config(
                "database.auth_path",
                "must start with '/'",
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ClientError::config(
                "logging.level",
                format!("must be one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        if self.subscription.retry_delay_ms == 0 {
            return Err(ClientError::config(
                "subscription.retry_delay_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}
