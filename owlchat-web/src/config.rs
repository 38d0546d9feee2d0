//! Browser configuration
//!
//! The web client cannot read files or the process environment at runtime, so
//! the database location is baked in at build time from the same variables the
//! CLI reads.

use shared::config::Config;

/// Builds the client configuration from compile-time environment variables.
pub fn app_config() -> Config {
    let mut config = Config::with_defaults();
    if let Some(host) = option_env!("OWLCHAT_DATABASE_HOST") {
        config.database.host = host.to_string();
    }
    if let Some(path) = option_env!("OWLCHAT_DATABASE_PATH") {
        config.database.path = path.to_string();
    }
    if let Some(auth_path) = option_env!("OWLCHAT_AUTH_PATH") {
        config.database.auth_path = auth_path.to_string();
    }
    if let Some(level) = option_env!("OWLCHAT_LOG_LEVEL") {
        config.logging.level = level.to_string();
    }
    config
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_app_config_is_valid() {
        let config = app_config();
        assert!(config.validate().is_ok());
        assert!(config.database.host.starts_with("http"));
    }

    #[wasm_bindgen_test]
    fn test_app_config_builds_database_urls() {
        let config = app_config();
        let paths = config.paths();
        assert!(paths.workspaces().ends_with('/'));
        assert!(paths.auth().ends_with(&config.database.auth_path));
    }
}
