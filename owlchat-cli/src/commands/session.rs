use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use directories::BaseDirs;
use shared::{ClientError, ClientResult, OwlClient, TokenStore};

#[derive(Args, Debug)]
#[command(about = "Log in to the database")]
pub struct LoginArgs {
    /// Name to log in as
    pub username: String,
}

/// Bearer token kept in a file readable only by the current user.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ClientError::storage(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        ensure_parent(&self.path)?;
        fs::write(&self.path, token.as_bytes()).map_err(|err| {
            ClientError::storage(format!("failed to write {}: {err}", self.path.display()))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|err| {
                ClientError::storage(format!("failed to set token file permissions: {err}"))
            })?;
        }
        tracing::debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ClientError::storage(format!(
                "failed to remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}

pub fn token_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("owlchat").join("token"))
        .unwrap_or_else(|| PathBuf::from("./owlchat.token"))
}

fn ensure_parent(path: &Path) -> ClientResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            ClientError::storage(format!(
                "failed to create token directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

pub async fn login(client: &OwlClient, args: LoginArgs) -> Result<()> {
    let username = client.login(&args.username).await.context("login failed")?;
    println!("Logged in as {}", username.bold());
    Ok(())
}

pub async fn logout(client: &OwlClient) -> Result<()> {
    if !client.is_logged_in() {
        println!("No active session.");
        return Ok(());
    }
    if let Err(err) = client.logout().await {
        eprintln!("warning: logout request failed: {err}");
    }
    println!("Logged out.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_token_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.load().unwrap(), None);
        store.save("secret").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("secret"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_blank_token_file_is_logged_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "\n").unwrap();
        assert_eq!(FileTokenStore::new(path).load().unwrap(), None);
    }
}
