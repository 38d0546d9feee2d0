use std::cell::OnceCell;
use std::sync::Arc;

use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use shared::{ClientError, ClientResult, OwlClient, Subscription, TokenStore};

use crate::config::app_config;

/// Local storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

thread_local! {
    static SHARED_CLIENT: OnceCell<OwlClient> = const { OnceCell::new() };
    static SUBSCRIPTION: Subscription = Subscription::new();
}

/// Keeps the bearer token in the browser's local storage so a reload stays
/// logged in.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTokenStore;

impl TokenStore for LocalTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        match LocalStorage::get::<String>(TOKEN_KEY) {
            Ok(token) => Ok(Some(token)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(ClientError::storage(err.to_string())),
        }
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        LocalStorage::set(TOKEN_KEY, token).map_err(|err| ClientError::storage(err.to_string()))
    }

    fn clear(&self) -> ClientResult<()> {
        LocalStorage::delete(TOKEN_KEY);
        Ok(())
    }
}

/// The client every component talks through.
pub fn client() -> OwlClient {
    SHARED_CLIENT.with(|cell| {
        cell.get_or_init(|| OwlClient::from_config(&app_config(), Arc::new(LocalTokenStore)))
            .clone()
    })
}

/// Slot for the single live channel subscription.
pub fn subscription() -> Subscription {
    SUBSCRIPTION.with(Clone::clone)
}
