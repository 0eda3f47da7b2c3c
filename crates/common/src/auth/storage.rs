//! In-memory token storage
//!
//! Process-local [`TokenStorage`] for tests and for callers that do not want
//! the session to survive a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use smartpantry_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

use super::traits::TokenStorage;
use super::types::TokenPair;

#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a token pair under the standard keys
    #[must_use]
    pub fn with_pair(pair: &TokenPair) -> Self {
        let storage = Self::new();
        storage.insert(ACCESS_TOKEN_KEY, &pair.access_token);
        storage.insert(REFRESH_TOKEN_KEY, &pair.refresh_token);
        storage
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.items.lock().insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.get(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.insert(key, value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), String> {
        self.items.lock().remove(key);
        Ok(())
    }
}
