//! Traits for token persistence and the refresh call
//!
//! These traits abstract the two external dependencies of the session
//! (durable key-value storage and the refresh endpoint) so both can be
//! replaced in tests.

use async_trait::async_trait;

use super::error::SessionError;

/// Durable string key-value store for the token pair
///
/// Mirrors the browser local storage contract: reading a missing key is not
/// an error, removing a missing key is a no-op.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// # Errors
    /// Returns an error only if the backing store cannot be read.
    async fn get_item(&self, key: &str) -> Result<Option<String>, String>;

    /// # Errors
    /// Returns an error if the value cannot be persisted.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), String>;

    /// # Errors
    /// Returns an error if the backing store cannot be written.
    async fn remove_item(&self, key: &str) -> Result<(), String>;
}

/// Exchanges a refresh token for a new access token
///
/// Implementations must not route through the authenticated request
/// pipeline, otherwise a rejected refresh would recurse into another refresh.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// # Errors
    /// - `RefreshRejected` for a non-success HTTP status
    /// - `RefreshTransport` when no response was received
    /// - `InvalidRefreshResponse` when the body has no usable access token
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, SessionError>;
}
