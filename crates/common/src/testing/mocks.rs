//! Mock implementations of the session traits

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::{SessionError, TokenRefresher, TokenStorage};

/// Scripted refresh endpoint
///
/// Every call returns the configured outcome after an optional delay, and
/// records the refresh token it was given.
///
/// # Examples
///
/// ```
/// use smartpantry_common::auth::{SessionError, TokenRefresher};
/// use smartpantry_common::testing::MockTokenRefresher;
///
/// # tokio_test::block_on(async {
/// let refresher = MockTokenRefresher::failing(SessionError::RefreshTransport("down".into()));
/// assert!(refresher.refresh_access_token("r").await.is_err());
/// assert_eq!(refresher.call_count(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct MockTokenRefresher {
    outcome: Mutex<Result<String, SessionError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl MockTokenRefresher {
    pub fn succeeding(access_token: impl Into<String>) -> Self {
        Self::with_outcome(Ok(access_token.into()))
    }

    pub fn failing(error: SessionError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<String, SessionError>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            delay: None,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Hold every call open for `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Change the outcome for subsequent calls.
    pub fn set_outcome(&self, outcome: Result<String, SessionError>) {
        *self.outcome.lock() = outcome;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received_tokens(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl TokenRefresher for MockTokenRefresher {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(refresh_token.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.lock().clone()
    }
}

/// Storage whose every operation fails
#[derive(Debug, Clone, Default)]
pub struct FailingTokenStorage {
    reason: String,
}

impl FailingTokenStorage {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl TokenStorage for FailingTokenStorage {
    async fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
        Err(self.reason.clone())
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<(), String> {
        Err(self.reason.clone())
    }

    async fn remove_item(&self, _key: &str) -> Result<(), String> {
        Err(self.reason.clone())
    }
}
