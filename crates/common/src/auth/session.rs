//! Session manager with single-flight token refresh
//!
//! Owns the token pair for one signed-in user:
//! - Seeds memory from [`TokenStorage`] on startup
//! - Hands out the access token while it is unexpired
//! - Renews the access token after a server rejection, with at most one
//!   refresh call in flight no matter how many requests were rejected
//! - Ends the session when renewal is impossible

use std::sync::Arc;

use parking_lot::RwLock;
use smartpantry_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use tracing::{debug, info, warn};

use super::error::SessionError;
use super::single_flight::SingleFlight;
use super::traits::{TokenRefresher, TokenStorage};
use super::types::{is_token_expired, is_well_formed_token, SessionTokens, TokenPair};

/// Session state plus the refresh gate
///
/// Construct one per signed-in user and share it behind an `Arc`. Token
/// state sits behind a synchronous lock that is never held across an
/// `.await`; the refresh gate is the only exclusion that spans suspension.
pub struct SessionManager<R: TokenRefresher, S: TokenStorage> {
    refresher: Arc<R>,
    storage: Arc<S>,
    tokens: RwLock<SessionTokens>,
    refresh_flight: SingleFlight<String, SessionError>,
}

impl<R: TokenRefresher, S: TokenStorage> SessionManager<R, S> {
    /// Create a manager with empty in-memory state.
    ///
    /// Call [`SessionManager::initialize`] to pick up a persisted session.
    #[must_use]
    pub fn new(refresher: Arc<R>, storage: Arc<S>) -> Self {
        Self {
            refresher,
            storage,
            tokens: RwLock::new(SessionTokens::empty()),
            refresh_flight: SingleFlight::new(),
        }
    }

    /// Load the persisted token pair into memory.
    ///
    /// Returns whether any token was found.
    ///
    /// # Errors
    /// Returns `SessionError::Storage` if the store cannot be read.
    pub async fn initialize(&self) -> Result<bool, SessionError> {
        let access_token = self.storage.get_item(ACCESS_TOKEN_KEY).await.map_err(SessionError::Storage)?;
        let refresh_token =
            self.storage.get_item(REFRESH_TOKEN_KEY).await.map_err(SessionError::Storage)?;

        let loaded = SessionTokens { access_token, refresh_token };
        let found = !loaded.is_empty();
        *self.tokens.write() = loaded;

        if found {
            info!("Session restored from storage");
        } else {
            debug!("No stored session");
        }
        Ok(found)
    }

    /// Persist and install a freshly issued token pair (login, registration).
    ///
    /// # Errors
    /// Returns `SessionError::Storage` if either token cannot be persisted;
    /// memory is left untouched in that case.
    pub async fn start_session(&self, pair: TokenPair) -> Result<(), SessionError> {
        self.storage
            .set_item(ACCESS_TOKEN_KEY, &pair.access_token)
            .await
            .map_err(SessionError::Storage)?;
        self.storage
            .set_item(REFRESH_TOKEN_KEY, &pair.refresh_token)
            .await
            .map_err(SessionError::Storage)?;

        *self.tokens.write() = pair.into();
        info!("Session started");
        Ok(())
    }

    /// Access token to attach to an outgoing request.
    ///
    /// `None` when absent or expired. Never refreshes and never clears state;
    /// an unauthenticated request simply goes out without a bearer.
    pub fn access_token(&self) -> Option<String> {
        self.tokens.read().access_token.clone().filter(|t| !is_token_expired(t))
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.read().refresh_token.clone()
    }

    pub fn current_tokens(&self) -> SessionTokens {
        self.tokens.read().clone()
    }

    /// An access token is held (it may be expired and awaiting refresh).
    pub fn is_authenticated(&self) -> bool {
        self.tokens.read().access_token.is_some()
    }

    /// `true` while a refresh call is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.refresh_flight.is_in_flight()
    }

    /// Forget both tokens in memory and storage.
    ///
    /// Memory is cleared before the first `.await`, so no request issued
    /// after this call starts can pick up the old bearer. Storage failures
    /// are logged, not returned.
    pub async fn end_session(&self) {
        *self.tokens.write() = SessionTokens::empty();
        self.remove_stored_tokens().await;
        info!("Session ended");
    }

    async fn remove_stored_tokens(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(error) = self.storage.remove_item(key).await {
                warn!(key, %error, "Failed to remove token from storage");
            }
        }
    }

    /// Obtain a new access token after the server rejected `rejected`.
    ///
    /// `rejected` is the bearer the failed request carried (`None` if it went
    /// out unauthenticated).
    ///
    /// - No usable refresh token: the session is ended and
    ///   `NoRefreshToken` returned without any network call.
    /// - A refresh already in flight: waits for it and shares its outcome.
    /// - The session already holds a different valid access token (a refresh
    ///   or login finished after the request left): returns that token.
    /// - Otherwise performs the refresh. On success the new access token is
    ///   persisted and the refresh token kept; on any failure the session is
    ///   ended before the error reaches the callers. If the session was ended
    ///   or replaced meanwhile, the outcome is dropped and callers get
    ///   `SessionReplaced`.
    ///
    /// # Errors
    /// Returns the refresh failure, shared by every caller of this cycle.
    pub async fn renew_access_token(&self, rejected: Option<&str>) -> Result<String, SessionError> {
        let refresh_token = self.tokens.read().usable_refresh_token().map(str::to_owned);
        let Some(refresh_token) = refresh_token else {
            warn!("Authorization rejected and no usable refresh token, ending session");
            self.end_session().await;
            return Err(SessionError::NoRefreshToken);
        };

        self.refresh_flight
            .run(
                || self.newer_access_token(rejected),
                || self.refresh_with(refresh_token),
                || SessionError::RefreshAbandoned,
            )
            .await
    }

    fn newer_access_token(&self, rejected: Option<&str>) -> Option<String> {
        self.access_token().filter(|current| Some(current.as_str()) != rejected)
    }

    async fn refresh_with(&self, refresh_token: String) -> Result<String, SessionError> {
        debug!("Refreshing access token");

        let outcome = match self.refresher.refresh_access_token(&refresh_token).await {
            Ok(access) if is_well_formed_token(&access) => Ok(access),
            Ok(_) => Err(SessionError::InvalidRefreshResponse("malformed access token".into())),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(access) => self.install_access_token(&refresh_token, access).await,
            Err(error) => self.fail_refresh(&refresh_token, error).await,
        }
    }

    /// End the session the failed refresh belonged to. A session that was
    /// ended or replaced meanwhile is left untouched.
    async fn fail_refresh(&self, refresh_token: &str, error: SessionError) -> Result<String, SessionError> {
        let cleared = {
            let mut tokens = self.tokens.write();
            if tokens.refresh_token.as_deref() == Some(refresh_token) {
                *tokens = SessionTokens::empty();
                true
            } else {
                false
            }
        };
        if !cleared {
            debug!(%error, "Session changed while refreshing, ignoring refresh failure");
            return Err(SessionError::SessionReplaced);
        }

        if error.is_transient() {
            warn!(%error, "Token refresh failed (transient), ending session");
        } else {
            warn!(%error, "Token refresh rejected, ending session");
        }
        self.remove_stored_tokens().await;
        info!("Session ended");
        Err(error)
    }

    async fn install_access_token(
        &self,
        refresh_token: &str,
        access: String,
    ) -> Result<String, SessionError> {
        let installed = {
            let mut tokens = self.tokens.write();
            if tokens.refresh_token.as_deref() == Some(refresh_token) {
                tokens.access_token = Some(access.clone());
                true
            } else {
                false
            }
        };
        if !installed {
            debug!("Session changed while refreshing, discarding new access token");
            return Err(SessionError::SessionReplaced);
        }

        if let Err(error) = self.storage.set_item(ACCESS_TOKEN_KEY, &access).await {
            // The in-memory session keeps working; only restart survival is lost
            warn!(%error, "Failed to persist refreshed access token");
        }
        info!("Access token refreshed");
        Ok(access)
    }
}
