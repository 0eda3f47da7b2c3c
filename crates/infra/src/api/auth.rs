//! Session seam for the API client and the account endpoints
//!
//! [`SessionProvider`] is what [`ApiClient`] sees of the session: the bearer
//! to attach and the refresh cycle to run on a 401. [`AuthApi`] covers
//! login, registration, demo login, token verification and logout.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use smartpantry_common::auth::{
    SessionError, SessionManager, TokenPair, TokenRefresher, TokenStorage,
};
use smartpantry_domain::constants::{
    DEMO_TOKEN_PATH, JWT_CREATE_PATH, JWT_VERIFY_PATH, REGISTER_PATH,
};
use smartpantry_domain::types::{AuthTokens, Credentials, Registration, RegistrationRequest, UserAccount};
use tracing::{info, instrument};

use super::client::ApiClient;
use super::errors::ApiError;
use super::request::ApiRequest;

/// Session operations the API layer depends on
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Current unexpired access token, if any. Never refreshes.
    fn access_token(&self) -> Option<String>;

    /// Renew the access token after the server rejected `rejected`.
    async fn renew_access_token(&self, rejected: Option<&str>) -> Result<String, SessionError>;

    async fn start_session(&self, pair: TokenPair) -> Result<(), SessionError>;

    async fn end_session(&self);

    fn is_authenticated(&self) -> bool;
}

#[async_trait]
impl<R: TokenRefresher, S: TokenStorage> SessionProvider for SessionManager<R, S> {
    fn access_token(&self) -> Option<String> {
        SessionManager::access_token(self)
    }

    async fn renew_access_token(&self, rejected: Option<&str>) -> Result<String, SessionError> {
        SessionManager::renew_access_token(self, rejected).await
    }

    async fn start_session(&self, pair: TokenPair) -> Result<(), SessionError> {
        SessionManager::start_session(self, pair).await
    }

    async fn end_session(&self) {
        SessionManager::end_session(self).await;
    }

    fn is_authenticated(&self) -> bool {
        SessionManager::is_authenticated(self)
    }
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

/// Account endpoints under `/api/auth/`
///
/// Login-type calls go out without a bearer, so a wrong password surfaces as
/// a plain 401 and never starts a refresh.
pub struct AuthApi {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionProvider>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionProvider>) -> Self {
        Self { client, session }
    }

    /// Exchange credentials for a token pair and start the session.
    ///
    /// # Errors
    /// `ApiError::Auth` for bad credentials, `ApiError::Session` if the
    /// tokens cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let credentials =
            Credentials { username: username.to_string(), password: password.to_string() };
        let request = ApiRequest::post(JWT_CREATE_PATH).json(&credentials)?.without_auth();
        let tokens: AuthTokens = self.client.execute(request).await?;

        self.install(tokens).await?;
        info!(username, "Logged in");
        Ok(())
    }

    /// Create an account; the server returns a token pair, so the new user is
    /// signed in immediately.
    ///
    /// # Errors
    /// `ApiError::Client` with the server's validation message on 400.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, ApiError> {
        let body = RegistrationRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post(REGISTER_PATH).json(&body)?.without_auth();
        let registration: Registration = self.client.execute(request).await?;

        self.install(registration.tokens()).await?;
        info!(username, "Registered and logged in");
        Ok(registration.user)
    }

    /// Sign in as the shared demo user.
    ///
    /// # Errors
    /// Propagates transport and status errors.
    #[instrument(skip(self))]
    pub async fn demo_login(&self) -> Result<(), ApiError> {
        let request = ApiRequest::post(DEMO_TOKEN_PATH).without_auth();
        let tokens: AuthTokens = self.client.execute(request).await?;

        self.install(tokens).await?;
        info!("Logged in as demo user");
        Ok(())
    }

    /// Ask the server whether `token` is still valid.
    ///
    /// # Errors
    /// Only for failures other than a rejection of the token itself.
    #[instrument(skip_all)]
    pub async fn verify(&self, token: &str) -> Result<bool, ApiError> {
        let request = ApiRequest::post(JWT_VERIFY_PATH).json(&VerifyRequest { token })?.without_auth();
        match self.client.execute::<serde_json::Value>(request).await {
            Ok(_) => Ok(true),
            Err(ApiError::Auth { status: 401, .. }) => Ok(false),
            Err(error) => Err(error),
        }
    }

    pub async fn logout(&self) {
        self.session.end_session().await;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    async fn install(&self, tokens: AuthTokens) -> Result<(), ApiError> {
        self.session.start_session(TokenPair::new(tokens.access, tokens.refresh)).await?;
        Ok(())
    }
}
