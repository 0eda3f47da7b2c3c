//! Authenticated API client
//!
//! Every call goes through [`ApiClient::send`]:
//!
//! 1. Attach `Authorization: Bearer <token>` from the session (or the
//!    request's explicit bearer on a resend).
//! 2. On a 401 for an authenticated, not-yet-retried request, ask the
//!    session for a renewed token. Concurrent 401s share one refresh call.
//! 3. Resend once with the renewed token, marked as retried.
//!
//! Any other status is handed back unchanged; no further retries happen.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use smartpantry_common::auth::SessionError;
use smartpantry_domain::constants::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, HEALTH_PATH};
use smartpantry_domain::ApiConfig;
use tracing::{debug, info, instrument, warn};

use super::auth::SessionProvider;
use super::errors::ApiError;
use super::request::{ApiRequest, ApiResponse};
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Server origin, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Upper bound for one request/response exchange
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url_trimmed().to_string(),
            timeout: config.timeout(),
            user_agent: Some(config.user_agent.clone()),
        }
    }
}

/// REST client with transparent token refresh
pub struct ApiClient {
    http_client: HttpClient,
    session: Arc<dyn SessionProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be created
    pub fn new(
        config: ApiClientConfig,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, ApiError> {
        let mut builder = HttpClient::builder().timeout(config.timeout);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Ok(Self { http_client, session, config })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Send a request through the auth interceptors.
    ///
    /// Returns the final response whatever its status; use
    /// [`ApiResponse::error_for_status`] or [`ApiClient::execute`] to turn
    /// failures into errors. A 401 that could not be recovered because no
    /// refresh token exists comes back as that original 401 response.
    ///
    /// # Errors
    ///
    /// Transport failures, the per-request timeout, and refresh failures
    /// (`ApiError::Session`, shared by every request waiting on the same
    /// refresh).
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let bearer = self.bearer_for(&request);
        let response = self.dispatch(&request, bearer.as_deref()).await?;

        if response.status != StatusCode::UNAUTHORIZED || request.retried || !request.authenticated
        {
            return Ok(response);
        }

        debug!("Request rejected with 401, renewing access token");
        let token = match self.session.renew_access_token(bearer.as_deref()).await {
            Ok(token) => token,
            Err(SessionError::NoRefreshToken) => return Ok(response),
            Err(error) => {
                warn!(%error, "Could not renew access token");
                return Err(ApiError::Session(error));
            }
        };

        let retry = request.retry_with(token);
        let response = self.dispatch(&retry, retry.bearer.as_deref()).await?;
        if response.status == StatusCode::UNAUTHORIZED {
            warn!("Request rejected again after token refresh");
        }
        Ok(response)
    }

    /// Send and decode a successful JSON response.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] returns, any non-2xx status as the
    /// matching [`ApiError`], and `ApiError::Decode` for unexpected bodies.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.error_for_status()?.json()
    }

    /// Execute a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::get(path)).await
    }

    /// Execute a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.execute(ApiRequest::get(path).query(query)).await
    }

    /// Execute a POST request
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    /// Execute a PATCH request
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(ApiRequest::patch(path).json(body)?).await
    }

    /// Execute a PUT request
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    /// Execute a DELETE request; the server answers 204
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(path)).await?.error_for_status()?;
        Ok(())
    }

    /// Health check for API
    ///
    /// # Returns
    ///
    /// `true` if `/healthz/` answered 2xx, `false` for any other status
    ///
    /// # Errors
    ///
    /// Returns error if the server is unreachable
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let response = match self.send(ApiRequest::get(HEALTH_PATH).without_auth()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Health check failed");
                return Err(e);
            }
        };

        if response.is_success() {
            info!("API is healthy");
            Ok(true)
        } else {
            warn!(status = %response.status, "API returned non-success status");
            Ok(false)
        }
    }

    fn bearer_for(&self, request: &ApiRequest) -> Option<String> {
        if !request.authenticated {
            return None;
        }
        request.bearer.clone().or_else(|| self.session.access_token())
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.config.base_url, request.path);

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .header("Content-Type", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let timeout = self.config.timeout;
        let exchange = async {
            let response = self.http_client.send(builder).await.map_err(ApiError::from)?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response
                .bytes()
                .await
                .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;
            Ok::<_, ApiError>(ApiResponse { status, headers, body: body.to_vec() })
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(timeout)),
        }
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    session: Option<Arc<dyn SessionProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the session the client authenticates with
    pub fn session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the session is missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let session =
            self.session.ok_or_else(|| ApiError::Config("Session provider not set".to_string()))?;

        ApiClient::new(config, session)
    }
}
