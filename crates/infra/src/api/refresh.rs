//! Refresh endpoint client
//!
//! Talks to `jwt/refresh/` over a bare [`HttpClient`]: no bearer, no
//! interceptors, so a failing refresh can never recurse into another one.

use async_trait::async_trait;
use reqwest::Method;
use smartpantry_common::auth::{RefreshRequest, RefreshResponse, SessionError, TokenRefresher};
use smartpantry_domain::constants::JWT_REFRESH_PATH;
use smartpantry_domain::{ApiConfig, SmartPantryError};
use tracing::debug;

use super::errors::detail_message;
use crate::http::HttpClient;

/// [`TokenRefresher`] that exchanges a refresh token at `jwt/refresh/`
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    http_client: HttpClient,
    url: String,
}

impl HttpTokenRefresher {
    pub fn new(base_url: &str, http_client: HttpClient) -> Self {
        let url = format!("{}{}", base_url.trim_end_matches('/'), JWT_REFRESH_PATH);
        Self { http_client, url }
    }

    /// Build with its own HTTP client using the configured timeout.
    ///
    /// # Errors
    /// Returns `SmartPantryError::Config` if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, SmartPantryError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::new(config.base_url_trimmed(), http_client))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, SessionError> {
        let request = self
            .http_client
            .request(Method::POST, &self.url)
            .json(&RefreshRequest { refresh: refresh_token });

        let response = self
            .http_client
            .send(request)
            .await
            .map_err(|e| SessionError::RefreshTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = detail_message(&body).unwrap_or(body);
            debug!(status = status.as_u16(), "Refresh endpoint rejected the refresh token");
            return Err(SessionError::RefreshRejected { status: status.as_u16(), message });
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| SessionError::InvalidRefreshResponse(e.to_string()))?;

        if body.access.trim().is_empty() {
            return Err(SessionError::InvalidRefreshResponse("empty access token".into()));
        }
        Ok(body.access)
    }
}
