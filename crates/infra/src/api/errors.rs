//! API-specific error types
//!
//! Classifies failed calls so UI code can tell a forced logout from a bad
//! request or an unreachable server.

use std::time::Duration;

use smartpantry_common::auth::SessionError;
use smartpantry_domain::SmartPantryError;
use thiserror::Error;

/// Coarse grouping of [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401/403, or the session could not be renewed
    Authentication,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx, or a response body that did not match the expected shape
    Client,
    /// Connection failures and timeouts
    Network,
    Config,
}

/// API operation errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Classify a non-success HTTP status.
    ///
    /// `body` is the raw response text; a DRF-style `{"detail": "..."}`
    /// message is preferred when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = detail_message(body).unwrap_or_else(|| {
            if body.is_empty() {
                format!("HTTP {status}")
            } else {
                body.to_string()
            }
        });

        match status {
            401 | 403 => Self::Auth { status, message },
            429 => Self::RateLimit(message),
            500..=599 => Self::Server { status, message },
            400..=499 => Self::Client { status, message },
            _ => Self::Network(message),
        }
    }

    /// Get the error category for this error
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth { .. } | Self::Session(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Client { .. } | Self::Decode(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// HTTP status of the failed response, if one was received
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Server { status, .. } | Self::Client { status, .. } => {
                Some(*status)
            }
            Self::RateLimit(_) => Some(429),
            _ => None,
        }
    }

    /// The caller has been signed out and must log in again.
    ///
    /// True for a 401 that survived the refresh cycle and for any session
    /// failure that ended the session.
    pub const fn requires_login(&self) -> bool {
        match self {
            Self::Auth { status, .. } => *status == 401,
            Self::Session(error) => error.requires_login(),
            _ => false,
        }
    }
}

impl From<SmartPantryError> for ApiError {
    fn from(err: SmartPantryError) -> Self {
        match err {
            SmartPantryError::Network(message) => Self::Network(message),
            SmartPantryError::Auth(message) => Self::Auth { status: 401, message },
            SmartPantryError::Config(message) => Self::Config(message),
            SmartPantryError::NotFound(message) => Self::Client { status: 404, message },
            SmartPantryError::InvalidInput(message) => Self::Client { status: 400, message },
            SmartPantryError::Storage(message) => Self::Session(SessionError::Storage(message)),
            SmartPantryError::Internal(message) => Self::Decode(message),
        }
    }
}

impl From<ApiError> for SmartPantryError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Session(error) => error.into(),
            ApiError::Auth { .. } => Self::Auth(err.to_string()),
            ApiError::Client { status: 404, .. } => Self::NotFound(err.to_string()),
            ApiError::Client { .. } | ApiError::Decode(_) => Self::InvalidInput(err.to_string()),
            ApiError::Config(message) => Self::Config(message),
            ApiError::RateLimit(_)
            | ApiError::Server { .. }
            | ApiError::Network(_)
            | ApiError::Timeout(_) => Self::Network(err.to_string()),
        }
    }
}

pub(crate) fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}
