//! Session errors
//!
//! One refresh outcome is delivered to every queued caller, so the error is
//! `Clone` and carries only owned strings.

use smartpantry_domain::SmartPantryError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No refresh token stored, or the stored one is malformed
    #[error("No refresh token available")]
    NoRefreshToken,

    /// The refresh endpoint answered with a non-success status
    #[error("Token refresh rejected (HTTP {status}): {message}")]
    RefreshRejected { status: u16, message: String },

    /// The refresh call never produced a response
    #[error("Token refresh transport error: {0}")]
    RefreshTransport(String),

    /// The refresh endpoint answered 2xx with an unusable body
    #[error("Invalid token refresh response: {0}")]
    InvalidRefreshResponse(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    /// The caller performing the refresh was cancelled before finishing
    #[error("Token refresh abandoned before completion")]
    RefreshAbandoned,

    /// Logout or a new login happened while the refresh was in flight
    #[error("Session ended or replaced during token refresh")]
    SessionReplaced,
}

impl SessionError {
    /// Failures that say nothing about the validity of the refresh token.
    ///
    /// A failed refresh call still clears the session; the flag only changes
    /// how it is logged and reported. An abandoned refresh never reached an
    /// outcome and leaves the stored tokens untouched.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RefreshTransport(_)
                | Self::RefreshAbandoned
                | Self::RefreshRejected { status: 500..=599, .. }
        )
    }

    /// The user has to log in again.
    ///
    /// False for storage faults and for an abandoned refresh, where the
    /// session survives and the next request can retry.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::RefreshAbandoned)
    }
}

impl From<SessionError> for SmartPantryError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Storage(msg) => Self::Storage(msg),
            SessionError::RefreshTransport(msg) => Self::Network(msg),
            other => Self::Auth(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(SessionError::RefreshTransport("connection reset".into()).is_transient());
        assert!(SessionError::RefreshRejected { status: 503, message: String::new() }.is_transient());
        assert!(!SessionError::RefreshRejected { status: 401, message: String::new() }.is_transient());
        assert!(!SessionError::NoRefreshToken.is_transient());
    }

    #[test]
    fn abandoned_refresh_keeps_the_session() {
        assert!(SessionError::RefreshAbandoned.is_transient());
        assert!(!SessionError::RefreshAbandoned.requires_login());
        assert!(!SessionError::Storage("disk full".into()).requires_login());
        assert!(SessionError::NoRefreshToken.requires_login());
        assert!(SessionError::RefreshRejected { status: 401, message: String::new() }.requires_login());
    }

    #[test]
    fn converts_into_domain_error() {
        let err: SmartPantryError = SessionError::RefreshTransport("timeout".into()).into();
        assert!(matches!(err, SmartPantryError::Network(_)));

        let err: SmartPantryError = SessionError::NoRefreshToken.into();
        assert_eq!(err, SmartPantryError::Auth("No refresh token available".into()));
    }
}
