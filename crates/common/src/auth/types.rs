//! Token types and JWT expiry checks
//!
//! Access tokens are JWTs issued by the server. Only the `exp` claim is read
//! here; signature checks are the server's job.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh pair produced by a login
///
/// Both halves are required here; use [`SessionTokens`] for state that may be
/// partially populated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential
    pub access_token: String,
    /// Long-lived credential exchanged for new access tokens
    pub refresh_token: String,
}

impl TokenPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: refresh_token.into() }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

/// In-memory session state
///
/// Storage may hold only one of the two keys (e.g. after a partial write), so
/// each half is optional.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    #[must_use]
    pub const fn empty() -> Self {
        Self { access_token: None, refresh_token: None }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    /// Refresh token, if it is usable for a refresh call
    #[must_use]
    pub fn usable_refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| is_well_formed_token(t))
    }
}

impl From<TokenPair> for SessionTokens {
    fn from(pair: TokenPair) -> Self {
        Self { access_token: Some(pair.access_token), refresh_token: Some(pair.refresh_token) }
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &self.access_token.as_deref().map(redact))
            .field("refresh_token", &self.refresh_token.as_deref().map(redact))
            .finish()
    }
}

/// Body of the refresh endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Response of the refresh endpoint (no rotation: only a new access token)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

fn decode_claims(token: &str) -> Option<ExpiryClaim> {
    let payload = token.split('.').nth(1)?;
    // Tolerate padded payloads from non-conforming encoders
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expiry of a JWT, read from its `exp` claim.
///
/// Returns `None` when the token is not a JWT, the payload is not valid
/// base64url JSON, or the claim is absent.
#[must_use]
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(decode_claims(token)?.exp?, 0).single()
}

/// Whether `token` is expired at `now`.
///
/// Undecodable tokens count as expired, so they are never attached to a
/// request. A decodable token without an `exp` claim never expires.
#[must_use]
pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        None => true,
        Some(ExpiryClaim { exp: None }) => false,
        Some(ExpiryClaim { exp: Some(exp) }) => {
            Utc.timestamp_opt(exp, 0).single().map_or(true, |expires_at| expires_at <= now)
        }
    }
}

#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}

/// Non-empty and free of whitespace/control characters, i.e. safe to send.
#[must_use]
pub fn is_well_formed_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn redact(token: &str) -> String {
    format!("<{} chars>", token.len())
}
