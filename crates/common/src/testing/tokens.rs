//! JWT builders
//!
//! Produces structurally valid but unsigned tokens; the client only reads
//! the `exp` claim.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

/// Token whose `exp` claim is `expires_at`.
///
/// Each call embeds a distinct `jti`, so two tokens with the same expiry
/// still compare unequal.
pub fn jwt_expiring_at(expires_at: DateTime<Utc>) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);

    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = serde_json::json!({
        "token_type": "access",
        "exp": expires_at.timestamp(),
        "jti": NEXT_ID.fetch_add(1, Ordering::Relaxed),
        "user_id": 1,
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.test-signature")
}

/// Token valid for `ttl` from now.
pub fn jwt_valid_for(ttl: Duration) -> String {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));
    jwt_expiring_at(Utc::now() + ttl)
}

/// Token that expired an hour ago.
pub fn expired_jwt() -> String {
    jwt_expiring_at(Utc::now() - chrono::Duration::hours(1))
}


/// Decodable token with no `exp` claim.
pub fn jwt_without_expiry() -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(r#"{"token_type":"access","user_id":1}"#);
    format!("{header}.{payload}.test-signature")
}
