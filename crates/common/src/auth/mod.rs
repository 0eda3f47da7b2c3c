//! Session and token refresh
//!
//! Keeps the signed-in user's JWT pair and renews the access token when the
//! server rejects it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  SessionManager  │  Token state + renewal policy
//! └────────┬─────────┘
//!          │
//!          ├──► SingleFlight      (one refresh in flight, FIFO waiters)
//!          ├──► TokenRefresher    (refresh endpoint, outside the request pipeline)
//!          └──► TokenStorage      (sp_access_token / sp_refresh_token)
//! ```
//!
//! # Renewal cycle
//!
//! 1. A request fails with 401 and calls
//!    [`SessionManager::renew_access_token`] with the bearer it carried.
//! 2. Without a usable refresh token the session ends immediately.
//! 3. The first caller performs the refresh; callers arriving meanwhile
//!    queue behind it and receive the same outcome in arrival order.
//! 4. Success installs the new access token (refresh token kept). Failure
//!    ends the session and every queued caller gets the failure.
//!
//! # Usage Example
//!
//! ```
//! # #[cfg(feature = "test-utils")]
//! # {
//! use std::sync::Arc;
//!
//! use smartpantry_common::auth::{MemoryTokenStorage, SessionManager, TokenPair};
//! use smartpantry_common::testing::MockTokenRefresher;
//!
//! # tokio_test::block_on(async {
//! let refresher = Arc::new(MockTokenRefresher::succeeding("new-access"));
//! let session = SessionManager::new(refresher, Arc::new(MemoryTokenStorage::new()));
//!
//! session.start_session(TokenPair::new("old-access", "refresh")).await.unwrap();
//! let token = session.renew_access_token(Some("old-access")).await.unwrap();
//! assert_eq!(token, "new-access");
//! # });
//! # }
//! ```

pub mod error;
#[cfg(feature = "runtime")]
pub mod session;
#[cfg(feature = "runtime")]
pub mod single_flight;
#[cfg(feature = "runtime")]
pub mod storage;
#[cfg(feature = "runtime")]
pub mod traits;
pub mod types;

pub use error::SessionError;
#[cfg(feature = "runtime")]
pub use session::SessionManager;
#[cfg(feature = "runtime")]
pub use single_flight::{FlightAbandoned, FlightGuard, Role, SingleFlight, Waiter};
#[cfg(feature = "runtime")]
pub use storage::MemoryTokenStorage;
#[cfg(feature = "runtime")]
pub use traits::{TokenRefresher, TokenStorage};
pub use types::{
    is_token_expired, is_token_expired_at, is_well_formed_token, token_expiry, RefreshRequest,
    RefreshResponse, SessionTokens, TokenPair,
};
