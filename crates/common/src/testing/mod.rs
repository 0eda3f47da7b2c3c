//! Testing utilities
//!
//! - **[`mocks`]**: scripted [`TokenRefresher`](crate::auth::TokenRefresher)
//!   and a storage that always fails
//! - **[`tokens`]**: unsigned JWT builders with a chosen `exp`

pub mod mocks;
pub mod tokens;

pub use mocks::{FailingTokenStorage, MockTokenRefresher};
pub use tokens::{expired_jwt, jwt_expiring_at, jwt_valid_for, jwt_without_expiry};
