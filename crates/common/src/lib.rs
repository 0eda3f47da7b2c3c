//! Session core shared across SmartPantry client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: token types, JWT expiry checks, errors
//! - `observability`: tracing (pulled in by `runtime`)
//! - `runtime`: session manager, single-flight refresh gate, storage traits
//! - `test-utils`: mocks and JWT builders for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier (runtime-only parts are gated inside the module)
// --------------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use auth::{SessionError, SessionTokens, TokenPair};
#[cfg(feature = "runtime")]
pub use auth::{MemoryTokenStorage, SessionManager, SingleFlight, TokenRefresher, TokenStorage};
