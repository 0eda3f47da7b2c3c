//! SmartPantry REST API
//!
//! [`ApiClient`] is the authenticated transport; the endpoint groups wrap it
//! with typed requests and responses.
//!
//! # Architecture
//!
//! - Uses [`crate::http::HttpClient`] (no direct reqwest in endpoint code)
//! - Bearer auth from the session, refresh-and-retry once on 401
//! - Concurrent 401s share a single refresh call
//! - The refresh itself goes through [`HttpTokenRefresher`] on a bare client

pub mod ai;
pub mod auth;
pub mod client;
mod envelope;
pub mod errors;
pub mod inventory;
pub mod planner;
pub mod refresh;
pub mod request;
pub mod shopping;

pub use ai::AiApi;
pub use auth::{AuthApi, SessionProvider};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
pub use inventory::InventoryApi;
pub use planner::PlannerApi;
pub use refresh::HttpTokenRefresher;
pub use request::{ApiRequest, ApiResponse};
pub use shopping::ShoppingApi;
