//! # SmartPantry Infrastructure
//!
//! Concrete I/O behind the session layer in `smartpantry-common`.
//!
//! This crate contains:
//! - The authenticated REST client with refresh-and-retry on 401
//! - The HTTP token refresher and file-backed token storage
//! - Typed endpoint groups (auth, inventory, shopping, cooking, AI)
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements the `TokenRefresher` and `TokenStorage` traits from
//!   `smartpantry-common`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::{
    AiApi, ApiClient, ApiClientConfig, ApiError, ApiErrorCategory, ApiRequest, ApiResponse,
    AuthApi, HttpTokenRefresher, InventoryApi, PlannerApi, SessionProvider, ShoppingApi,
};
pub use context::{AppContext, AppSession};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::FileTokenStorage;
