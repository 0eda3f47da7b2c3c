//! Client constants
//!
//! Storage keys, REST paths and defaults shared across the client crates.

// Server
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("smartpantry-client/", env!("CARGO_PKG_VERSION"));

// Token storage keys (same names the web client writes to local storage)
pub const ACCESS_TOKEN_KEY: &str = "sp_access_token";
pub const REFRESH_TOKEN_KEY: &str = "sp_refresh_token";
pub const DEFAULT_SESSION_FILE: &str = "smartpantry-session.json";

// Auth endpoints
pub const HEALTH_PATH: &str = "/healthz/";
pub const JWT_CREATE_PATH: &str = "/api/auth/jwt/create/";
pub const JWT_REFRESH_PATH: &str = "/api/auth/jwt/refresh/";
pub const JWT_VERIFY_PATH: &str = "/api/auth/jwt/verify/";
pub const REGISTER_PATH: &str = "/api/auth/register/";
pub const DEMO_TOKEN_PATH: &str = "/api/auth/demo-token/";

// Inventory endpoints
pub const INVENTORY_ITEMS_PATH: &str = "/api/v1/inventory/items/";
pub const INVENTORY_BULK_PATH: &str = "/api/v1/inventory/items/bulk/";
pub const INVENTORY_QUICK_ADD_PATH: &str = "/api/v1/inventory/items/quick-add/";
pub const INVENTORY_SUMMARY_PATH: &str = "/api/v1/inventory/summary/";
pub const SHOPPING_PATH: &str = "/api/v1/inventory/shopping/";
pub const SHOPPING_GENERATE_PATH: &str = "/api/v1/inventory/shopping/generate/";
pub const SHOPPING_PURCHASE_BATCH_PATH: &str = "/api/v1/inventory/shopping/purchase-batch/";
pub const SHOPPING_SUMMARY_PATH: &str = "/api/v1/inventory/shopping/summary/";
pub const COOK_PATH: &str = "/api/v1/inventory/cook/";
pub const COOK_HISTORY_PATH: &str = "/api/v1/inventory/cook-history/";

// AI endpoints
pub const AI_MENU_PATH: &str = "/api/v1/ai/menu/";
pub const AI_PARSE_ITEMS_PATH: &str = "/api/v1/ai/parse-items/";
pub const AI_PARSE_ITEMS_IMPORT_PATH: &str = "/api/v1/ai/parse-items-import/";
pub const AI_SUGGEST_SHOPPING_PATH: &str = "/api/v1/ai/suggest-shopping/";
pub const AI_ASSISTANT_PATH: &str = "/api/v1/ai/assistant/";

// Summary defaults (server falls back to the same window)
pub const DEFAULT_SUMMARY_WINDOW_DAYS: u32 = 14;
