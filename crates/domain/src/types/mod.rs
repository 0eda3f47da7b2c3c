//! REST resource types
//!
//! Field names mirror the JSON the server emits so the structs can be used
//! directly with `serde_json`.

pub mod ai;
pub mod auth;
pub mod cook;
pub mod inventory;
pub mod shopping;

pub use ai::{
    AssistantOutcome, AssistantRequest, AssistantResponse, ImportResponse, ImportedItem, Language,
    MenuRequest, ParseItemsRequest, SuggestShoppingRequest, SuggestShoppingResponse,
};
pub use auth::{AuthTokens, Credentials, Registration, RegistrationRequest, UserAccount};
pub use cook::{CookHistoryEntry, CookIngredient, CookRequest, CookResponse, CookResult};
pub use inventory::{
    AdjustAction, AdjustRequest, AdjustResponse, ExpiryThresholds, ExpiryType, InventoryItem,
    InventoryItemPatch, InventoryQuery, InventorySummary, NewInventoryItem, PriorityItem,
    PriorityReason, QuickAddItem,
};
pub use shopping::{
    BatchPurchaseLine, BatchPurchaseResult, NewShoppingTask, PurchaseRequest, PurchaseResponse,
    ShoppingQuery, ShoppingSource, ShoppingSourceCount, ShoppingStatus, ShoppingSummary,
    ShoppingTask, ShoppingTaskPatch,
};

/// Server-side primary key
pub type ResourceId = i64;
