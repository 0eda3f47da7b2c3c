//! Inventory endpoints under `/api/v1/inventory/`

use std::sync::Arc;

use smartpantry_domain::constants::{
    INVENTORY_BULK_PATH, INVENTORY_ITEMS_PATH, INVENTORY_QUICK_ADD_PATH, INVENTORY_SUMMARY_PATH,
};
use smartpantry_domain::types::{
    AdjustRequest, AdjustResponse, InventoryItem, InventoryItemPatch, InventoryQuery,
    InventorySummary, NewInventoryItem, QuickAddItem, ResourceId,
};
use tracing::{debug, instrument};

use super::client::ApiClient;
use super::envelope::{Items, Results};
use super::errors::ApiError;

/// Pantry items: CRUD, stock adjustments and the dashboard summary
pub struct InventoryApi {
    client: Arc<ApiClient>,
}

impl InventoryApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List the user's items, filtered server-side.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &InventoryQuery) -> Result<Vec<InventoryItem>, ApiError> {
        let items: Vec<InventoryItem> =
            self.client.get_with_query(INVENTORY_ITEMS_PATH, query.to_query_pairs()).await?;
        debug!(count = items.len(), "Fetched inventory items");
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ResourceId) -> Result<InventoryItem, ApiError> {
        self.client.get(&item_path(id)).await
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    pub async fn create(&self, item: &NewInventoryItem) -> Result<InventoryItem, ApiError> {
        self.client.post(INVENTORY_ITEMS_PATH, item).await
    }

    /// Partial update; unset fields are left alone.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: ResourceId,
        patch: &InventoryItemPatch,
    ) -> Result<InventoryItem, ApiError> {
        self.client.patch(&item_path(id), patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ResourceId) -> Result<(), ApiError> {
        self.client.delete(&item_path(id)).await
    }

    /// Change the stock level by a signed delta and record a consumption
    /// event. The server refuses (400) to go below zero.
    #[instrument(skip(self, adjustment))]
    pub async fn adjust(
        &self,
        id: ResourceId,
        adjustment: &AdjustRequest,
    ) -> Result<AdjustResponse, ApiError> {
        self.client.post(&format!("{}{}/adjust/", INVENTORY_ITEMS_PATH, id), adjustment).await
    }

    /// Create several items in one call; all or nothing.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn bulk_create(
        &self,
        items: &[NewInventoryItem],
    ) -> Result<Vec<InventoryItem>, ApiError> {
        self.client.post(INVENTORY_BULK_PATH, &Items { items }).await
    }

    /// Add common items, merging into existing ones by name.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn quick_add(&self, items: &[QuickAddItem]) -> Result<Vec<InventoryItem>, ApiError> {
        let response: Results<InventoryItem> =
            self.client.post(INVENTORY_QUICK_ADD_PATH, &Items { items }).await?;
        Ok(response.results)
    }

    /// Low stock, near expiry and the priority list. `window_days` is the
    /// consumption history used to estimate days to empty.
    #[instrument(skip(self))]
    pub async fn summary(&self, window_days: u32) -> Result<InventorySummary, ApiError> {
        self.client
            .get_with_query(
                INVENTORY_SUMMARY_PATH,
                vec![("window_days".to_string(), window_days.to_string())],
            )
            .await
    }
}

fn item_path(id: ResourceId) -> String {
    format!("{}{}/", INVENTORY_ITEMS_PATH, id)
}
