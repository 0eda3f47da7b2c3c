//! Shopping list endpoints

use std::sync::Arc;

use smartpantry_domain::constants::{
    SHOPPING_GENERATE_PATH, SHOPPING_PATH, SHOPPING_PURCHASE_BATCH_PATH, SHOPPING_SUMMARY_PATH,
};
use smartpantry_domain::types::{
    BatchPurchaseLine, BatchPurchaseResult, NewShoppingTask, PurchaseRequest, PurchaseResponse,
    ResourceId, ShoppingQuery, ShoppingStatus, ShoppingSummary, ShoppingTask, ShoppingTaskPatch,
};
use tracing::{info, instrument};

use super::client::ApiClient;
use super::envelope::{Items, Results};
use super::errors::ApiError;
use super::request::ApiRequest;

/// Shopping list tasks and their purchase into stock
pub struct ShoppingApi {
    client: Arc<ApiClient>,
}

impl ShoppingApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ShoppingQuery) -> Result<Vec<ShoppingTask>, ApiError> {
        self.client.get_with_query(SHOPPING_PATH, query.to_query_pairs()).await
    }

    /// Task counts per source over the tasks matching `query`
    #[instrument(skip(self))]
    pub async fn summary(&self, query: &ShoppingQuery) -> Result<ShoppingSummary, ApiError> {
        self.client.get_with_query(SHOPPING_SUMMARY_PATH, query.to_query_pairs()).await
    }

    #[instrument(skip(self, task), fields(name = %task.name))]
    pub async fn create(&self, task: &NewShoppingTask) -> Result<ShoppingTask, ApiError> {
        self.client.post(SHOPPING_PATH, task).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: ResourceId,
        patch: &ShoppingTaskPatch,
    ) -> Result<ShoppingTask, ApiError> {
        self.client.patch(&task_path(id), patch).await
    }

    /// Tick a task off without touching stock. Use [`ShoppingApi::purchase`]
    /// to also add the bought quantity to the inventory.
    pub async fn complete(&self, id: ResourceId) -> Result<ShoppingTask, ApiError> {
        let patch = ShoppingTaskPatch { status: Some(ShoppingStatus::Done), ..Default::default() };
        self.update(id, &patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ResourceId) -> Result<(), ApiError> {
        self.client.delete(&task_path(id)).await
    }

    /// Create pending tasks for every item at or below its minimum stock
    /// that has no pending task yet. Returns only the new tasks.
    #[instrument(skip(self))]
    pub async fn generate_from_low_stock(&self) -> Result<Vec<ShoppingTask>, ApiError> {
        let created: Vec<ShoppingTask> =
            self.client.execute(ApiRequest::post(SHOPPING_GENERATE_PATH)).await?;
        info!(count = created.len(), "Generated shopping tasks from low stock");
        Ok(created)
    }

    /// Mark a task done and add its quantity to the linked (or newly
    /// created) inventory item.
    #[instrument(skip(self, purchase))]
    pub async fn purchase(
        &self,
        id: ResourceId,
        purchase: &PurchaseRequest,
    ) -> Result<PurchaseResponse, ApiError> {
        self.client.post(&format!("{}{}/purchase/", SHOPPING_PATH, id), purchase).await
    }

    /// Purchase several tasks at once. Unknown ids are skipped by the
    /// server, so the result can be shorter than `lines`.
    #[instrument(skip(self, lines), fields(count = lines.len()))]
    pub async fn purchase_batch(
        &self,
        lines: &[BatchPurchaseLine],
    ) -> Result<Vec<BatchPurchaseResult>, ApiError> {
        let response: Results<BatchPurchaseResult> =
            self.client.post(SHOPPING_PURCHASE_BATCH_PATH, &Items { items: lines }).await?;
        Ok(response.results)
    }
}

fn task_path(id: ResourceId) -> String {
    format!("{}{}/", SHOPPING_PATH, id)
}
