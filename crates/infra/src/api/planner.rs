//! Cooking: consume recipe ingredients from stock and browse past meals

use std::sync::Arc;

use smartpantry_domain::constants::{COOK_HISTORY_PATH, COOK_PATH};
use smartpantry_domain::types::{CookHistoryEntry, CookRequest, CookResponse, ResourceId};
use tracing::{info, instrument};

use super::client::ApiClient;
use super::errors::ApiError;

/// Cooking against stock and the cook history
pub struct PlannerApi {
    client: Arc<ApiClient>,
}

impl PlannerApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Deduct each ingredient from the best-matching item and record a
    /// history entry. Ingredients with no matching item come back with
    /// `item_id: None` and nothing used.
    #[instrument(skip(self, request), fields(ingredients = request.items.len()))]
    pub async fn cook(&self, request: &CookRequest) -> Result<CookResponse, ApiError> {
        let response: CookResponse = self.client.post(COOK_PATH, request).await?;
        info!(
            history_id = response.history_id,
            consumed = response.consumed_count,
            "Recorded cooked meal"
        );
        Ok(response)
    }

    /// Past meals, newest first.
    pub async fn history(&self) -> Result<Vec<CookHistoryEntry>, ApiError> {
        self.client.get(COOK_HISTORY_PATH).await
    }

    #[instrument(skip(self))]
    pub async fn delete_history(&self, id: ResourceId) -> Result<(), ApiError> {
        self.client.delete(&format!("{}{}/", COOK_HISTORY_PATH, id)).await
    }
}
