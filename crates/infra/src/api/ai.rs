//! AI helper endpoints under `/api/v1/ai/`
//!
//! Menu plans and parsed items are returned as the server produced them
//! (`serde_json::Value`); their shape follows the model output and is not
//! fixed.

use std::sync::Arc;

use serde_json::Value;
use smartpantry_domain::constants::{
    AI_ASSISTANT_PATH, AI_MENU_PATH, AI_PARSE_ITEMS_IMPORT_PATH, AI_PARSE_ITEMS_PATH,
    AI_SUGGEST_SHOPPING_PATH,
};
use smartpantry_domain::types::{
    AssistantRequest, AssistantResponse, ImportResponse, ImportedItem, MenuRequest,
    ParseItemsRequest, SuggestShoppingRequest, SuggestShoppingResponse,
};
use tracing::{debug, instrument};

use super::client::ApiClient;
use super::errors::ApiError;

/// Menu planning, item parsing and the pantry assistant
pub struct AiApi {
    client: Arc<ApiClient>,
}

impl AiApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Plan meals from the current inventory.
    ///
    /// # Errors
    /// `ApiError::Client` (status 400) without a network call when the
    /// request is out of range.
    #[instrument(skip(self))]
    pub async fn menu(&self, request: &MenuRequest) -> Result<Value, ApiError> {
        request
            .validate()
            .map_err(|e| ApiError::Client { status: 400, message: e.to_string() })?;
        self.client.post(AI_MENU_PATH, request).await
    }

    /// Turn free text into structured item suggestions without saving them.
    #[instrument(skip_all)]
    pub async fn parse_items(&self, text: &str) -> Result<Value, ApiError> {
        self.client.post(AI_PARSE_ITEMS_PATH, &ParseItemsRequest { text: text.to_string() }).await
    }

    /// Parse free text and add the results to the inventory.
    #[instrument(skip_all)]
    pub async fn import_items(&self, text: &str) -> Result<Vec<ImportedItem>, ApiError> {
        let response: ImportResponse = self
            .client
            .post(AI_PARSE_ITEMS_IMPORT_PATH, &ParseItemsRequest { text: text.to_string() })
            .await?;
        debug!(count = response.created.len(), "Imported parsed items");
        Ok(response.created)
    }

    #[instrument(skip(self))]
    pub async fn suggest_shopping(
        &self,
        request: &SuggestShoppingRequest,
    ) -> Result<SuggestShoppingResponse, ApiError> {
        self.client.post(AI_SUGGEST_SHOPPING_PATH, request).await
    }

    /// Free-form instruction ("add eggs to my list"); the server decides on an
    /// action and, with `execute`, carries it out.
    #[instrument(skip_all)]
    pub async fn assistant(&self, request: &AssistantRequest) -> Result<AssistantResponse, ApiError> {
        let response: AssistantResponse = self.client.post(AI_ASSISTANT_PATH, request).await?;
        debug!(action = response.action().unwrap_or("none"), "Assistant responded");
        Ok(response)
    }
}
