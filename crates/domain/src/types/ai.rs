//! AI assisted endpoints
//!
//! The server forwards most of these to a language model and passes its JSON
//! through, so the free-form parts stay as [`serde_json::Value`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ResourceId;
use crate::utils::decimal;
use crate::{Result, SmartPantryError};

/// Response language for generated text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    #[default]
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuRequest {
    pub days: u8,
    pub meals_per_day: u8,
    pub language: Language,
}

impl MenuRequest {
    /// Ranges accepted by the server.
    pub const DAYS: std::ops::RangeInclusive<u8> = 1..=7;
    pub const MEALS_PER_DAY: std::ops::RangeInclusive<u8> = 1..=5;

    /// # Errors
    /// Returns `SmartPantryError::InvalidInput` when a field is out of range.
    pub fn validate(&self) -> Result<()> {
        if !Self::DAYS.contains(&self.days) {
            return Err(SmartPantryError::InvalidInput(format!("days must be 1-7, got {}", self.days)));
        }
        if !Self::MEALS_PER_DAY.contains(&self.meals_per_day) {
            return Err(SmartPantryError::InvalidInput(format!(
                "meals_per_day must be 1-5, got {}",
                self.meals_per_day
            )));
        }
        Ok(())
    }
}

impl Default for MenuRequest {
    fn default() -> Self {
        Self { days: 1, meals_per_day: 2, language: Language::En }
    }
}

/// Free text such as "2 bottles of milk, a dozen eggs"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseItemsRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedItem {
    pub id: ResourceId,
    pub name: String,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

/// Response of `parse-items-import/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub created: Vec<ImportedItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuggestShoppingRequest {
    /// 1-14
    pub days: u8,
    pub language: Language,
    /// Also create shopping tasks for the suggestions
    pub create: bool,
}

impl Default for SuggestShoppingRequest {
    fn default() -> Self {
        Self { days: 3, language: Language::En, create: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestShoppingResponse {
    #[serde(default)]
    pub suggestions: Vec<Value>,
    /// Ids of tasks created when `create` was set
    #[serde(default)]
    pub created: Vec<ResourceId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantRequest {
    pub message: String,
    pub language: Language,
    /// Let the server act on its decision
    pub execute: bool,
}

impl AssistantRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), language: Language::default(), execute: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantOutcome {
    #[serde(default)]
    pub created_shopping: u32,
    #[serde(default)]
    pub imported: u32,
    #[serde(default)]
    pub details: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    /// Model decision, e.g. `{"action": "add_shopping", "items": [...]}`
    pub decision: Value,
    #[serde(default)]
    pub result: AssistantOutcome,
}

impl AssistantResponse {
    pub fn action(&self) -> Option<&str> {
        self.decision.get("action").and_then(Value::as_str)
    }
}
