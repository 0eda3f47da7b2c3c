//! Cooking: consume ingredients by name and keep a history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ResourceId;
use crate::utils::decimal;

/// Ingredient line of a cook request; matched to inventory by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

impl CookIngredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self { name: name.into(), quantity, unit: unit.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookRequest {
    /// Server defaults to "Cooked" when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<CookIngredient>,
}

/// Per-ingredient outcome. `used` may be less than `quantity` when stock ran
/// short; `item_id` is `None` when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookResult {
    pub name: String,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub item_id: Option<ResourceId>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub used: f64,
}

impl CookResult {
    pub fn fully_covered(&self) -> bool {
        self.item_id.is_some() && self.used >= self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookResponse {
    pub ok: bool,
    pub history_id: ResourceId,
    pub consumed_count: u32,
    pub results: Vec<CookResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookHistoryEntry {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub items: Vec<CookResult>,
    pub created_at: DateTime<Utc>,
}
