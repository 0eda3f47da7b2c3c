//! Inventory items, stock adjustments and the dashboard summary

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ResourceId;
use crate::utils::decimal;

/// How strictly an expiry date should be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryType {
    /// Unsafe after the date
    UseBy,
    /// Quality declines after the date
    #[default]
    BestBefore,
}

/// Inventory item as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub container: String,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    pub min_stock: Option<f64>,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub brand: String,
    /// Comma separated, see [`InventoryItem::tag_list`]
    #[serde(default)]
    pub tags: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_type: Option<ExpiryType>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub days_to_expiry: Option<i64>,
    #[serde(default)]
    pub is_low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.split(',').map(str::trim).filter(|t| !t.is_empty()).collect()
    }

    /// Expiry date is strictly before `today`.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d < today)
    }
}

/// Create payload for `items/` and `items/bulk/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub container: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub barcode: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub brand: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_type: Option<ExpiryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl NewInventoryItem {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self { name: name.into(), quantity, unit: unit.into(), ..Self::default() }
    }
}

/// Partial update for `PATCH items/{id}/`; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_type: Option<ExpiryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Filters accepted by `GET items/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryQuery {
    /// Substring match over name, category and location
    pub search: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub container: Option<String>,
    pub unit: Option<String>,
    /// Only items whose expiry date has passed
    pub expired: bool,
    /// Only items expiring within this many days
    pub days_to: Option<u32>,
}

impl InventoryQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let text = [
            ("q", &self.search),
            ("category", &self.category),
            ("location", &self.location),
            ("container", &self.container),
            ("unit", &self.unit),
        ];
        for (key, value) in text {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key.to_string(), v.to_string()));
            }
        }
        if self.expired {
            pairs.push(("expired".to_string(), "true".to_string()));
        }
        if let Some(days) = self.days_to {
            pairs.push(("days_to".to_string(), days.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustAction {
    Consume,
    Add,
    Adjust,
}

/// Body of `items/{id}/adjust/`; `delta` is signed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustRequest {
    pub delta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<AdjustAction>,
}

impl AdjustRequest {
    /// Consume `amount` units (sent as a negative delta).
    pub fn consume(amount: f64) -> Self {
        Self { delta: -amount.abs(), note: None, action: Some(AdjustAction::Consume) }
    }

    pub fn add(amount: f64) -> Self {
        Self { delta: amount.abs(), note: None, action: Some(AdjustAction::Add) }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustResponse {
    #[serde(deserialize_with = "decimal::deserialize")]
    pub quantity: f64,
    pub event_id: ResourceId,
}

/// Row of `items/quick-add/`; the server merges by case-insensitive name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuickAddItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_type: Option<ExpiryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityReason {
    Expiry,
    Empty,
}

/// Entry of the dashboard priority list; lower `score` is more urgent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityItem {
    pub id: ResourceId,
    pub name: String,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    pub days_to_expiry: Option<i64>,
    pub days_to_empty: Option<f64>,
    pub reason: PriorityReason,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryThresholds {
    pub use_by_days: u32,
    pub best_before_days: u32,
}

/// Response of `summary/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub low_stock: Vec<InventoryItem>,
    pub near_expiry: Vec<InventoryItem>,
    pub priority: Vec<PriorityItem>,
    pub expiry_thresholds: ExpiryThresholds,
    pub window_days: u32,
}

impl InventorySummary {
    pub fn most_urgent(&self) -> Option<&PriorityItem> {
        self.priority.iter().min_by(|a, b| a.score.total_cmp(&b.score))
    }
}
