//! Shopping list tasks and purchases

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ResourceId;
use crate::utils::decimal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingStatus {
    #[default]
    Pending,
    Done,
}

/// Where a task came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingSource {
    #[default]
    Manual,
    LowStock,
    Plan,
    Ai,
}

impl ShoppingStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

impl ShoppingSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::LowStock => "low_stock",
            Self::Plan => "plan",
            Self::Ai => "ai",
        }
    }
}

impl fmt::Display for ShoppingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ShoppingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shopping task as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingTask {
    pub id: ResourceId,
    /// Linked inventory item, if any
    #[serde(default)]
    pub item: Option<ResourceId>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_category: Option<String>,
    pub name: String,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub status: ShoppingStatus,
    #[serde(default)]
    pub source: ShoppingSource,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl ShoppingTask {
    pub fn is_pending(&self) -> bool {
        self.status == ShoppingStatus::Pending
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewShoppingTask {
    pub name: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ShoppingSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl NewShoppingTask {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self { name: name.into(), quantity, unit: unit.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShoppingTaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ShoppingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Filters accepted by `GET shopping/`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShoppingQuery {
    pub status: Option<ShoppingStatus>,
    pub source: Option<ShoppingSource>,
}

impl ShoppingQuery {
    pub const fn pending() -> Self {
        Self { status: Some(ShoppingStatus::Pending), source: None }
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.to_string()));
        }
        if let Some(source) = self.source {
            pairs.push(("source".to_string(), source.to_string()));
        }
        pairs
    }
}

/// Body of `shopping/{id}/purchase/`. Missing quantity means the task's own
/// quantity; missing expiry is estimated by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PurchaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub ok: bool,
    pub item_id: ResourceId,
    /// Stock level of the item after the purchase
    #[serde(deserialize_with = "decimal::deserialize")]
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPurchaseLine {
    pub id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

impl BatchPurchaseLine {
    pub const fn task(id: ResourceId) -> Self {
        Self { id, quantity: None, expiry_date: None }
    }
}

/// One settled line of `shopping/purchase-batch/`; unknown task ids are
/// skipped by the server and do not appear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPurchaseResult {
    pub task: ResourceId,
    pub item: ResourceId,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub quantity: f64,
}

/// Task count for one source in `shopping/summary/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingSourceCount {
    pub source: ShoppingSource,
    pub count: u32,
}

/// Task counts over the tasks matching a [`ShoppingQuery`].
///
/// The server groups rows that are also ordered by status, so without a
/// status filter one source can appear in several entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingSummary {
    pub by_source: Vec<ShoppingSourceCount>,
    pub total: u32,
}

impl ShoppingSummary {
    /// Tasks from `source`, summed over every entry for it
    pub fn count_for(&self, source: ShoppingSource) -> u32 {
        self.by_source.iter().filter(|entry| entry.source == source).map(|entry| entry.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_task_with_linked_item() {
        let task: ShoppingTask = serde_json::from_str(
            r#"{"id": 9, "item": 3, "item_name": "Milk", "item_category": "dairy",
                "name": "Milk", "quantity": "2.00", "unit": "l", "status": "pending",
                "source": "low_stock", "due_date": null, "created_at": "2024-04-28T09:00:00Z"}"#,
        )
        .unwrap();
        assert!(task.is_pending());
        assert_eq!(task.source, ShoppingSource::LowStock);
        assert_eq!(task.item, Some(3));
    }

    #[test]
    fn parses_unlinked_ai_task() {
        let task: ShoppingTask = serde_json::from_str(
            r#"{"id": 10, "item": null, "item_name": null, "item_category": null,
                "name": "Basil", "quantity": 1, "unit": "pcs", "status": "done",
                "source": "ai", "created_at": "2024-04-28T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.status, ShoppingStatus::Done);
        assert_eq!(task.item_name, None);
    }

    #[test]
    fn query_pairs_use_wire_names() {
        let query = ShoppingQuery { status: Some(ShoppingStatus::Done), source: Some(ShoppingSource::LowStock) };
        assert_eq!(
            query.to_query_pairs(),
            vec![("status".into(), "done".into()), ("source".into(), "low_stock".into())]
        );
        assert!(ShoppingQuery::default().to_query_pairs().is_empty());
    }

    #[test]
    fn batch_line_omits_unset_fields() {
        let json = serde_json::to_value(BatchPurchaseLine::task(4)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 4 }));
    }

    #[test]
    fn summary_sums_repeated_sources() {
        let summary: ShoppingSummary = serde_json::from_str(
            r#"{"by_source": [
                    {"source": "manual", "count": 2},
                    {"source": "low_stock", "count": 1},
                    {"source": "manual", "count": 3}
                ], "total": 6}"#,
        )
        .unwrap();
        assert_eq!(summary.count_for(ShoppingSource::Manual), 5);
        assert_eq!(summary.count_for(ShoppingSource::LowStock), 1);
        assert_eq!(summary.count_for(ShoppingSource::Ai), 0);
        assert_eq!(summary.total, 6);
    }
}
