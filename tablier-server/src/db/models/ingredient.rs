//! Ingredient and Restock Models

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Money;
use surrealdb::RecordId;

/// Ingredient entity
///
/// Quantities are grams (or the declared unit); stock arithmetic happens
/// inside SurrealQL transactions, so they are stored as plain numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_unit")]
    pub unit: String,
    /// On-hand quantity, never negative
    pub quantity: f64,
    /// Low-stock notifications fire when quantity crosses below this
    pub alert_threshold: f64,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub low_stock: bool,
    #[serde(default)]
    pub unit_cost: Option<Money>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_unit() -> String {
    "g".to_string()
}

/// Create ingredient payload
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub quantity: f64,
    pub alert_threshold: f64,
    #[serde(default)]
    pub unit_cost: Option<rust_decimal::Decimal>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Restock request payload
#[derive(Debug, Clone, Deserialize)]
pub struct RestockRequest {
    pub quantity: f64,
}

/// Append-only restock log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockLog {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub ingredient: RecordId,
    /// Identity id of the staff member who restocked
    pub restocked_by: String,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
}
