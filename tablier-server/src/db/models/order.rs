//! Order Models
//!
//! The order owns its items; deleting an order deletes them. The state
//! field is only ever mutated through compare-and-set statements.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Money, OrderState, PrepStatus};
use surrealdb::RecordId;

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub client: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub table: Option<RecordId>,
    pub state: OrderState,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub confirmed: bool,
    /// Σ unit_price × quantity in minor units, fixed at creation
    pub total: Money,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Order item entity
///
/// Dish name and unit price are denormalized at creation so the item
/// list stays stable when the catalog changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub dish: RecordId,
    pub dish_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub prep_status: PrepStatus,
}

/// Server-to-order claim; at most one per order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerOrder {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Identity id of the claiming server
    pub server: String,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    pub created_at: DateTime<Utc>,
}

/// One ingredient deduction inside a draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawLine {
    #[serde(with = "serde_helpers::record_id")]
    pub ingredient: RecordId,
    pub name: String,
    pub grams: f64,
}

/// Stock drawn for an order when preparation started
///
/// `restored` flips when an approved cancellation compensates the draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDraw {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    pub lines: Vec<DrawLine>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub restored: bool,
    pub created_at: DateTime<Utc>,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemRequest>,
    /// Table id string; present for tableside orders
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One requested line in a create payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    /// Dish id string
    pub dish: String,
    pub quantity: i64,
}

/// Cancellation request payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelRequestBody {
    #[serde(default)]
    pub reason: Option<String>,
}
