//! Response shapes for the order endpoints

use serde::Serialize;

use crate::db::models::{Client, DiningTable, Order, OrderItem};

/// Order with its items, as returned by create/list detail paths
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Full order detail: related documents fetched in a handful of point
/// reads instead of per-field round trips
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<DiningTable>,
    /// Identity id of the claiming server, if the order is claimed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}
