//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::TableState;
use surrealdb::RecordId;
use validator::Validate;

/// Dining table entity
///
/// State is mutated exclusively by the table coordinator via
/// compare-and-set; never deleted in normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub capacity: i32,
    pub state: TableState,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub assistance_needed: bool,
}

/// Create dining table payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DiningTableUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}
