//! Cancellation Request Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::CancellationStatus;
use surrealdb::RecordId;

/// Manager-gated request to cancel an order past `pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationRequest {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// Identity id of the requesting server
    pub requested_by: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub client: Option<RecordId>,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: CancellationStatus,
    pub created_at: DateTime<Utc>,
}
