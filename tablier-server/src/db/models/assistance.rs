//! Assistance Request Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::AssistanceStatus;
use surrealdb::RecordId;

/// Tableside call for staff attention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistanceRequest {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    /// Identity id of the caller
    pub requested_by: String,
    pub kind: String,
    #[serde(default)]
    pub note: Option<String>,
    pub status: AssistanceStatus,
    pub created_at: DateTime<Utc>,
}

/// Create assistance request payload
#[derive(Debug, Clone, Deserialize)]
pub struct AssistanceCreate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub note: Option<String>,
}
