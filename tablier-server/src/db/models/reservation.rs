//! Reservation Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::ReservationStatus;
use surrealdb::RecordId;

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub client: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    pub scheduled_at: DateTime<Utc>,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Create reservation payload — the coordinator picks the table
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationCreate {
    pub scheduled_at: DateTime<Utc>,
    pub party_size: i32,
}
