//! Client Model
//!
//! A client document is keyed by the identity-service user id, so
//! ownership checks compare the record key against the caller id.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Client entity (registered diner or anonymous guest)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_guest: bool,
    /// Integer loyalty balance, awarded when an order is served
    #[serde(default)]
    pub fidelity_points: i64,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub restrictions: Vec<String>,
}
