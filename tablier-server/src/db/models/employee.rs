//! Employee Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Money, Role};
use surrealdb::RecordId;

/// Employee entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Immutable after creation
    pub role: Role,
    /// Monthly salary in minor units
    pub salary: Money,
    pub hired_at: DateTime<Utc>,
    /// Identity-service user id this employee signs in with
    pub identity_id: String,
}

/// Create employee payload (manager only)
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub role: Role,
    /// Decimal at the boundary, stored in minor units
    pub salary: rust_decimal::Decimal,
    pub identity_id: String,
}

/// Update employee payload — only the salary is mutable
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeUpdate {
    pub salary: rust_decimal::Decimal,
}
