//! Notification Models
//!
//! Notifications are append + mark-read only. Read acks live in a
//! separate `notification_read` collection keyed per (notification,
//! user), so role broadcasts stay a single document.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{NotificationPriority, Role};
use surrealdb::RecordId;

/// Notification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Role addressed by this notification
    pub recipient_role: Role,
    /// Directed recipient (identity id); absent means role broadcast
    #[serde(default)]
    pub recipient: Option<String>,
    pub title: String,
    pub message: String,
    /// e.g. "order-ready", "low-stock", "assistance", "cancellation"
    pub kind: String,
    pub priority: NotificationPriority,
    /// Related entity id string, if any
    #[serde(default)]
    pub related: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-(user, notification) read ack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRead {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub notification: RecordId,
    pub user: String,
    pub read_at: DateTime<Utc>,
}

/// Notification as returned to the caller, with the read flag resolved
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub read: bool,
}
