//! Notification Repository
//!
//! Append + mark-read only. Read acks are separate documents keyed
//! `notification_read:<notification-key>__<user>`, which makes
//! mark-read naturally idempotent (UPSERT on a deterministic id).

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Notification, NotificationView};
use shared::Role;
use std::collections::HashSet;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "notification";
const READ_TABLE: &str = "notification_read";
const LIST_LIMIT: usize = 200;

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        record_id(TABLE, id)
    }

    pub async fn insert(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> =
            self.base.db().create(TABLE).content(notification).await?;
        created.ok_or_else(|| RepoError::Database("Failed to insert notification".to_string()))
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Notification>> {
        let notification: Option<Notification> = self.base.db().select(id.clone()).await?;
        Ok(notification)
    }

    /// Notifications visible to a caller: directed to them, or broadcast
    /// to their role. Most recent first, ids break timestamp ties.
    pub async fn list_for(&self, user_id: &str, role: Role) -> RepoResult<Vec<NotificationView>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM notification \
                 WHERE recipient = $user \
                    OR ((recipient IS NONE OR recipient IS NULL) AND recipient_role = $role) \
                 ORDER BY created_at DESC, id DESC LIMIT $limit",
            )
            .bind(("user", user_id.to_string()))
            .bind(("role", role.as_str()))
            .bind(("limit", LIST_LIMIT))
            .await?;
        let notifications: Vec<Notification> = result.take(0)?;

        let read_ids = self.read_ids_for(user_id).await?;
        Ok(notifications
            .into_iter()
            .map(|n| {
                let read = n
                    .id
                    .as_ref()
                    .map(|id| read_ids.contains(&id.to_string()))
                    .unwrap_or(false);
                NotificationView {
                    notification: n,
                    read,
                }
            })
            .collect())
    }

    async fn read_ids_for(&self, user_id: &str) -> RepoResult<HashSet<String>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE notification FROM notification_read WHERE user = $user")
            .bind(("user", user_id.to_string()))
            .await?;
        let ids: Vec<String> = result.take(0)?;
        Ok(ids.into_iter().collect())
    }

    /// Mark one notification read for a user; idempotent
    pub async fn mark_read(&self, notification: &RecordId, user_id: &str) -> RepoResult<()> {
        let ack_id = Self::ack_id(notification, user_id);
        self.base
            .db()
            .query(
                "UPSERT $ack SET notification = <string> $notification, \
                 user = $user, read_at = time::now()",
            )
            .bind(("ack", ack_id))
            .bind(("notification", notification.clone()))
            .bind(("user", user_id.to_string()))
            .await?
            .check()?;
        Ok(())
    }

    /// Flip every notification addressed to the caller to read, in one
    /// transaction; safe to repeat
    pub async fn mark_all_read(&self, user_id: &str, role: Role) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 FOR $n IN (SELECT VALUE id FROM notification \
                     WHERE recipient = $user \
                        OR ((recipient IS NONE OR recipient IS NULL) \
                            AND recipient_role = $role)) { \
                     UPSERT type::thing('notification_read', \
                         string::concat(record::id($n), '__', $user)) \
                     SET notification = <string> $n, user = $user, read_at = time::now(); \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("user", user_id.to_string()))
            .bind(("role", role.as_str()))
            .await?
            .check()?;
        Ok(())
    }

    fn ack_id(notification: &RecordId, user_id: &str) -> RecordId {
        RecordId::from_table_key(
            READ_TABLE,
            format!("{}__{}", notification.key(), user_id),
        )
    }
}
