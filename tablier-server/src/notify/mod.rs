//! Notification bus
//!
//! Persists notifications and resolves per-user read state. Delivery is
//! best-effort: a failed push is logged and swallowed so the operation
//! that triggered it still commits its own result to the caller.

use chrono::Utc;
use shared::{AppError, AppResult, NotificationPriority, Role};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Notification, NotificationView};
use crate::db::repository::NotificationRepository;

/// A notification about to be pushed
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub recipient_role: Role,
    pub recipient: Option<String>,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub priority: NotificationPriority,
    pub related: Option<String>,
}

impl Outgoing {
    /// Broadcast to everyone holding a role
    pub fn broadcast(role: Role, kind: &str, title: &str, message: impl Into<String>) -> Self {
        Self {
            recipient_role: role,
            recipient: None,
            title: title.to_string(),
            message: message.into(),
            kind: kind.to_string(),
            priority: NotificationPriority::Normal,
            related: None,
        }
    }

    /// Directed to a single user
    pub fn directed(
        role: Role,
        user_id: &str,
        kind: &str,
        title: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient: Some(user_id.to_string()),
            ..Self::broadcast(role, kind, title, message)
        }
    }

    pub fn high_priority(mut self) -> Self {
        self.priority = NotificationPriority::High;
        self
    }

    pub fn related_to(mut self, id: impl Into<String>) -> Self {
        self.related = Some(id.into());
        self
    }
}

#[derive(Clone)]
pub struct NotificationBus {
    repo: NotificationRepository,
}

impl NotificationBus {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: NotificationRepository::new(db),
        }
    }

    /// Persist a notification; never fails the calling operation
    pub async fn push(&self, outgoing: Outgoing) {
        let notification = Notification {
            id: None,
            recipient_role: outgoing.recipient_role,
            recipient: outgoing.recipient,
            title: outgoing.title,
            message: outgoing.message,
            kind: outgoing.kind,
            priority: outgoing.priority,
            related: outgoing.related,
            created_at: Utc::now(),
        };
        if let Err(err) = self.repo.insert(notification).await {
            tracing::warn!("Failed to push notification: {}", err);
        }
    }

    pub async fn list_for(&self, user_id: &str, role: Role) -> AppResult<Vec<NotificationView>> {
        self.repo
            .list_for(user_id, role)
            .await
            .map_err(AppError::from)
    }

    /// Mark one notification read; repeat calls are no-ops
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let id = NotificationRepository::parse_id(notification_id)?;
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;
        self.repo.mark_read(&id, user_id).await?;
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: &str, role: Role) -> AppResult<()> {
        self.repo.mark_all_read(user_id, role).await?;
        Ok(())
    }

    /// Unread count for a caller, derived from the resolved views
    pub async fn unread_count(&self, user_id: &str, role: Role) -> AppResult<usize> {
        let views = self.list_for(user_id, role).await?;
        Ok(views.iter().filter(|v| !v.read).count())
    }
}
