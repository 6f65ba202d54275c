//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::NotificationView;
use crate::utils::AppResult;

/// GET /api/notifications - directed and role-broadcast, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<NotificationView>>> {
    let views = state.notifier.list_for(&user.id, user.role).await?;
    Ok(Json(views))
}

/// POST /api/notifications/{id}/read - idempotent
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.notifier.mark_read(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<StatusCode> {
    state.notifier.mark_all_read(&user.id, user.role).await?;
    Ok(StatusCode::NO_CONTENT)
}
