//! Assistance API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::AssistanceRequest;
use crate::tables::TableCoordinator;
use crate::utils::AppResult;

fn coordinator(state: &ServerState) -> TableCoordinator {
    TableCoordinator::new(state.db.clone(), state.notifier.clone())
}

/// GET /api/assistance - open requests, oldest first
pub async fn list_open(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<AssistanceRequest>>> {
    let requests = coordinator(&state).list_open_assistance(&user).await?;
    Ok(Json(requests))
}

/// POST /api/assistance/{id}/resolve
pub async fn resolve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AssistanceRequest>> {
    let request = coordinator(&state).resolve_assistance(&user, &id).await?;
    Ok(Json(request))
}
