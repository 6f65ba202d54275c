//! Cancellation Request API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::CancellationRequest;
use crate::orders::OrderEngine;
use crate::utils::AppResult;

fn engine(state: &ServerState) -> OrderEngine {
    OrderEngine::new(
        state.db.clone(),
        state.catalog.clone(),
        state.notifier.clone(),
    )
}

/// GET /api/cancellation-requests - pending and settled requests
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CancellationRequest>>> {
    let requests = engine(&state).list_cancel_requests(&user).await?;
    Ok(Json(requests))
}

/// POST /api/cancellation-requests/{id}/approve
pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<CancellationRequest>> {
    let request = engine(&state).approve_cancel(&user, &id).await?;
    Ok(Json(request))
}

/// POST /api/cancellation-requests/{id}/reject
pub async fn reject(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<CancellationRequest>> {
    let request = engine(&state).reject_cancel(&user, &id).await?;
    Ok(Json(request))
}
