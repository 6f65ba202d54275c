//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CancelRequestBody, CancellationRequest, Order, OrderCreate, OrderItem};
use crate::orders::{OrderDetail, OrderEngine, OrderView};
use crate::utils::AppResult;

fn engine(state: &ServerState) -> OrderEngine {
    OrderEngine::new(
        state.db.clone(),
        state.catalog.clone(),
        state.notifier.clone(),
    )
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    /// Canonical or synonym state spelling
    pub status: Option<String>,
}

/// POST /api/orders - place an order
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<OrderView>)> {
    let view = engine(&state).create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/orders?status= - staff listing
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = engine(&state).list(&user, query.status.as_deref()).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - full detail
pub async fn detail(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let detail = engine(&state).detail(&user, &id).await?;
    Ok(Json(detail))
}

/// POST /api/orders/{id}/start - chef starts preparation
pub async fn start(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).start(&user, &id).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/items/{item}/done - chef plates one item
pub async fn mark_item_done(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, item)): Path<(String, String)>,
) -> AppResult<Json<OrderItem>> {
    let item = engine(&state).mark_item_done(&user, &id, &item).await?;
    Ok(Json(item))
}

/// POST /api/orders/{id}/finish - chef marks the order ready
pub async fn finish(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).finish(&user, &id).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/serve - server serves a ready order
pub async fn serve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).serve(&user, &id).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/cancel - direct cancellation from pending
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = engine(&state).cancel_direct(&user, &id).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/request-cancel - escalate to the managers
pub async fn request_cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    payload: Option<Json<CancelRequestBody>>,
) -> AppResult<(StatusCode, Json<CancellationRequest>)> {
    let body = payload.map(|Json(b)| b).unwrap_or_default();
    let request = engine(&state).request_cancel(&user, &id, body).await?;
    Ok((StatusCode::CREATED, Json(request)))
}
