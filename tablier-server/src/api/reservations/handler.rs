//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationCreate};
use crate::tables::TableCoordinator;
use crate::utils::AppResult;

fn coordinator(state: &ServerState) -> TableCoordinator {
    TableCoordinator::new(state.db.clone(), state.notifier.clone())
}

/// POST /api/reservations - place on the smallest free fitting table
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = coordinator(&state).create_reservation(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /api/reservations - staff listing
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = coordinator(&state).list_reservations(&user).await?;
    Ok(Json(reservations))
}

/// POST /api/reservations/{id}/confirm - seat the party
pub async fn confirm(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let reservation = coordinator(&state).confirm_reservation(&user, &id).await?;
    Ok(Json(reservation))
}

/// POST /api/reservations/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let reservation = coordinator(&state).cancel_reservation(&user, &id).await?;
    Ok(Json(reservation))
}
