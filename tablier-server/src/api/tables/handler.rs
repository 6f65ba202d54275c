//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    AssistanceCreate, AssistanceRequest, DiningTable, DiningTableCreate, DiningTableUpdate,
};
use crate::db::repository::DiningTableRepository;
use crate::tables::TableCoordinator;
use crate::utils::{AppError, AppResult};

fn coordinator(state: &ServerState) -> TableCoordinator {
    TableCoordinator::new(state.db.clone(), state.notifier.clone())
}

/// GET /api/tables - floor overview
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let tables = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(tables))
}

/// POST /api/tables - add a table
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<(StatusCode, Json<DiningTable>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.create(payload).await.map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// PUT /api/tables/{id} - rename or resize
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let repo = DiningTableRepository::new(state.db.clone());
    let table_id = DiningTableRepository::parse_id(&id)?;
    let table = repo.update(&table_id, payload).await.map_err(AppError::from)?;
    Ok(Json(table))
}

/// POST /api/tables/{id}/free - release after the party leaves
pub async fn free(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    coordinator(&state).free_table(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/tables/{id}/assistance - tableside call for attention
pub async fn request_assistance(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AssistanceCreate>,
) -> AppResult<(StatusCode, Json<AssistanceRequest>)> {
    let request = coordinator(&state)
        .request_assistance(&user, &id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}
