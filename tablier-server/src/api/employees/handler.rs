//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};
use crate::db::repository::EmployeeRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/employees
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Employee>>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employees = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(employees))
}

/// POST /api/employees - hire
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.create(payload).await.map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/employees/{id} - salary only, the role never changes
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.update(&id, payload).await.map_err(AppError::from)?;
    Ok(Json(employee))
}
