//! Client Profile API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Client;
use crate::db::repository::ClientRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/clients/me - the caller's own profile, bootstrapped on
/// first access
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Client>> {
    let repo = ClientRepository::new(state.db.clone());
    let id = repo
        .ensure(&user.id, user.email.as_deref(), user.is_guest)
        .await
        .map_err(AppError::from)?;
    let client = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Client profile not found"))?;
    Ok(Json(client))
}
