//! Ingredient API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Ingredient, IngredientCreate, RestockRequest};
use crate::db::repository::IngredientRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/ingredients - stock levels
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Ingredient>>> {
    let repo = IngredientRepository::new(state.db.clone());
    let ingredients = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(ingredients))
}

/// POST /api/ingredients - register an ingredient
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<IngredientCreate>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    let repo = IngredientRepository::new(state.db.clone());
    let ingredient = repo.create(payload).await.map_err(AppError::from)?;
    state.catalog.clear();
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// POST /api/ingredients/{id}/restock - add stock and log who did it
pub async fn restock(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<RestockRequest>,
) -> AppResult<Json<Ingredient>> {
    let repo = IngredientRepository::new(state.db.clone());
    let ingredient_id = IngredientRepository::parse_id(&id)?;
    let ingredient = repo
        .restock(&ingredient_id, payload.quantity, &user.id)
        .await
        .map_err(AppError::from)?;
    state.catalog.clear();
    Ok(Json(ingredient))
}
