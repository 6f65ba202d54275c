//! Dish and Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::Role;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, Dish, DishCreate, DishUpdate};
use crate::db::repository::{CategoryRepository, DishRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/dishes - full menu
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Dish>>> {
    let repo = DishRepository::new(state.db.clone());
    let dishes = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(dishes))
}

/// POST /api/dishes - add a dish
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DishCreate>,
) -> AppResult<(StatusCode, Json<Dish>)> {
    let repo = DishRepository::new(state.db.clone());
    let dish = repo.create(payload).await.map_err(AppError::from)?;
    state.catalog.clear();
    Ok((StatusCode::CREATED, Json(dish)))
}

/// Field classes are gated per role; a payload mixing both classes is
/// rejected outright since no single caller holds both roles
fn gate_update(user: &CurrentUser, payload: &DishUpdate) -> AppResult<()> {
    let commercial = payload.touches_commercial_fields();
    let kitchen = payload.touches_kitchen_fields();
    if commercial && kitchen {
        return Err(AppError::validation(
            "Commercial and kitchen fields must be updated in separate requests",
        ));
    }
    if commercial {
        user.require_role(&[Role::Manager])?;
    }
    if kitchen {
        user.require_role(&[Role::Chef])?;
    }
    Ok(())
}

/// PUT /api/dishes/{id} - update, gated per field class
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    gate_update(&user, &payload)?;

    let repo = DishRepository::new(state.db.clone());
    let dish_id = DishRepository::parse_id(&id)?;
    let dish = repo.update(&dish_id, payload).await.map_err(AppError::from)?;
    state.catalog.invalidate(&dish_id);
    Ok(Json(dish))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(categories))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(payload).await.map_err(AppError::from)?;
    state.catalog.clear();
    Ok((StatusCode::CREATED, Json(category)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> CurrentUser {
        CurrentUser {
            id: "u-1".to_string(),
            email: None,
            role,
            is_guest: false,
        }
    }

    fn price_update() -> DishUpdate {
        DishUpdate {
            price: Some("12.00".parse().unwrap()),
            ..DishUpdate::default()
        }
    }

    fn prep_update() -> DishUpdate {
        DishUpdate {
            prep_minutes: Some(15),
            ..DishUpdate::default()
        }
    }

    #[test]
    fn test_manager_updates_commercial_fields() {
        assert!(gate_update(&caller(Role::Manager), &price_update()).is_ok());
        assert!(gate_update(&caller(Role::Chef), &price_update()).is_err());
    }

    #[test]
    fn test_chef_updates_kitchen_fields() {
        assert!(gate_update(&caller(Role::Chef), &prep_update()).is_ok());
        assert!(gate_update(&caller(Role::Manager), &prep_update()).is_err());
    }

    #[test]
    fn test_mixed_payload_is_rejected_for_everyone() {
        let mixed = DishUpdate {
            price: Some("12.00".parse().unwrap()),
            prep_minutes: Some(15),
            ..DishUpdate::default()
        };
        for role in [Role::Manager, Role::Chef] {
            let err = gate_update(&caller(role), &mixed).unwrap_err();
            assert_eq!(err.code, shared::ErrorCode::ValidationFailed);
        }
    }

    #[test]
    fn test_name_only_update_needs_no_extra_gate() {
        let rename = DishUpdate {
            name: Some("Nouvelle salade".to_string()),
            ..DishUpdate::default()
        };
        assert!(gate_update(&caller(Role::Chef), &rename).is_ok());
        assert!(gate_update(&caller(Role::Manager), &rename).is_ok());
    }
}
