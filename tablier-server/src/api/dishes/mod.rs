//! Dish and category API module
//!
//! | Path | Method | Roles |
//! |------|--------|-------|
//! | /api/dishes | GET | any authenticated |
//! | /api/dishes | POST | chef, manager |
//! | /api/dishes/{id} | PUT | chef, manager (field-gated) |
//! | /api/categories | GET | any authenticated |
//! | /api/categories | POST | manager |
//!
//! Dish updates are gated per field class: price and classification
//! require manager, recipe and prep fields require chef.

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let dish_read = Router::new().route("/api/dishes", get(handler::list));

    let dish_write = Router::new()
        .route("/api/dishes", post(handler::create))
        .route("/api/dishes/{id}", put(handler::update))
        .layer(middleware::from_fn(require_role(&[
            Role::Chef,
            Role::Manager,
        ])));

    let category_read = Router::new().route("/api/categories", get(handler::list_categories));

    let category_write = Router::new()
        .route("/api/categories", post(handler::create_category))
        .layer(middleware::from_fn(require_role(&[Role::Manager])));

    dish_read
        .merge(dish_write)
        .merge(category_read)
        .merge(category_write)
}
