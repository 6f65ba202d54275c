//! Ingredient API module
//!
//! All routes are kitchen/management only.
//!
//! | Path | Method | Roles |
//! |------|--------|-------|
//! | /api/ingredients | GET | chef, manager |
//! | /api/ingredients | POST | chef, manager |
//! | /api/ingredients/{id}/restock | POST | chef, manager |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ingredients", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}/restock", post(handler::restock))
        .layer(middleware::from_fn(require_role(&[
            Role::Chef,
            Role::Manager,
        ])))
}
