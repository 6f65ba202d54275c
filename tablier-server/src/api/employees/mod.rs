//! Employee API module
//!
//! Manager-only. Role is fixed at hire; updates only move the salary.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/employees | GET |
//! | /api/employees | POST |
//! | /api/employees/{id} | PUT |

mod handler;

use axum::{Router, middleware, routing::get, routing::put};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_role(&[Role::Manager])))
}
