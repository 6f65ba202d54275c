//! Cancellation request API module
//!
//! All routes are manager-only.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/cancellation-requests | GET |
//! | /api/cancellation-requests/{id}/approve | POST |
//! | /api/cancellation-requests/{id}/reject | POST |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cancellation-requests", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .layer(middleware::from_fn(require_role(&[Role::Manager])))
}
