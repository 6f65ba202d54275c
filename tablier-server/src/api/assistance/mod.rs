//! Assistance queue API module
//!
//! Creation lives under /api/tables/{id}/assistance; this area is the
//! staff-facing queue.
//!
//! | Path | Method | Roles |
//! |------|--------|-------|
//! | /api/assistance | GET | staff |
//! | /api/assistance/{id}/resolve | POST | server, manager |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/assistance", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_open))
        .layer(middleware::from_fn(require_role(&[
            Role::Server,
            Role::Chef,
            Role::Manager,
        ])));

    let resolve_routes = Router::new()
        .route("/{id}/resolve", post(handler::resolve))
        .layer(middleware::from_fn(require_role(&[
            Role::Server,
            Role::Manager,
        ])));

    read_routes.merge(resolve_routes)
}
