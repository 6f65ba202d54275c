//! Reservation API module
//!
//! | Path | Method | Roles |
//! |------|--------|-------|
//! | /api/reservations | POST | client, server, manager |
//! | /api/reservations | GET | staff |
//! | /api/reservations/{id}/confirm | POST | server, manager |
//! | /api/reservations/{id}/cancel | POST | owner or staff |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_role(&[
            Role::Client,
            Role::Server,
            Role::Manager,
        ])));

    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/confirm", post(handler::confirm))
        .layer(middleware::from_fn(require_role(&[
            Role::Server,
            Role::Manager,
        ])));

    // Ownership is checked in the coordinator
    let cancel_routes = Router::new().route("/{id}/cancel", post(handler::cancel));

    create_routes.merge(staff_routes).merge(cancel_routes)
}
