//! Dining table API module
//!
//! | Path | Method | Roles |
//! |------|--------|-------|
//! | /api/tables | GET | staff |
//! | /api/tables | POST | manager |
//! | /api/tables/{id} | PUT | manager |
//! | /api/tables/{id}/free | POST | server, manager |
//! | /api/tables/{id}/assistance | POST | client, guest |

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_role(&[
            Role::Server,
            Role::Chef,
            Role::Manager,
        ])));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_role(&[Role::Manager])));

    let floor_routes = Router::new()
        .route("/{id}/free", post(handler::free))
        .layer(middleware::from_fn(require_role(&[
            Role::Server,
            Role::Manager,
        ])));

    let diner_routes = Router::new()
        .route("/{id}/assistance", post(handler::request_assistance))
        .layer(middleware::from_fn(require_role(&[
            Role::Client,
            Role::Guest,
        ])));

    read_routes
        .merge(manage_routes)
        .merge(floor_routes)
        .merge(diner_routes)
}
