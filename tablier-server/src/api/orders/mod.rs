//! Order API module
//!
//! | Path | Method | Roles |
//! |------|--------|-------|
//! | /api/orders | POST | client, guest |
//! | /api/orders | GET | server, chef, manager |
//! | /api/orders/{id} | GET | owner or staff |
//! | /api/orders/{id}/start | POST | chef |
//! | /api/orders/{id}/items/{item}/done | POST | chef |
//! | /api/orders/{id}/finish | POST | chef |
//! | /api/orders/{id}/serve | POST | server |
//! | /api/orders/{id}/cancel | POST | server, client, guest |
//! | /api/orders/{id}/request-cancel | POST | server |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let diner_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_role(&[
            Role::Client,
            Role::Guest,
        ])));

    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_role(&[
            Role::Server,
            Role::Chef,
            Role::Manager,
        ])));

    // Ownership is checked in the engine: diners only see their own
    let detail_routes = Router::new().route("/{id}", get(handler::detail));

    let chef_routes = Router::new()
        .route("/{id}/start", post(handler::start))
        .route("/{id}/items/{item}/done", post(handler::mark_item_done))
        .route("/{id}/finish", post(handler::finish))
        .layer(middleware::from_fn(require_role(&[Role::Chef])));

    let server_routes = Router::new()
        .route("/{id}/serve", post(handler::serve))
        .route("/{id}/request-cancel", post(handler::request_cancel))
        .layer(middleware::from_fn(require_role(&[Role::Server])));

    let cancel_routes = Router::new()
        .route("/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_role(&[
            Role::Server,
            Role::Client,
            Role::Guest,
        ])));

    diner_routes
        .merge(staff_routes)
        .merge(detail_routes)
        .merge(chef_routes)
        .merge(server_routes)
        .merge(cancel_routes)
}
