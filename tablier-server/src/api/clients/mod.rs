//! Client profile API module
//!
//! | Path | Method | Roles |
//! |------|--------|-------|
//! | /api/clients/me | GET | client, guest |

mod handler;

use axum::{Router, middleware, routing::get};
use shared::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clients", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/me", get(handler::me))
        .layer(middleware::from_fn(require_role(&[
            Role::Client,
            Role::Guest,
        ])))
}
