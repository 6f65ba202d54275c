//! Notification API module
//!
//! Every authenticated caller sees their own feed; no role layer.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/notifications | GET |
//! | /api/notifications/{id}/read | POST |
//! | /api/notifications/read-all | POST |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/read", post(handler::mark_read))
        .route("/read-all", post(handler::mark_all_read))
}
