//! API route modules
//!
//! # Structure
//!
//! - [`health`] - public health probe
//! - [`orders`] - order lifecycle
//! - [`cancellations`] - manager-gated cancellation requests
//! - [`reservations`] - reservation placement and lifecycle
//! - [`tables`] - dining tables, walk-in freeing, assistance calls
//! - [`assistance`] - open assistance queue
//! - [`notifications`] - notification feed and read acks
//! - [`dishes`] - dish and category catalog
//! - [`ingredients`] - ingredient stock and restock
//! - [`employees`] - staff records
//! - [`clients`] - caller's own client profile

pub mod assistance;
pub mod cancellations;
pub mod clients;
pub mod dishes;
pub mod employees;
pub mod health;
pub mod ingredients;
pub mod notifications;
pub mod orders;
pub mod reservations;
pub mod tables;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware as axum_middleware;
use axum::middleware::Next;
use axum::response::Response;
use http::{HeaderName, HeaderValue};
use shared::AppError;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth;
use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Per-request deadline; a request that blows it gets a 504 before the
/// client gives up on its own
async fn enforce_deadline(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let deadline = Duration::from_millis(state.config.request_timeout_ms);
    match tokio::time::timeout(deadline, next.run(req)).await {
        Ok(response) => Ok(response),
        Err(_) => Err(AppError::timeout()),
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(cancellations::router())
        .merge(reservations::router())
        .merge(tables::router())
        .merge(assistance::router())
        .merge(notifications::router())
        .merge(dishes::router())
        .merge(ingredients::router())
        .merge(employees::router())
        .merge(clients::router())
}

/// Build the fully configured application with all middleware
pub fn build_app(state: ServerState) -> Router<ServerState> {
    build_router()
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - gzip responses
        .layer(CompressionLayer::new())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate and propagate x-request-id
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        // Deadline - outermost, covers the whole pipeline
        .layer(axum_middleware::from_fn_with_state(state, enforce_deadline))
}
