//! Tablier Server - restaurant coordination backend
//!
//! Embedded-store backend for the multi-role restaurant apps: diners
//! place and follow orders, the kitchen draws stock and cooks, the
//! floor seats and serves, managers arbitrate cancellations.
//!
//! # Module structure
//!
//! ```text
//! tablier-server/src/
//! ├── core/       # config, shared state, server lifecycle
//! ├── auth/       # token verification, role guards
//! ├── api/        # HTTP routes and handlers
//! ├── catalog/    # dish/category read model with cache
//! ├── orders/     # order state machine
//! ├── stock/      # ingredient draws and restores
//! ├── tables/     # seating, reservations, assistance
//! ├── notify/     # notification bus
//! ├── db/         # embedded SurrealDB models and repositories
//! └── utils/      # logging
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod stock;
pub mod tables;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, IdentityService, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderEngine;
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events under the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
    ($level:expr, $event:expr) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
        );
    };
}
