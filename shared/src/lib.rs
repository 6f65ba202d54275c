//! Shared types for the Tablier restaurant backend.
//!
//! This crate holds everything both the server and its tooling need to
//! agree on: error codes and the wire error body, the domain state
//! enums (with their boundary synonym translation), and minor-unit
//! money arithmetic.

pub mod error;
pub mod money;
pub mod types;

pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use money::Money;
pub use types::{
    AssistanceStatus, CancellationStatus, NotificationPriority, OrderState, PrepStatus,
    ReservationStatus, Role, TableState,
};
