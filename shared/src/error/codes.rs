//! Unified error codes for the Tablier backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 7xxx: Table and reservation errors
//! - 8xxx: Employee errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Lost-update or state conflict
    Conflict = 4,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// A specific role is required
    RoleRequired = 2002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Transition not allowed from the current order state
    InvalidTransition = 4002,
    /// Order has no items
    EmptyOrder = 4003,
    /// Ingredient stock cannot cover the draw
    InsufficientStock = 4004,
    /// Cancellation request is not pending
    CancellationNotPending = 4005,
    /// Order is already claimed by another server
    OrderClaimed = 4006,

    // ==================== 6xxx: Catalog ====================
    /// Dish not found
    DishNotFound = 6001,
    /// Ingredient not found
    IngredientNotFound = 6002,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is not in the required state
    TableUnavailable = 7002,
    /// No free table fits the party
    NoTableAvailable = 7003,
    /// Reservation not found
    ReservationNotFound = 7004,
    /// Reservation is not pending
    ReservationNotPending = 7005,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Document store error
    DatabaseError = 9002,
    /// Identity service or document store unavailable
    UpstreamUnavailable = 9003,
    /// Request deadline exceeded before commit
    Timeout = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Wire slug for the error body (`{"error": "<slug>", ...}`)
    ///
    /// Slugs form the stable error taxonomy clients switch on; codes
    /// stay finer-grained for diagnostics.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ValidationFailed | Self::EmptyOrder => "validation",
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => "unauthenticated",
            Self::PermissionDenied | Self::RoleRequired => "forbidden",
            Self::NotFound
            | Self::OrderNotFound
            | Self::DishNotFound
            | Self::IngredientNotFound
            | Self::TableNotFound
            | Self::ReservationNotFound
            | Self::EmployeeNotFound => "not-found",
            Self::Conflict
            | Self::InvalidTransition
            | Self::CancellationNotPending
            | Self::OrderClaimed
            | Self::TableUnavailable
            | Self::NoTableAvailable
            | Self::ReservationNotPending => "conflict",
            Self::InsufficientStock => "insufficient-stock",
            Self::UpstreamUnavailable => "upstream-unavailable",
            Self::Timeout => "timeout",
            Self::Unknown | Self::InternalError | Self::DatabaseError => "internal",
        }
    }

    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflicting update, retry",
            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid credentials",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Token is invalid",
            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Role not allowed for this operation",
            Self::OrderNotFound => "Order not found",
            Self::InvalidTransition => "Order state does not allow this transition",
            Self::EmptyOrder => "Order must contain at least one item",
            Self::InsufficientStock => "Insufficient ingredient stock",
            Self::CancellationNotPending => "Cancellation request already settled",
            Self::OrderClaimed => "Order is claimed by another server",
            Self::DishNotFound => "Dish not found",
            Self::IngredientNotFound => "Ingredient not found",
            Self::TableNotFound => "Table not found",
            Self::TableUnavailable => "Table is not in the required state",
            Self::NoTableAvailable => "No free table fits the party",
            Self::ReservationNotFound => "Reservation not found",
            Self::ReservationNotPending => "Reservation is not pending",
            Self::EmployeeNotFound => "Employee not found",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Document store error",
            Self::UpstreamUnavailable => "Upstream service unavailable",
            Self::Timeout => "Request deadline exceeded",
        }
    }

    /// HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self.slug() {
            "validation" => StatusCode::BAD_REQUEST,
            "unauthenticated" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "not-found" => StatusCode::NOT_FOUND,
            // insufficient-stock shares 409 with conflict per API contract
            "conflict" | "insufficient-stock" => StatusCode::CONFLICT,
            "upstream-unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            "timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::Conflict),
            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::RoleRequired),
            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::InvalidTransition),
            4003 => Ok(Self::EmptyOrder),
            4004 => Ok(Self::InsufficientStock),
            4005 => Ok(Self::CancellationNotPending),
            4006 => Ok(Self::OrderClaimed),
            6001 => Ok(Self::DishNotFound),
            6002 => Ok(Self::IngredientNotFound),
            7001 => Ok(Self::TableNotFound),
            7002 => Ok(Self::TableUnavailable),
            7003 => Ok(Self::NoTableAvailable),
            7004 => Ok(Self::ReservationNotFound),
            7005 => Ok(Self::ReservationNotPending),
            8001 => Ok(Self::EmployeeNotFound),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::UpstreamUnavailable),
            9004 => Ok(Self::Timeout),
            _ => Err(format!("Unknown error code: {}", value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.slug(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::InvalidTransition,
            ErrorCode::InsufficientStock,
            ErrorCode::NoTableAvailable,
            ErrorCode::Timeout,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()).unwrap(), code);
        }
        assert!(ErrorCode::try_from(12345).is_err());
    }

    #[test]
    fn test_slugs_match_taxonomy() {
        assert_eq!(ErrorCode::ValidationFailed.slug(), "validation");
        assert_eq!(ErrorCode::TokenExpired.slug(), "unauthenticated");
        assert_eq!(ErrorCode::RoleRequired.slug(), "forbidden");
        assert_eq!(ErrorCode::OrderNotFound.slug(), "not-found");
        assert_eq!(ErrorCode::InvalidTransition.slug(), "conflict");
        assert_eq!(ErrorCode::InsufficientStock.slug(), "insufficient-stock");
        assert_eq!(ErrorCode::UpstreamUnavailable.slug(), "upstream-unavailable");
        assert_eq!(ErrorCode::Timeout.slug(), "timeout");
        assert_eq!(ErrorCode::DatabaseError.slug(), "internal");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::EmptyOrder.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::DishNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InsufficientStock.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::UpstreamUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
