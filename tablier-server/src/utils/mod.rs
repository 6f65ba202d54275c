//! Utility modules

pub mod logger;

// Re-export unified error types from shared
pub use shared::{AppError, AppResult, ErrorCategory, ErrorCode};
