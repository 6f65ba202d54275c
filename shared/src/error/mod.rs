//! Error handling for the Tablier backend
//!
//! A single [`AppError`] carries a structured [`ErrorCode`]; the wire
//! representation is [`ErrorBody`] with a stable slug taxonomy.

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, AppResult, ErrorBody};
