//! Order engine
//!
//! The order lifecycle: creation with denormalized items and an
//! immutable total, the chef transitions that draw and finish stock,
//! the server claim-and-serve path, and the manager-gated cancellation
//! flow. Every transition is a compare-and-set; losers get a conflict.

mod engine;
mod views;

pub use engine::OrderEngine;
pub use views::{OrderDetail, OrderView};
