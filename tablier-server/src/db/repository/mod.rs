//! Repository Module
//!
//! CRUD and compare-and-set operations per collection. Anything that
//! spans several collections atomically (stock draws, cancellation
//! restore, reservation confirm) is expressed as a single SurrealQL
//! transaction by the owning service.

mod assistance;
mod cancellation;
mod client;
mod dining_table;
mod dish;
mod employee;
mod ingredient;
mod notification;
mod order;
mod reservation;

pub use assistance::AssistanceRepository;
pub use cancellation::CancellationRepository;
pub use client::ClientRepository;
pub use dining_table::DiningTableRepository;
pub use dish::{CategoryRepository, DishRepository};
pub use employee::EmployeeRepository;
pub use ingredient::IngredientRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use reservation::ReservationRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for shared::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => shared::AppError::not_found(msg),
            RepoError::Duplicate(msg) => shared::AppError::conflict(msg),
            RepoError::Validation(msg) => shared::AppError::validation(msg),
            RepoError::Database(msg) => shared::AppError::database(msg),
        }
    }
}

// =============================================================================
// ID convention: ids travel as "table:key" strings on the wire, but bare
// keys are accepted too (paths like /api/orders/{id}). RecordId is the
// only in-process representation.
// =============================================================================

/// Parse a caller-supplied id for a known collection
pub fn record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if let Some((t, key)) = id.split_once(':') {
        if t != table {
            return Err(RepoError::Validation(format!(
                "Expected a {} id, got: {}",
                table, id
            )));
        }
        Ok(RecordId::from_table_key(t, key))
    } else if id.is_empty() {
        Err(RepoError::Validation("Empty id".to_string()))
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Generate a fresh record id for a collection
pub fn new_record_id(table: &str) -> RecordId {
    RecordId::from_table_key(table, uuid::Uuid::new_v4().simple().to_string())
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_both_forms() {
        let full = record_id("order", "order:abc123").unwrap();
        let bare = record_id("order", "abc123").unwrap();
        assert_eq!(full, bare);
        assert_eq!(full.table(), "order");
    }

    #[test]
    fn test_record_id_rejects_foreign_table() {
        assert!(matches!(
            record_id("order", "dish:abc"),
            Err(RepoError::Validation(_))
        ));
    }

    #[test]
    fn test_record_id_rejects_empty() {
        assert!(record_id("order", "").is_err());
    }
}
