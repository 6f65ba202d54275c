//! Dining Table Repository
//!
//! All state changes go through [`cas_state`]; two reservations can
//! never claim the same table because only one CAS wins.
//!
//! [`cas_state`]: DiningTableRepository::cas_state

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::TableState;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        record_id(TABLE, id)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY name")
            .await?
            .take(0)?;
        Ok(tables)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<DiningTable>> {
        let table: Option<DiningTable> = self.base.db().select(id.clone()).await?;
        Ok(table)
    }

    /// Free tables that fit the party, smallest first
    pub async fn find_free_with_capacity(&self, party_size: i32) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE state = 'free' AND capacity >= $party \
                 ORDER BY capacity ASC, name ASC LIMIT 5",
            )
            .bind(("party", party_size))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Largest capacity across all tables
    pub async fn max_capacity(&self) -> RepoResult<Option<i32>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE capacity FROM dining_table ORDER BY capacity DESC LIMIT 1")
            .await?;
        let capacities: Vec<i32> = result.take(0)?;
        Ok(capacities.into_iter().next())
    }

    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE name = $name LIMIT 1")
            .bind(("name", data.name.clone()))
            .await?;
        let existing: Vec<DiningTable> = result.take(0)?;
        if !existing.is_empty() {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists",
                data.name
            )));
        }

        let table = DiningTable {
            id: None,
            name: data.name,
            capacity: data.capacity,
            state: TableState::Free,
            assistance_needed: false,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    pub async fn update(&self, id: &RecordId, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        let name = data.name.unwrap_or(existing.name);
        let capacity = data.capacity.unwrap_or(existing.capacity);

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET name = $name, capacity = $capacity RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("name", name))
            .bind(("capacity", capacity))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Compare-and-set the table state; returns the table after the
    /// transition, or `None` when the precondition did not hold
    pub async fn cas_state(
        &self,
        id: &RecordId,
        from: TableState,
        to: TableState,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET state = $to WHERE state = $from RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("from", from.as_str()))
            .bind(("to", to.as_str()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    pub async fn set_assistance(&self, id: &RecordId, needed: bool) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET assistance_needed = $needed")
            .bind(("thing", id.clone()))
            .bind(("needed", needed))
            .await?
            .check()?;
        Ok(())
    }
}
