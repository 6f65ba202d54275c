//! Assistance Request Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::AssistanceRequest;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "assistance_request";

#[derive(Clone)]
pub struct AssistanceRepository {
    base: BaseRepository,
}

impl AssistanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        record_id(TABLE, id)
    }

    /// Create the request and flag the table in one transaction
    pub async fn create_with_flag(
        &self,
        request: AssistanceRequest,
    ) -> RepoResult<AssistanceRequest> {
        let table = request.table.clone();
        let id = super::new_record_id(TABLE);
        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 CREATE $aid CONTENT $request; \
                 UPDATE $table SET assistance_needed = true; \
                 COMMIT TRANSACTION;",
            )
            .bind(("aid", id.clone()))
            .bind(("request", request))
            .bind(("table", table))
            .await?
            .check()?;

        let created: Option<AssistanceRequest> = self.base.db().select(id).await?;
        created
            .ok_or_else(|| RepoError::Database("Failed to create assistance request".to_string()))
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<AssistanceRequest>> {
        let request: Option<AssistanceRequest> = self.base.db().select(id.clone()).await?;
        Ok(request)
    }

    /// Open and in-progress requests, oldest first
    pub async fn find_open(&self) -> RepoResult<Vec<AssistanceRequest>> {
        let requests: Vec<AssistanceRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM assistance_request \
                 WHERE status != 'resolved' ORDER BY created_at ASC",
            )
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Compare-and-set to resolved; `None` when already resolved
    pub async fn resolve_cas(&self, id: &RecordId) -> RepoResult<Option<AssistanceRequest>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = 'resolved' \
                 WHERE status != 'resolved' RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .await?;
        let requests: Vec<AssistanceRequest> = result.take(0)?;
        Ok(requests.into_iter().next())
    }

    /// Unresolved requests still pointing at a table
    pub async fn count_open_for_table(&self, table: &RecordId) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT VALUE id FROM assistance_request \
                 WHERE `table` = $table AND status != 'resolved'",
            )
            .bind(("table", table.to_string()))
            .await?;
        let ids: Vec<RecordId> = result.take(0)?;
        Ok(ids.len())
    }
}
