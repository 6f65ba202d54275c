//! Cancellation Request Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::CancellationRequest;
use shared::CancellationStatus;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "cancellation_request";

#[derive(Clone)]
pub struct CancellationRepository {
    base: BaseRepository,
}

impl CancellationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        record_id(TABLE, id)
    }

    pub async fn create(&self, request: CancellationRequest) -> RepoResult<CancellationRequest> {
        let created: Option<CancellationRequest> =
            self.base.db().create(TABLE).content(request).await?;
        created.ok_or_else(|| {
            RepoError::Database("Failed to create cancellation request".to_string())
        })
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<CancellationRequest>> {
        let request: Option<CancellationRequest> = self.base.db().select(id.clone()).await?;
        Ok(request)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<CancellationRequest>> {
        let requests: Vec<CancellationRequest> = self
            .base
            .db()
            .query("SELECT * FROM cancellation_request ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// A still-pending request for an order, if one exists
    pub async fn find_pending_for_order(
        &self,
        order: &RecordId,
    ) -> RepoResult<Option<CancellationRequest>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM cancellation_request \
                 WHERE `order` = $order AND status = 'pending' LIMIT 1",
            )
            .bind(("order", order.to_string()))
            .await?;
        let requests: Vec<CancellationRequest> = result.take(0)?;
        Ok(requests.into_iter().next())
    }

    /// Compare-and-set `pending → approved|rejected`
    pub async fn cas_status(
        &self,
        id: &RecordId,
        to: CancellationStatus,
    ) -> RepoResult<Option<CancellationRequest>> {
        let to = match to {
            CancellationStatus::Approved => "approved",
            CancellationStatus::Rejected => "rejected",
            CancellationStatus::Pending => {
                return Err(RepoError::Validation(
                    "Cannot move a request back to pending".to_string(),
                ));
            }
        };
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $to WHERE status = 'pending' RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("to", to))
            .await?;
        let requests: Vec<CancellationRequest> = result.take(0)?;
        Ok(requests.into_iter().next())
    }
}
