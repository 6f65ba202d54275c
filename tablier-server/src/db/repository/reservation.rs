//! Reservation Repository

use super::{BaseRepository, RepoResult, record_id};
use crate::db::models::Reservation;
use shared::ReservationStatus;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        record_id(TABLE, id)
    }

    pub async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let created: Option<Reservation> =
            self.base.db().create(TABLE).content(reservation).await?;
        created.ok_or_else(|| {
            super::RepoError::Database("Failed to create reservation".to_string())
        })
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Reservation>> {
        let reservation: Option<Reservation> = self.base.db().select(id.clone()).await?;
        Ok(reservation)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation ORDER BY scheduled_at")
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Compare-and-set the reservation status
    pub async fn cas_status(
        &self,
        id: &RecordId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> RepoResult<Option<Reservation>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $to WHERE status = $from RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("from", status_str(from)))
            .bind(("to", status_str(to)))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(reservations.into_iter().next())
    }

    /// Number of pending reservations still referencing a table
    pub async fn count_pending_for_table(&self, table: &RecordId) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT VALUE id FROM reservation \
                 WHERE `table` = $table AND status = 'pending'",
            )
            .bind(("table", table.to_string()))
            .await?;
        let ids: Vec<RecordId> = result.take(0)?;
        Ok(ids.len())
    }
}

fn status_str(status: ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Pending => "pending",
        ReservationStatus::Confirmed => "confirmed",
        ReservationStatus::Cancelled => "cancelled",
    }
}
