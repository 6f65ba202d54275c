//! Client Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::Client;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "client";

#[derive(Clone)]
pub struct ClientRepository {
    base: BaseRepository,
}

impl ClientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record id for an identity-service user id
    pub fn id_for(user_id: &str) -> RecordId {
        RecordId::from_table_key(TABLE, user_id)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Client>> {
        let client: Option<Client> = self.base.db().select(id.clone()).await?;
        Ok(client)
    }

    /// Make sure a client document exists for the caller
    ///
    /// Guests get bootstrapped on their first order. UPSERT only touches
    /// the listed fields, so an existing fidelity balance survives.
    pub async fn ensure(
        &self,
        user_id: &str,
        email: Option<&str>,
        is_guest: bool,
    ) -> RepoResult<RecordId> {
        let id = Self::id_for(user_id);
        self.base
            .db()
            .query("UPSERT $client SET is_guest = $is_guest, email = $email")
            .bind(("client", id.clone()))
            .bind(("is_guest", is_guest))
            .bind(("email", email.map(|e| e.to_string())))
            .await?
            .check()?;
        Ok(id)
    }

    /// Atomically add fidelity points
    pub async fn award_fidelity(&self, id: &RecordId, points: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $client SET fidelity_points += $points")
            .bind(("client", id.clone()))
            .bind(("points", points))
            .await?
            .check()?;
        Ok(())
    }
}
