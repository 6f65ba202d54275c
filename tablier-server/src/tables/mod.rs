//! Table coordinator
//!
//! Seating logic: reservation placement, confirm/cancel, explicit
//! freeing, and assistance requests. Table state only ever moves
//! through compare-and-set, so two concurrent reservations can never
//! land on the same table.

use chrono::Utc;
use shared::{
    AppError, AppResult, AssistanceStatus, ErrorCode, ReservationStatus, Role, TableState,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::db::models::{AssistanceCreate, AssistanceRequest, Reservation, ReservationCreate};
use crate::db::repository::{
    AssistanceRepository, ClientRepository, DiningTableRepository, ReservationRepository,
};
use crate::notify::{NotificationBus, Outgoing};

/// Candidate tables retried per placement before giving up
const PLACEMENT_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct TableCoordinator {
    db: Surreal<Db>,
    tables: DiningTableRepository,
    reservations: ReservationRepository,
    assistance: AssistanceRepository,
    clients: ClientRepository,
    notifier: NotificationBus,
}

impl TableCoordinator {
    pub fn new(db: Surreal<Db>, notifier: NotificationBus) -> Self {
        Self {
            tables: DiningTableRepository::new(db.clone()),
            reservations: ReservationRepository::new(db.clone()),
            assistance: AssistanceRepository::new(db.clone()),
            clients: ClientRepository::new(db.clone()),
            db,
            notifier,
        }
    }

    /// Place a reservation on the smallest free table that fits
    ///
    /// Each candidate is claimed with a `free → reserved` CAS; losing a
    /// race just moves on to the next candidate. A party larger than
    /// any table is a validation error, no free fit is a conflict.
    pub async fn create_reservation(
        &self,
        user: &CurrentUser,
        data: ReservationCreate,
    ) -> AppResult<Reservation> {
        user.require_role(&[Role::Client, Role::Server, Role::Manager])?;
        if data.party_size < 1 {
            return Err(AppError::validation("Party size must be at least 1"));
        }

        let max = self
            .tables
            .max_capacity()
            .await
            .map_err(AppError::from)?
            .unwrap_or(0);
        if data.party_size > max {
            return Err(AppError::validation(format!(
                "No table seats {} (largest is {})",
                data.party_size, max
            )));
        }

        let client = self
            .clients
            .ensure(&user.id, user.email.as_deref(), user.is_guest)
            .await
            .map_err(AppError::from)?;

        for _ in 0..PLACEMENT_ATTEMPTS {
            let candidates = self
                .tables
                .find_free_with_capacity(data.party_size)
                .await
                .map_err(AppError::from)?;
            if candidates.is_empty() {
                break;
            }
            for candidate in candidates {
                let Some(table_id) = candidate.id else {
                    continue;
                };
                let claimed = self
                    .tables
                    .cas_state(&table_id, TableState::Free, TableState::Reserved)
                    .await
                    .map_err(AppError::from)?;
                if claimed.is_none() {
                    continue;
                }
                let reservation = Reservation {
                    id: None,
                    client: client.clone(),
                    table: table_id,
                    scheduled_at: data.scheduled_at,
                    party_size: data.party_size,
                    status: ReservationStatus::Pending,
                    created_at: Utc::now(),
                };
                return self
                    .reservations
                    .create(reservation)
                    .await
                    .map_err(AppError::from);
            }
        }

        Err(AppError::with_message(
            ErrorCode::NoTableAvailable,
            format!("No free table for a party of {}", data.party_size),
        ))
    }

    /// Confirm a pending reservation and seat the party — one transaction
    pub async fn confirm_reservation(
        &self,
        user: &CurrentUser,
        reservation_id: &str,
    ) -> AppResult<Reservation> {
        user.require_role(&[Role::Server, Role::Manager])?;
        let id = ReservationRepository::parse_id(reservation_id)?;
        let reservation = self
            .reservations
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 LET $r = (UPDATE $reservation SET status = 'confirmed' \
                     WHERE status = 'pending' RETURN AFTER); \
                 IF array::len($r) == 0 { THROW 'state-conflict' }; \
                 LET $t = (UPDATE $table SET state = 'occupied' \
                     WHERE state = 'reserved' RETURN AFTER); \
                 IF array::len($t) == 0 { THROW 'table-conflict' }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("reservation", id.clone()))
            .bind(("table", reservation.table.clone()))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        if let Err(e) = result.check() {
            let text = e.to_string();
            if text.contains("state-conflict") {
                return Err(AppError::new(ErrorCode::ReservationNotPending));
            }
            if text.contains("table-conflict") {
                return Err(AppError::with_message(
                    ErrorCode::TableUnavailable,
                    "Table is no longer reserved",
                ));
            }
            return Err(AppError::database(text));
        }

        self.reservations
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))
    }

    /// Cancel a pending reservation; the table goes back to free when no
    /// other pending reservation still holds it
    pub async fn cancel_reservation(
        &self,
        user: &CurrentUser,
        reservation_id: &str,
    ) -> AppResult<Reservation> {
        let id = ReservationRepository::parse_id(reservation_id)?;
        let reservation = self
            .reservations
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

        if !user.is_staff() && reservation.client != ClientRepository::id_for(&user.id) {
            return Err(AppError::forbidden("Not your reservation"));
        }

        let cancelled = self
            .reservations
            .cas_status(&id, ReservationStatus::Pending, ReservationStatus::Cancelled)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::ReservationNotPending))?;

        let still_pending = self
            .reservations
            .count_pending_for_table(&reservation.table)
            .await
            .map_err(AppError::from)?;
        if still_pending == 0 {
            // Best effort: the table may already be occupied by a walk-in
            self.tables
                .cas_state(&reservation.table, TableState::Reserved, TableState::Free)
                .await
                .map_err(AppError::from)?;
        }
        Ok(cancelled)
    }

    pub async fn list_reservations(&self, user: &CurrentUser) -> AppResult<Vec<Reservation>> {
        user.require_staff()?;
        self.reservations.find_all().await.map_err(AppError::from)
    }

    /// Explicitly release an occupied table after the party leaves
    pub async fn free_table(&self, user: &CurrentUser, table_id: &str) -> AppResult<()> {
        user.require_role(&[Role::Server, Role::Manager])?;
        let id = DiningTableRepository::parse_id(table_id)?;
        self.tables
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;
        self.tables
            .cas_state(&id, TableState::Occupied, TableState::Free)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::TableUnavailable, "Table is not occupied")
            })?;
        Ok(())
    }

    /// Tableside call for attention; flags the table and pings the floor
    pub async fn request_assistance(
        &self,
        user: &CurrentUser,
        table_id: &str,
        data: AssistanceCreate,
    ) -> AppResult<AssistanceRequest> {
        user.require_role(&[Role::Client, Role::Guest])?;
        if data.kind.trim().is_empty() {
            return Err(AppError::validation("Assistance type must not be empty"));
        }
        let table = DiningTableRepository::parse_id(table_id)?;
        self.tables
            .find_by_id(&table)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;

        let request = AssistanceRequest {
            id: None,
            table: table.clone(),
            requested_by: user.id.clone(),
            kind: data.kind,
            note: data.note,
            status: AssistanceStatus::Open,
            created_at: Utc::now(),
        };
        let created = self
            .assistance
            .create_with_flag(request)
            .await
            .map_err(AppError::from)?;

        self.notifier
            .push(
                Outgoing::broadcast(
                    Role::Server,
                    "assistance",
                    "Assistance requested",
                    format!("Table {} needs assistance: {}", table.key(), created.kind),
                )
                .high_priority()
                .related_to(table.to_string()),
            )
            .await;
        Ok(created)
    }

    pub async fn list_open_assistance(
        &self,
        user: &CurrentUser,
    ) -> AppResult<Vec<AssistanceRequest>> {
        user.require_staff()?;
        self.assistance.find_open().await.map_err(AppError::from)
    }

    /// Resolve a request; the table flag clears once nothing is open
    pub async fn resolve_assistance(
        &self,
        user: &CurrentUser,
        request_id: &str,
    ) -> AppResult<AssistanceRequest> {
        user.require_role(&[Role::Server, Role::Manager])?;
        let id = AssistanceRepository::parse_id(request_id)?;
        let request = self
            .assistance
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Assistance request not found"))?;

        let resolved = self
            .assistance
            .resolve_cas(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::conflict("Assistance request already resolved"))?;

        let open = self
            .assistance
            .count_open_for_table(&request.table)
            .await
            .map_err(AppError::from)?;
        if open == 0 {
            self.tables
                .set_assistance(&request.table, false)
                .await
                .map_err(AppError::from)?;
        }
        Ok(resolved)
    }
}
