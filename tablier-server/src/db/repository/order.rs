//! Order Repository
//!
//! Orders own their items: creation writes both in one transaction, and
//! every state change is a compare-and-set on `order.state`, so
//! concurrent transitions on the same order are linearizable and losers
//! observe the already-changed state.

use super::{BaseRepository, RepoError, RepoResult, new_record_id, record_id};
use crate::db::models::{Order, OrderItem, ServerOrder};
use chrono::Utc;
use shared::{OrderState, PrepStatus};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "order";
const ITEM_TABLE: &str = "order_item";
const LINK_TABLE: &str = "server_order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        record_id(TABLE, id)
    }

    /// Persist an order together with its items atomically
    ///
    /// The order id is generated up front so the items can reference it
    /// inside the same transaction. When the order is bound to a table,
    /// the table is checked and a free one claimed in that same
    /// transaction, so a failed order write never strands a table.
    pub async fn create_with_items(
        &self,
        mut order: Order,
        mut items: Vec<OrderItem>,
    ) -> RepoResult<Order> {
        let order_id = new_record_id(TABLE);
        let table = order.table.clone();
        order.id = None;
        for item in &mut items {
            item.id = None;
            item.order = order_id.clone();
        }

        let mut statements = String::from("BEGIN TRANSACTION; ");
        if table.is_some() {
            // A reserved or already-occupied table still takes orders
            // from the seated party, so only `free` changes state
            statements.push_str(
                "LET $t = (SELECT VALUE id FROM $table_id); \
                 IF array::len($t) == 0 { THROW 'table-missing' }; \
                 UPDATE $table_id SET state = 'occupied' WHERE state = 'free'; ",
            );
        }
        statements.push_str("CREATE $order_id CONTENT $order; ");
        for idx in 0..items.len() {
            statements.push_str(&format!("CREATE order_item CONTENT $item_{idx}; "));
        }
        statements.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(statements)
            .bind(("order_id", order_id.clone()))
            .bind(("order", order));
        if let Some(table_id) = table {
            query = query.bind(("table_id", table_id));
        }
        for (idx, item) in items.into_iter().enumerate() {
            query = query.bind((format!("item_{idx}"), item));
        }
        if let Err(e) = query.await?.check() {
            let text = e.to_string();
            if text.contains("table-missing") {
                return Err(RepoError::NotFound("Table not found".to_string()));
            }
            return Err(RepoError::Database(text));
        }

        self.find_by_id(&order_id)
            .await?
            .ok_or_else(|| RepoError::Database("Order vanished after create".to_string()))
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    pub async fn list_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM `order` ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn list_by_state(&self, state: OrderState) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM `order` WHERE state = $state ORDER BY created_at DESC")
            .bind(("state", state.as_str()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Items belonging to an order, in one query
    pub async fn items_for(&self, order: &RecordId) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE `order` = $order ORDER BY dish_name")
            .bind(("order", order.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Compare-and-set the order state; `None` means the caller lost the
    /// race or the transition was invalid for the current state
    pub async fn cas_state(
        &self,
        id: &RecordId,
        from: OrderState,
        to: OrderState,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET state = $to WHERE state = $from RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("from", from.as_str()))
            .bind(("to", to.as_str()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Mark one item done; idempotent, but only while its order is the
    /// given one
    pub async fn mark_item_done(
        &self,
        order: &RecordId,
        item_id: &str,
    ) -> RepoResult<Option<OrderItem>> {
        let item = record_id(ITEM_TABLE, item_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $item SET prep_status = $done \
                 WHERE `order` = $order RETURN AFTER",
            )
            .bind(("item", item))
            .bind(("order", order.to_string()))
            .bind(("done", prep_str(PrepStatus::Done)))
            .await?;
        let items: Vec<OrderItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Finish preparation: `preparing → ready`, guarded on every item
    /// being done
    pub async fn finish_cas(&self, id: &RecordId) -> RepoResult<Order> {
        let result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $undone = (SELECT VALUE id FROM order_item \
                     WHERE `order` = $order_key AND prep_status != 'done'); \
                 IF array::len($undone) > 0 { THROW 'items-not-done' }; \
                 LET $o = (UPDATE $thing SET state = 'ready' \
                     WHERE state = 'preparing' RETURN AFTER); \
                 IF array::len($o) == 0 { THROW 'state-conflict' }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("thing", id.clone()))
            .bind(("order_key", id.to_string()))
            .await?;

        if let Err(e) = result.check() {
            let text = e.to_string();
            if text.contains("items-not-done") {
                return Err(RepoError::Validation(
                    "All items must be done before finishing".to_string(),
                ));
            }
            if text.contains("state-conflict") {
                return Err(RepoError::Duplicate("state changed concurrently".to_string()));
            }
            return Err(RepoError::Database(text));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// The server claim on an order, if any
    pub async fn find_server_link(&self, order: &RecordId) -> RepoResult<Option<ServerOrder>> {
        let link_id = Self::link_id(order);
        let link: Option<ServerOrder> = self.base.db().select(link_id).await?;
        Ok(link)
    }

    /// Claim an order for a server
    ///
    /// The link id is derived from the order key, so at most one claim
    /// can ever exist; a lost race returns the winner's link.
    pub async fn claim(&self, order: &RecordId, server_id: &str) -> RepoResult<ServerOrder> {
        let link_id = Self::link_id(order);
        let link = ServerOrder {
            id: None,
            server: server_id.to_string(),
            order: order.clone(),
            created_at: Utc::now(),
        };

        let created: Result<Option<ServerOrder>, surrealdb::Error> =
            self.base.db().create(link_id.clone()).content(link).await;

        match created {
            Ok(Some(link)) => Ok(link),
            Ok(None) | Err(_) => {
                // Already claimed; hand back the existing link
                let existing: Option<ServerOrder> = self.base.db().select(link_id).await?;
                existing.ok_or_else(|| {
                    RepoError::Database("Server link vanished during claim".to_string())
                })
            }
        }
    }

    fn link_id(order: &RecordId) -> RecordId {
        RecordId::from_table_key(LINK_TABLE, order.key().to_string())
    }
}

fn prep_str(status: PrepStatus) -> &'static str {
    match status {
        PrepStatus::NotStarted => "not_started",
        PrepStatus::Preparing => "preparing",
        PrepStatus::Done => "done",
    }
}
