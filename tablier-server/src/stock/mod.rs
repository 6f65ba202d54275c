//! Stock service
//!
//! Owns the two cross-collection transactions around ingredient stock:
//! the draw that moves an order into preparation, and the restore that
//! compensates it when a cancellation is approved. Both are single
//! SurrealQL transactions; a guard that fails THROWs a slug the caller
//! maps back to a domain error.

use shared::{AppError, AppResult, ErrorCode, NotificationPriority, Role};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::models::{DrawLine, StockDraw};
use crate::db::repository::{IngredientRepository, new_record_id};
use crate::notify::{NotificationBus, Outgoing};

const DRAW_TABLE: &str = "stock_draw";

#[derive(Clone)]
pub struct StockService {
    db: Surreal<Db>,
    ingredients: IngredientRepository,
    notifier: NotificationBus,
}

impl StockService {
    pub fn new(db: Surreal<Db>, notifier: NotificationBus) -> Self {
        Self {
            ingredients: IngredientRepository::new(db.clone()),
            db,
            notifier,
        }
    }

    /// Move an order `pending → preparing` and deduct its ingredient
    /// draw atomically
    ///
    /// Either the transition, every deduction, the item updates and the
    /// draw record all commit, or none do. A concurrent start loses the
    /// compare-and-set and gets a conflict; a deduction that would go
    /// negative aborts everything with insufficient stock.
    pub async fn draw_for_start(
        &self,
        order: &RecordId,
        draws: &[(String, f64)],
    ) -> AppResult<()> {
        let names: Vec<String> = draws.iter().map(|(name, _)| name.clone()).collect();
        let found = self
            .ingredients
            .find_by_names(names.clone())
            .await
            .map_err(AppError::from)?;

        let mut lines = Vec::with_capacity(draws.len());
        for (name, grams) in draws {
            let ingredient = found.iter().find(|i| &i.name == name).ok_or_else(|| {
                AppError::insufficient_stock().with_detail("missing", name.clone())
            })?;
            let id = ingredient
                .id
                .clone()
                .ok_or_else(|| AppError::database("Ingredient without id"))?;
            lines.push(DrawLine {
                ingredient: id,
                name: name.clone(),
                grams: *grams,
            });
        }

        let mut sql = String::from(
            "BEGIN TRANSACTION; \
             LET $o = (UPDATE $order SET state = 'preparing' \
                 WHERE state = 'pending' RETURN AFTER); \
             IF array::len($o) == 0 { THROW 'state-conflict' }; ",
        );
        for i in 0..lines.len() {
            sql.push_str(&format!(
                "LET $i{i} = (UPDATE $ing{i} SET quantity -= $qty{i} \
                     WHERE quantity >= $qty{i} RETURN AFTER); \
                 IF array::len($i{i}) == 0 {{ THROW 'insufficient-stock' }}; "
            ));
        }
        sql.push_str(
            "UPDATE order_item SET prep_status = 'preparing' WHERE `order` = $order_str; ",
        );
        if !lines.is_empty() {
            sql.push_str("CREATE $draw_id CONTENT $draw; ");
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .db
            .query(sql)
            .bind(("order", order.clone()))
            .bind(("order_str", order.to_string()));
        for (i, line) in lines.iter().enumerate() {
            query = query
                .bind((format!("ing{i}"), line.ingredient.clone()))
                .bind((format!("qty{i}"), line.grams));
        }
        if !lines.is_empty() {
            let draw = StockDraw {
                id: None,
                order: order.clone(),
                lines: lines.clone(),
                restored: false,
                created_at: chrono::Utc::now(),
            };
            query = query
                .bind(("draw_id", new_record_id(DRAW_TABLE)))
                .bind(("draw", draw));
        }

        let result = query.await.map_err(|e| AppError::database(e.to_string()))?;
        if let Err(e) = result.check() {
            let text = e.to_string();
            if text.contains("insufficient-stock") {
                return Err(AppError::insufficient_stock()
                    .with_detail("order", order.to_string()));
            }
            if text.contains("state-conflict") {
                return Err(AppError::with_message(
                    ErrorCode::InvalidTransition,
                    "Order is not pending",
                ));
            }
            return Err(AppError::database(text));
        }

        self.sweep_low_stock(names).await;
        Ok(())
    }

    /// Approve a cancellation: request `pending → approved`, order
    /// `preparing|ready → cancelled`, and the order's unrestored draw
    /// (if any) compensated back into stock — one transaction
    pub async fn restore_for_cancel(
        &self,
        request: &RecordId,
        order: &RecordId,
    ) -> AppResult<()> {
        let draw = self.find_unrestored_draw(order).await?;
        let lines = draw.as_ref().map(|d| d.lines.clone()).unwrap_or_default();

        let mut sql = String::from(
            "BEGIN TRANSACTION; \
             LET $r = (UPDATE $request SET status = 'approved' \
                 WHERE status = 'pending' RETURN AFTER); \
             IF array::len($r) == 0 { THROW 'request-not-pending' }; \
             LET $o = (UPDATE $order SET state = 'cancelled' \
                 WHERE state IN ['preparing', 'ready'] RETURN AFTER); \
             IF array::len($o) == 0 { THROW 'state-conflict' }; ",
        );
        if draw.is_some() {
            sql.push_str(
                "LET $d = (UPDATE $draw SET restored = true \
                     WHERE restored = false RETURN AFTER); \
                 IF array::len($d) == 0 { THROW 'state-conflict' }; ",
            );
            for i in 0..lines.len() {
                sql.push_str(&format!("UPDATE $ing{i} SET quantity += $qty{i}; "));
            }
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .db
            .query(sql)
            .bind(("request", request.clone()))
            .bind(("order", order.clone()));
        if let Some(draw) = &draw {
            let draw_id = draw
                .id
                .clone()
                .ok_or_else(|| AppError::database("Stock draw without id"))?;
            query = query.bind(("draw", draw_id));
            for (i, line) in lines.iter().enumerate() {
                query = query
                    .bind((format!("ing{i}"), line.ingredient.clone()))
                    .bind((format!("qty{i}"), line.grams));
            }
        }

        let result = query.await.map_err(|e| AppError::database(e.to_string()))?;
        if let Err(e) = result.check() {
            let text = e.to_string();
            if text.contains("request-not-pending") {
                return Err(AppError::with_message(
                    ErrorCode::CancellationNotPending,
                    "Cancellation request is not pending",
                ));
            }
            if text.contains("state-conflict") {
                return Err(AppError::with_message(
                    ErrorCode::InvalidTransition,
                    "Order can no longer be cancelled",
                ));
            }
            return Err(AppError::database(text));
        }
        Ok(())
    }

    async fn find_unrestored_draw(&self, order: &RecordId) -> AppResult<Option<StockDraw>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM stock_draw \
                 WHERE `order` = $order AND restored = false LIMIT 1",
            )
            .bind(("order", order.to_string()))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        let draws: Vec<StockDraw> = result
            .take(0)
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(draws.into_iter().next())
    }

    /// Flag threshold crossings and notify the kitchen and management,
    /// once per crossing
    async fn sweep_low_stock(&self, names: Vec<String>) {
        let flagged = match self.ingredients.flag_low_stock(names).await {
            Ok(flagged) => flagged,
            Err(err) => {
                tracing::warn!("Low-stock sweep failed: {}", err);
                return;
            }
        };
        for ingredient in flagged {
            let message = format!(
                "{} is low: {:.0}{} left (threshold {:.0}{})",
                ingredient.name,
                ingredient.quantity,
                ingredient.unit,
                ingredient.alert_threshold,
                ingredient.unit
            );
            let related = ingredient.id.as_ref().map(|id| id.to_string());
            for role in [Role::Chef, Role::Manager] {
                let mut outgoing = Outgoing::broadcast(
                    role,
                    "low-stock",
                    "Low stock",
                    message.clone(),
                );
                outgoing.priority = NotificationPriority::High;
                if let Some(related) = &related {
                    outgoing = outgoing.related_to(related.clone());
                }
                self.notifier.push(outgoing).await;
            }
        }
    }
}
