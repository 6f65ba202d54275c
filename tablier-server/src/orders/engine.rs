use chrono::Utc;
use shared::{
    AppError, AppResult, CancellationStatus, ErrorCode, Money, OrderState, PrepStatus, Role,
};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::catalog::CatalogService;
use crate::db::models::{
    CancelRequestBody, CancellationRequest, Dish, Order, OrderCreate, OrderItem,
    OrderItemRequest,
};
use crate::db::repository::{
    CancellationRepository, ClientRepository, DiningTableRepository, OrderRepository,
    new_record_id,
};
use crate::notify::{NotificationBus, Outgoing};
use crate::stock::StockService;

use super::views::{OrderDetail, OrderView};

#[derive(Clone)]
pub struct OrderEngine {
    orders: OrderRepository,
    cancellations: CancellationRepository,
    clients: ClientRepository,
    tables: DiningTableRepository,
    catalog: CatalogService,
    stock: StockService,
    notifier: NotificationBus,
}

impl OrderEngine {
    pub fn new(db: Surreal<Db>, catalog: CatalogService, notifier: NotificationBus) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            cancellations: CancellationRepository::new(db.clone()),
            clients: ClientRepository::new(db.clone()),
            tables: DiningTableRepository::new(db.clone()),
            stock: StockService::new(db, notifier.clone()),
            catalog,
            notifier,
        }
    }

    /// Create an order: duplicate dish lines merged, total fixed at
    /// creation, dish names and prices denormalized into the items; a
    /// free walk-in table is occupied in the same transaction as the
    /// order write
    pub async fn create(&self, user: &CurrentUser, data: OrderCreate) -> AppResult<OrderView> {
        user.require_role(&[Role::Client, Role::Guest])?;
        let merged = merge_items(&data.items)?;

        let mut dishes: Vec<(Dish, i64)> = Vec::with_capacity(merged.len());
        for (dish_id, quantity) in &merged {
            let id = crate::db::repository::DishRepository::parse_id(dish_id)?;
            let dish = self.catalog.dish(&id).await?;
            dishes.push((dish, *quantity));
        }

        let mut total = Money::ZERO;
        for (dish, quantity) in &dishes {
            let line = dish
                .price
                .checked_mul(*quantity)
                .map_err(|e| AppError::validation(e.to_string()))?;
            total = total
                .checked_add(line)
                .map_err(|e| AppError::validation(e.to_string()))?;
        }

        let client = self
            .clients
            .ensure(&user.id, user.email.as_deref(), user.is_guest)
            .await
            .map_err(AppError::from)?;

        let table = match &data.table {
            Some(table_id) => Some(DiningTableRepository::parse_id(table_id)?),
            None => None,
        };

        let order = Order {
            id: None,
            client,
            table,
            state: OrderState::Pending,
            confirmed: false,
            total,
            notes: data.notes,
            created_at: Utc::now(),
        };
        // item.order is overwritten inside create_with_items
        let placeholder = new_record_id("order");
        let items: Vec<OrderItem> = dishes
            .into_iter()
            .map(|(dish, quantity)| OrderItem {
                id: None,
                order: placeholder.clone(),
                dish: dish.id.clone().unwrap_or_else(|| new_record_id("dish")),
                dish_name: dish.name,
                unit_price: dish.price,
                quantity,
                prep_status: PrepStatus::NotStarted,
            })
            .collect();

        let created = self
            .orders
            .create_with_items(order, items)
            .await
            .map_err(|e| match e {
                crate::db::repository::RepoError::NotFound(msg) => {
                    AppError::with_message(ErrorCode::TableNotFound, msg)
                }
                other => other.into(),
            })?;
        let order_id = created
            .id
            .clone()
            .ok_or_else(|| AppError::database("Order without id"))?;
        let items = self
            .orders
            .items_for(&order_id)
            .await
            .map_err(AppError::from)?;
        Ok(OrderView {
            order: created,
            items,
        })
    }

    /// Chef starts preparation: the `pending → preparing` transition and
    /// the full ingredient draw commit atomically
    pub async fn start(&self, user: &CurrentUser, order_id: &str) -> AppResult<Order> {
        user.require_role(&[Role::Chef])?;
        let id = OrderRepository::parse_id(order_id)?;
        let order = self.load(&id).await?;
        if order.state != OrderState::Pending {
            return Err(AppError::with_message(
                ErrorCode::InvalidTransition,
                format!("Cannot start an order in state '{}'", order.state),
            ));
        }

        let items = self.orders.items_for(&id).await.map_err(AppError::from)?;
        let mut dishes: Vec<(Dish, i64)> = Vec::with_capacity(items.len());
        for item in &items {
            let dish = self.catalog.dish(&item.dish).await?;
            dishes.push((dish, item.quantity));
        }
        let draws = CatalogService::required_draws(&dishes);

        self.stock.draw_for_start(&id, &draws).await?;
        self.load(&id).await
    }

    /// Chef flags one item as plated
    pub async fn mark_item_done(
        &self,
        user: &CurrentUser,
        order_id: &str,
        item_id: &str,
    ) -> AppResult<OrderItem> {
        user.require_role(&[Role::Chef])?;
        let id = OrderRepository::parse_id(order_id)?;
        let order = self.load(&id).await?;
        if order.state != OrderState::Preparing {
            return Err(AppError::with_message(
                ErrorCode::InvalidTransition,
                "Items can only be completed while the order is preparing",
            ));
        }
        self.orders
            .mark_item_done(&id, item_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Order item not found"))
    }

    /// Chef finishes: `preparing → ready`, guarded on every item done;
    /// the claiming server (or the whole floor) gets pinged
    pub async fn finish(&self, user: &CurrentUser, order_id: &str) -> AppResult<Order> {
        user.require_role(&[Role::Chef])?;
        let id = OrderRepository::parse_id(order_id)?;
        let order = self.orders.finish_cas(&id).await.map_err(|e| match e {
            crate::db::repository::RepoError::Validation(msg)
            | crate::db::repository::RepoError::Duplicate(msg) => AppError::conflict(msg),
            other => other.into(),
        })?;

        let message = format!("Order {} is ready to serve", id.key());
        let link = self
            .orders
            .find_server_link(&id)
            .await
            .map_err(AppError::from)?;
        let outgoing = match link {
            Some(link) => {
                Outgoing::directed(Role::Server, &link.server, "order-ready", "Order ready", message)
            }
            None => Outgoing::broadcast(Role::Server, "order-ready", "Order ready", message),
        };
        self.notifier.push(outgoing.related_to(id.to_string())).await;
        Ok(order)
    }

    /// Server serves a ready order
    ///
    /// Serving claims the order when unclaimed; a claim held by another
    /// server is a conflict. Registered clients earn fidelity points,
    /// one per ten minor units of the total. The table stays occupied
    /// until it is explicitly freed.
    pub async fn serve(&self, user: &CurrentUser, order_id: &str) -> AppResult<Order> {
        user.require_role(&[Role::Server])?;
        let id = OrderRepository::parse_id(order_id)?;
        let order = self.load(&id).await?;
        if let Some(link) = self
            .orders
            .find_server_link(&id)
            .await
            .map_err(AppError::from)?
        {
            if link.server != user.id {
                return Err(AppError::with_message(
                    ErrorCode::OrderClaimed,
                    "Order is claimed by another server",
                ));
            }
        }
        // No claim before the order is servable: a failed attempt must
        // not leave a link blocking the rest of the floor
        if order.state != OrderState::Ready {
            return Err(AppError::with_message(
                ErrorCode::InvalidTransition,
                "Order is not ready",
            ));
        }

        let link = self
            .orders
            .claim(&id, &user.id)
            .await
            .map_err(AppError::from)?;
        if link.server != user.id {
            return Err(AppError::with_message(
                ErrorCode::OrderClaimed,
                "Order is claimed by another server",
            ));
        }

        let served = self
            .orders
            .cas_state(&id, OrderState::Ready, OrderState::Served)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::InvalidTransition, "Order is not ready")
            })?;

        if let Some(client) = self
            .clients
            .find_by_id(&order.client)
            .await
            .map_err(AppError::from)?
        {
            if !client.is_guest {
                let points = order.total.minor() / 10;
                if points > 0 {
                    self.clients
                        .award_fidelity(&order.client, points)
                        .await
                        .map_err(AppError::from)?;
                }
            }
        }
        Ok(served)
    }

    /// Direct cancellation, only out of `pending`
    ///
    /// Diners can cancel their own order; servers can cancel any.
    pub async fn cancel_direct(&self, user: &CurrentUser, order_id: &str) -> AppResult<Order> {
        user.require_role(&[Role::Server, Role::Client, Role::Guest])?;
        let id = OrderRepository::parse_id(order_id)?;
        let order = self.load(&id).await?;
        if !user.role.is_staff() && order.client != ClientRepository::id_for(&user.id) {
            return Err(AppError::forbidden("Not your order"));
        }

        self.orders
            .cas_state(&id, OrderState::Pending, OrderState::Cancelled)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidTransition,
                    "Only pending orders can be cancelled directly",
                )
            })
    }

    /// Server escalates a cancellation once preparation has started;
    /// managers are notified and at most one request stays pending
    pub async fn request_cancel(
        &self,
        user: &CurrentUser,
        order_id: &str,
        body: CancelRequestBody,
    ) -> AppResult<CancellationRequest> {
        user.require_role(&[Role::Server])?;
        let id = OrderRepository::parse_id(order_id)?;
        let order = self.load(&id).await?;
        if !matches!(order.state, OrderState::Preparing | OrderState::Ready) {
            return Err(AppError::with_message(
                ErrorCode::InvalidTransition,
                "Cancellation requests apply to preparing or ready orders",
            ));
        }
        if self
            .cancellations
            .find_pending_for_order(&id)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Err(AppError::conflict(
                "A cancellation request is already pending for this order",
            ));
        }

        let request = CancellationRequest {
            id: None,
            order: id.clone(),
            requested_by: user.id.clone(),
            client: Some(order.client.clone()),
            reason: body.reason,
            status: CancellationStatus::Pending,
            created_at: Utc::now(),
        };
        let created = self
            .cancellations
            .create(request)
            .await
            .map_err(AppError::from)?;

        let related = created
            .id
            .as_ref()
            .map(|rid| rid.to_string())
            .unwrap_or_else(|| id.to_string());
        self.notifier
            .push(
                Outgoing::broadcast(
                    Role::Manager,
                    "cancellation",
                    "Cancellation requested",
                    format!("Order {} has a pending cancellation request", id.key()),
                )
                .high_priority()
                .related_to(related),
            )
            .await;
        Ok(created)
    }

    /// Manager approves: request, order state and stock restore commit
    /// in one transaction, then the requesting server is notified
    pub async fn approve_cancel(
        &self,
        user: &CurrentUser,
        request_id: &str,
    ) -> AppResult<CancellationRequest> {
        user.require_role(&[Role::Manager])?;
        let id = CancellationRepository::parse_id(request_id)?;
        let request = self
            .cancellations
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Cancellation request not found"))?;

        self.stock.restore_for_cancel(&id, &request.order).await?;

        self.notifier
            .push(
                Outgoing::directed(
                    Role::Server,
                    &request.requested_by,
                    "cancellation-approved",
                    "Cancellation approved",
                    format!("Order {} was cancelled", request.order.key()),
                )
                .related_to(id.to_string()),
            )
            .await;

        self.cancellations
            .find_by_id(&id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Cancellation request not found"))
    }

    /// Manager rejects; the order keeps its current state
    pub async fn reject_cancel(
        &self,
        user: &CurrentUser,
        request_id: &str,
    ) -> AppResult<CancellationRequest> {
        user.require_role(&[Role::Manager])?;
        let id = CancellationRepository::parse_id(request_id)?;
        let request = self
            .cancellations
            .cas_status(&id, CancellationStatus::Rejected)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::CancellationNotPending))?;

        self.notifier
            .push(Outgoing::directed(
                Role::Server,
                &request.requested_by,
                "cancellation-rejected",
                "Cancellation rejected",
                format!("Order {} stays active", request.order.key()),
            ))
            .await;
        Ok(request)
    }

    pub async fn list_cancel_requests(
        &self,
        user: &CurrentUser,
    ) -> AppResult<Vec<CancellationRequest>> {
        user.require_role(&[Role::Manager])?;
        self.cancellations.find_all().await.map_err(AppError::from)
    }

    /// Staff listing, optionally filtered by state; synonym spellings
    /// are accepted in the filter
    pub async fn list(&self, user: &CurrentUser, status: Option<&str>) -> AppResult<Vec<Order>> {
        user.require_staff()?;
        match status {
            Some(raw) => {
                let state = OrderState::parse(raw).ok_or_else(|| {
                    AppError::validation(format!("Unknown status filter: {}", raw))
                })?;
                self.orders.list_by_state(state).await.map_err(AppError::from)
            }
            None => self.orders.list_all().await.map_err(AppError::from),
        }
    }

    /// Full detail; diners only see their own orders
    pub async fn detail(&self, user: &CurrentUser, order_id: &str) -> AppResult<OrderDetail> {
        let id = OrderRepository::parse_id(order_id)?;
        let order = self.load(&id).await?;
        if !user.role.is_staff() && order.client != ClientRepository::id_for(&user.id) {
            return Err(AppError::forbidden("Not your order"));
        }

        let items = self.orders.items_for(&id).await.map_err(AppError::from)?;
        let client = self
            .clients
            .find_by_id(&order.client)
            .await
            .map_err(AppError::from)?;
        let table = match &order.table {
            Some(table_id) => self
                .tables
                .find_by_id(table_id)
                .await
                .map_err(AppError::from)?,
            None => None,
        };
        let server = self
            .orders
            .find_server_link(&id)
            .await
            .map_err(AppError::from)?
            .map(|link| link.server);

        Ok(OrderDetail {
            order,
            items,
            client,
            table,
            server,
        })
    }

    async fn load(&self, id: &RecordId) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
    }
}

/// Merge duplicate dish lines, preserving first-seen order
fn merge_items(items: &[OrderItemRequest]) -> AppResult<Vec<(String, i64)>> {
    if items.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::EmptyOrder,
            "Order must contain at least one item",
        ));
    }
    let mut merged: Vec<(String, i64)> = Vec::new();
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::validation(format!(
                "Quantity for '{}' must be at least 1",
                item.dish
            )));
        }
        match merged.iter_mut().find(|(dish, _)| dish == &item.dish) {
            Some((_, quantity)) => *quantity += item.quantity,
            None => merged.push((item.dish.clone(), item.quantity)),
        }
    }
    Ok(merged)
}
