//! Order lifecycle integration tests against the in-memory store

mod common;

use common::*;
use shared::{ErrorCode, OrderState, PrepStatus, Role};
use surrealdb::RecordId;
use tablier_server::db::models::{CancelRequestBody, OrderCreate, OrderItemRequest};
use tablier_server::db::repository::ClientRepository;

fn order_payload(items: Vec<(&str, i64)>, table: Option<String>) -> OrderCreate {
    OrderCreate {
        items: items
            .into_iter()
            .map(|(dish, quantity)| OrderItemRequest {
                dish: dish.to_string(),
                quantity,
            })
            .collect(),
        table,
        notes: None,
    }
}

async fn stock_draw_ids(app: &TestApp) -> Vec<RecordId> {
    app.db
        .query("SELECT VALUE id FROM stock_draw")
        .await
        .unwrap()
        .take(0)
        .unwrap()
}

#[tokio::test]
async fn test_happy_path_order_earns_fidelity() {
    let app = app().await;
    seed_ingredient(&app.db, "tomato", 500.0, 100.0).await;
    seed_ingredient(&app.db, "basil", 200.0, 50.0).await;
    let d1 = seed_dish(&app.db, "ratatouille", price("10.00"), vec![("tomato", 50.0)]).await;
    let d2 = seed_dish(&app.db, "pesto", price("5.00"), vec![("basil", 20.0)]).await;

    let client = user(Role::Client, "alice");
    let chef = user(Role::Chef, "carl");
    let server = user(Role::Server, "sam");

    let view = app
        .engine
        .create(
            &client,
            order_payload(vec![(&id_string(&d1.id), 2), (&id_string(&d2.id), 1)], None),
        )
        .await
        .unwrap();
    assert_eq!(view.order.state, OrderState::Pending);
    assert_eq!(view.order.total.minor(), 2500);
    assert_eq!(view.items.len(), 2);

    let order_id = id_string(&view.order.id);
    let started = app.engine.start(&chef, &order_id).await.unwrap();
    assert_eq!(started.state, OrderState::Preparing);

    // The draw went through: 2×50g tomato, 1×20g basil
    assert_eq!(ingredient_by_name(&app.db, "tomato").await.quantity, 400.0);
    assert_eq!(ingredient_by_name(&app.db, "basil").await.quantity, 180.0);

    for item in &view.items {
        let done = app
            .engine
            .mark_item_done(&chef, &order_id, &id_string(&item.id))
            .await
            .unwrap();
        assert_eq!(done.prep_status, PrepStatus::Done);
    }

    let ready = app.engine.finish(&chef, &order_id).await.unwrap();
    assert_eq!(ready.state, OrderState::Ready);

    let served = app.engine.serve(&server, &order_id).await.unwrap();
    assert_eq!(served.state, OrderState::Served);

    // 2500 minor units -> 250 fidelity points
    let repo = ClientRepository::new(app.db.clone());
    let profile = repo
        .find_by_id(&ClientRepository::id_for("alice"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.fidelity_points, 250);
}

#[tokio::test]
async fn test_guests_earn_no_fidelity() {
    let app = app().await;
    let dish = seed_dish(&app.db, "soup", price("4.00"), vec![]).await;
    let guest = user(Role::Guest, "g-77");
    let chef = user(Role::Chef, "carl");
    let server = user(Role::Server, "sam");

    let view = app
        .engine
        .create(&guest, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);

    app.engine.start(&chef, &order_id).await.unwrap();
    app.engine
        .mark_item_done(&chef, &order_id, &id_string(&view.items[0].id))
        .await
        .unwrap();
    app.engine.finish(&chef, &order_id).await.unwrap();
    app.engine.serve(&server, &order_id).await.unwrap();

    let repo = ClientRepository::new(app.db.clone());
    let profile = repo
        .find_by_id(&ClientRepository::id_for("g-77"))
        .await
        .unwrap()
        .unwrap();
    assert!(profile.is_guest);
    assert_eq!(profile.fidelity_points, 0);
}

#[tokio::test]
async fn test_insufficient_stock_changes_nothing() {
    let app = app().await;
    seed_ingredient(&app.db, "saffron", 100.0, 10.0).await;
    let dish = seed_dish(&app.db, "paella", price("18.00"), vec![("saffron", 150.0)]).await;

    let client = user(Role::Client, "bob");
    let chef = user(Role::Chef, "carl");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);

    let err = app.engine.start(&chef, &order_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    // Order still pending, stock untouched, no draw recorded
    let detail = app.engine.detail(&chef, &order_id).await.unwrap();
    assert_eq!(detail.order.state, OrderState::Pending);
    assert_eq!(detail.items[0].prep_status, PrepStatus::NotStarted);
    assert_eq!(ingredient_by_name(&app.db, "saffron").await.quantity, 100.0);
    assert!(stock_draw_ids(&app).await.is_empty());
}

#[tokio::test]
async fn test_concurrent_start_draws_once() {
    let app = app().await;
    seed_ingredient(&app.db, "flour", 300.0, 50.0).await;
    let dish = seed_dish(&app.db, "bread", price("3.00"), vec![("flour", 100.0)]).await;

    let client = user(Role::Client, "carol");
    let chef_a = user(Role::Chef, "chef-a");
    let chef_b = user(Role::Chef, "chef-b");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);

    let engine_b = app.engine.clone();
    let (a, b) = tokio::join!(
        app.engine.start(&chef_a, &order_id),
        engine_b.start(&chef_b, &order_id),
    );

    // Exactly one chef wins the compare-and-set
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert_eq!(loser.http_status(), http::StatusCode::CONFLICT);

    assert_eq!(ingredient_by_name(&app.db, "flour").await.quantity, 200.0);
    assert_eq!(stock_draw_ids(&app).await.len(), 1);
}

#[tokio::test]
async fn test_direct_cancel_only_from_pending_and_only_own() {
    let app = app().await;
    let dish = seed_dish(&app.db, "salad", price("6.00"), vec![]).await;
    let alice = user(Role::Client, "alice");
    let mallory = user(Role::Client, "mallory");
    let chef = user(Role::Chef, "carl");

    let view = app
        .engine
        .create(&alice, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);

    // Another diner may not touch it
    let err = app.engine.cancel_direct(&mallory, &order_id).await.unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

    // The owner may
    let cancelled = app.engine.cancel_direct(&alice, &order_id).await.unwrap();
    assert_eq!(cancelled.state, OrderState::Cancelled);

    // And once preparation started, direct cancel is refused
    let view2 = app
        .engine
        .create(&alice, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order2 = id_string(&view2.order.id);
    app.engine.start(&chef, &order2).await.unwrap();
    let err = app.engine.cancel_direct(&alice, &order2).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_cancellation_request_flow_restores_stock() {
    let app = app().await;
    seed_ingredient(&app.db, "beef", 100.0, 20.0).await;
    seed_ingredient(&app.db, "onion", 50.0, 10.0).await;
    let dish = seed_dish(
        &app.db,
        "bourguignon",
        price("22.00"),
        vec![("beef", 30.0), ("onion", 10.0)],
    )
    .await;

    let client = user(Role::Client, "dave");
    let chef = user(Role::Chef, "carl");
    let server = user(Role::Server, "sam");
    let manager = user(Role::Manager, "meg");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);
    app.engine.start(&chef, &order_id).await.unwrap();
    assert_eq!(ingredient_by_name(&app.db, "beef").await.quantity, 70.0);
    assert_eq!(ingredient_by_name(&app.db, "onion").await.quantity, 40.0);

    let request = app
        .engine
        .request_cancel(
            &server,
            &order_id,
            CancelRequestBody {
                reason: Some("customer left".to_string()),
            },
        )
        .await
        .unwrap();
    let request_id = id_string(&request.id);

    // Only one pending request per order
    let err = app
        .engine
        .request_cancel(&server, &order_id, CancelRequestBody::default())
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

    // Managers were pinged
    let inbox = app.notifier.list_for("meg", Role::Manager).await.unwrap();
    assert!(inbox.iter().any(|v| v.notification.kind == "cancellation"));

    app.engine.approve_cancel(&manager, &request_id).await.unwrap();

    let detail = app.engine.detail(&manager, &order_id).await.unwrap();
    assert_eq!(detail.order.state, OrderState::Cancelled);
    assert_eq!(ingredient_by_name(&app.db, "beef").await.quantity, 100.0);
    assert_eq!(ingredient_by_name(&app.db, "onion").await.quantity, 50.0);

    // Approving twice cannot restore twice
    let err = app
        .engine
        .approve_cancel(&manager, &request_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CancellationNotPending);
    assert_eq!(ingredient_by_name(&app.db, "beef").await.quantity, 100.0);

    // The requesting server heard back
    let inbox = app.notifier.list_for("sam", Role::Server).await.unwrap();
    assert!(
        inbox
            .iter()
            .any(|v| v.notification.kind == "cancellation-approved")
    );
}

#[tokio::test]
async fn test_rejected_cancellation_keeps_order_running() {
    let app = app().await;
    let dish = seed_dish(&app.db, "fries", price("3.50"), vec![]).await;
    let client = user(Role::Client, "erin");
    let chef = user(Role::Chef, "carl");
    let server = user(Role::Server, "sam");
    let manager = user(Role::Manager, "meg");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 2)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);
    app.engine.start(&chef, &order_id).await.unwrap();

    let request = app
        .engine
        .request_cancel(&server, &order_id, CancelRequestBody::default())
        .await
        .unwrap();
    let request_id = id_string(&request.id);

    app.engine.reject_cancel(&manager, &request_id).await.unwrap();

    let detail = app.engine.detail(&manager, &order_id).await.unwrap();
    assert_eq!(detail.order.state, OrderState::Preparing);

    // A settled request cannot be approved afterwards
    let err = app
        .engine
        .approve_cancel(&manager, &request_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CancellationNotPending);
}

#[tokio::test]
async fn test_finish_requires_every_item_done() {
    let app = app().await;
    let dish = seed_dish(&app.db, "duo", price("9.00"), vec![]).await;
    let other = seed_dish(&app.db, "solo", price("7.00"), vec![]).await;
    let client = user(Role::Client, "fred");
    let chef = user(Role::Chef, "carl");

    let view = app
        .engine
        .create(
            &client,
            order_payload(vec![(&id_string(&dish.id), 1), (&id_string(&other.id), 1)], None),
        )
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);
    app.engine.start(&chef, &order_id).await.unwrap();

    app.engine
        .mark_item_done(&chef, &order_id, &id_string(&view.items[0].id))
        .await
        .unwrap();

    let err = app.engine.finish(&chef, &order_id).await.unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

    app.engine
        .mark_item_done(&chef, &order_id, &id_string(&view.items[1].id))
        .await
        .unwrap();
    let ready = app.engine.finish(&chef, &order_id).await.unwrap();
    assert_eq!(ready.state, OrderState::Ready);
}

#[tokio::test]
async fn test_serve_claim_is_exclusive() {
    let app = app().await;
    let dish = seed_dish(&app.db, "cake", price("5.00"), vec![]).await;
    let client = user(Role::Client, "gina");
    let chef = user(Role::Chef, "carl");
    let server_a = user(Role::Server, "server-a");
    let server_b = user(Role::Server, "server-b");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);
    app.engine.start(&chef, &order_id).await.unwrap();
    app.engine
        .mark_item_done(&chef, &order_id, &id_string(&view.items[0].id))
        .await
        .unwrap();
    app.engine.finish(&chef, &order_id).await.unwrap();

    app.engine.serve(&server_a, &order_id).await.unwrap();

    // The other server hits the existing claim, not the state machine
    let err = app.engine.serve(&server_b, &order_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderClaimed);
}

#[tokio::test]
async fn test_create_merges_duplicate_lines_and_rejects_empty() {
    let app = app().await;
    let dish = seed_dish(&app.db, "tea", price("2.00"), vec![]).await;
    let client = user(Role::Client, "hugo");

    let view = app
        .engine
        .create(
            &client,
            order_payload(vec![(&id_string(&dish.id), 1), (&id_string(&dish.id), 2)], None),
        )
        .await
        .unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].quantity, 3);
    assert_eq!(view.order.total.minor(), 600);

    let err = app
        .engine
        .create(&client, order_payload(vec![], None))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyOrder);

    let err = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 0)], None))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_accepts_synonym_status_filters() {
    let app = app().await;
    let dish = seed_dish(&app.db, "pie", price("4.50"), vec![]).await;
    let client = user(Role::Client, "iris");
    let chef = user(Role::Chef, "carl");
    let server = user(Role::Server, "sam");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);
    app.engine.start(&chef, &order_id).await.unwrap();

    // French spelling resolves to the same canonical state
    let en = app.engine.list(&server, Some("preparing")).await.unwrap();
    let fr = app.engine.list(&server, Some("en_preparation")).await.unwrap();
    assert_eq!(en.len(), 1);
    assert_eq!(fr.len(), 1);

    let err = app.engine.list(&server, Some("paid")).await.unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

    // Diners cannot list
    let err = app.engine.list(&client, None).await.unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_detail_is_owner_or_staff_only() {
    let app = app().await;
    let dish = seed_dish(&app.db, "flan", price("3.00"), vec![]).await;
    let alice = user(Role::Client, "alice");
    let mallory = user(Role::Client, "mallory");
    let server = user(Role::Server, "sam");

    let view = app
        .engine
        .create(&alice, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);

    assert!(app.engine.detail(&alice, &order_id).await.is_ok());
    assert!(app.engine.detail(&server, &order_id).await.is_ok());
    let err = app.engine.detail(&mallory, &order_id).await.unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_low_stock_crossing_notifies_once() {
    let app = app().await;
    seed_ingredient(&app.db, "cream", 120.0, 100.0).await;
    let dish = seed_dish(&app.db, "mousse", price("6.00"), vec![("cream", 30.0)]).await;
    let client = user(Role::Client, "jane");
    let chef = user(Role::Chef, "carl");

    // First draw crosses the threshold: 120 -> 90
    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    app.engine.start(&chef, &id_string(&view.order.id)).await.unwrap();
    assert!(ingredient_by_name(&app.db, "cream").await.low_stock);

    // Second draw stays below: no second alert
    let view2 = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    app.engine.start(&chef, &id_string(&view2.order.id)).await.unwrap();

    let chef_inbox = app.notifier.list_for("carl", Role::Chef).await.unwrap();
    let alerts: Vec<_> = chef_inbox
        .iter()
        .filter(|v| v.notification.kind == "low-stock")
        .collect();
    assert_eq!(alerts.len(), 1);

    let manager_inbox = app.notifier.list_for("meg", Role::Manager).await.unwrap();
    assert!(
        manager_inbox
            .iter()
            .any(|v| v.notification.kind == "low-stock")
    );
}

#[tokio::test]
async fn test_restock_clears_low_stock_and_rearms_alert() {
    let app = app().await;
    let created = seed_ingredient(&app.db, "milk", 120.0, 100.0).await;
    let dish = seed_dish(&app.db, "latte", price("4.00"), vec![("milk", 30.0)]).await;
    let client = user(Role::Client, "kim");
    let chef = user(Role::Chef, "carl");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    app.engine.start(&chef, &id_string(&view.order.id)).await.unwrap();
    assert!(ingredient_by_name(&app.db, "milk").await.low_stock);

    let repo = tablier_server::db::repository::IngredientRepository::new(app.db.clone());
    let ingredient_id = created.id.expect("id");
    let restocked = repo.restock(&ingredient_id, 100.0, "carl").await.unwrap();
    assert_eq!(restocked.quantity, 190.0);
    assert!(!restocked.low_stock);

    // Crossing again after the restock alerts again
    let view2 = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 4)], None))
        .await
        .unwrap();
    app.engine.start(&chef, &id_string(&view2.order.id)).await.unwrap();

    let inbox = app.notifier.list_for("carl", Role::Chef).await.unwrap();
    let alerts = inbox
        .iter()
        .filter(|v| v.notification.kind == "low-stock")
        .count();
    assert_eq!(alerts, 2);
}

#[tokio::test]
async fn test_notification_read_flow_is_idempotent() {
    let app = app().await;
    let dish = seed_dish(&app.db, "espresso", price("2.50"), vec![]).await;
    let client = user(Role::Client, "lea");
    let chef = user(Role::Chef, "carl");
    let server = user(Role::Server, "sam");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);
    app.engine.start(&chef, &order_id).await.unwrap();
    app.engine
        .mark_item_done(&chef, &order_id, &id_string(&view.items[0].id))
        .await
        .unwrap();
    app.engine.finish(&chef, &order_id).await.unwrap();

    let inbox = app.notifier.list_for("sam", Role::Server).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(!inbox[0].read);
    let notification_id = id_string(&inbox[0].notification.id);

    app.notifier.mark_read("sam", &notification_id).await.unwrap();
    app.notifier.mark_read("sam", &notification_id).await.unwrap();

    let inbox = app.notifier.list_for("sam", Role::Server).await.unwrap();
    assert!(inbox[0].read);
    assert_eq!(app.notifier.unread_count("sam", Role::Server).await.unwrap(), 0);

    // Read state is per user: another server still sees it unread
    let other = app.notifier.list_for("sue", Role::Server).await.unwrap();
    assert!(!other[0].read);

    app.notifier.mark_all_read("sue", Role::Server).await.unwrap();
    app.notifier.mark_all_read("sue", Role::Server).await.unwrap();
    assert_eq!(app.notifier.unread_count("sue", Role::Server).await.unwrap(), 0);
}

#[tokio::test]
async fn test_ready_order_pings_claiming_server_directly() {
    let app = app().await;
    let dish = seed_dish(&app.db, "tart", price("5.50"), vec![]).await;
    let client = user(Role::Client, "mia");
    let chef = user(Role::Chef, "carl");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);
    app.engine.start(&chef, &order_id).await.unwrap();
    app.engine
        .mark_item_done(&chef, &order_id, &id_string(&view.items[0].id))
        .await
        .unwrap();
    app.engine.finish(&chef, &order_id).await.unwrap();

    // No claim yet: broadcast to the whole floor
    let inbox = app.notifier.list_for("any-server", Role::Server).await.unwrap();
    assert!(inbox.iter().any(|v| {
        v.notification.kind == "order-ready" && v.notification.recipient.is_none()
    }));
}

#[tokio::test]
async fn test_premature_serve_leaves_order_claimable() {
    let app = app().await;
    let dish = seed_dish(&app.db, "tarte", price("6.00"), vec![]).await;
    let client = user(Role::Client, "gina");
    let chef = user(Role::Chef, "carl");
    let server_a = user(Role::Server, "server-a");
    let server_b = user(Role::Server, "server-b");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 1)], None))
        .await
        .unwrap();
    let order_id = id_string(&view.order.id);

    // Serving a pending order fails without claiming it
    let err = app.engine.serve(&server_a, &order_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    app.engine.start(&chef, &order_id).await.unwrap();
    app.engine
        .mark_item_done(&chef, &order_id, &id_string(&view.items[0].id))
        .await
        .unwrap();
    app.engine.finish(&chef, &order_id).await.unwrap();

    // The failed attempt left no claim behind, so any server may serve
    let served = app.engine.serve(&server_b, &order_id).await.unwrap();
    assert_eq!(served.state, OrderState::Served);
}

#[tokio::test]
async fn test_amounts_serialize_as_decimals() {
    let app = app().await;
    let dish = seed_dish(&app.db, "quiche", price("10.00"), vec![]).await;
    let client = user(Role::Client, "alice");

    let view = app
        .engine
        .create(&client, order_payload(vec![(&id_string(&dish.id), 2)], None))
        .await
        .unwrap();

    // Totals sum in integer minor units but leave the process as decimals
    assert_eq!(view.order.total.minor(), 2000);
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["total"], serde_json::json!("20.00"));
    assert_eq!(json["items"][0]["unit_price"], serde_json::json!("10.00"));

    let menu = serde_json::to_value(&dish).unwrap();
    assert_eq!(menu["price"], serde_json::json!("10.00"));
}
