//! Seating, reservation and assistance integration tests

mod common;

use chrono::{Duration, Utc};
use common::*;
use shared::{ErrorCode, Role, TableState};
use tablier_server::db::models::{
    AssistanceCreate, OrderCreate, OrderItemRequest, ReservationCreate,
};
use tablier_server::db::repository::DiningTableRepository;

fn reservation(party_size: i32) -> ReservationCreate {
    ReservationCreate {
        scheduled_at: Utc::now() + Duration::hours(2),
        party_size,
    }
}

async fn table_state(app: &TestApp, id: &surrealdb::RecordId) -> TableState {
    DiningTableRepository::new(app.db.clone())
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .state
}

#[tokio::test]
async fn test_reservation_picks_smallest_fitting_table() {
    let app = app().await;
    seed_table(&app.db, "T3", 2).await;
    let t5 = seed_table(&app.db, "T5", 4).await;
    seed_table(&app.db, "T7", 6).await;

    let client = user(Role::Client, "alice");
    let server = user(Role::Server, "sam");

    let placed = app
        .seating
        .create_reservation(&client, reservation(4))
        .await
        .unwrap();
    let t5_id = t5.id.clone().unwrap();
    assert_eq!(placed.table, t5_id);
    assert_eq!(table_state(&app, &t5_id).await, TableState::Reserved);

    let confirmed = app
        .seating
        .confirm_reservation(&server, &id_string(&placed.id))
        .await
        .unwrap();
    assert_eq!(
        confirmed.status,
        shared::ReservationStatus::Confirmed
    );
    assert_eq!(table_state(&app, &t5_id).await, TableState::Occupied);

    // Confirming twice is a conflict
    let err = app
        .seating
        .confirm_reservation(&server, &id_string(&placed.id))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationNotPending);
}

#[tokio::test]
async fn test_party_larger_than_any_table_is_validation() {
    let app = app().await;
    seed_table(&app.db, "T1", 4).await;
    let client = user(Role::Client, "bob");

    let err = app
        .seating
        .create_reservation(&client, reservation(10))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_no_free_fitting_table_is_conflict() {
    let app = app().await;
    seed_table(&app.db, "T1", 4).await;
    let alice = user(Role::Client, "alice");
    let bob = user(Role::Client, "bob");

    app.seating
        .create_reservation(&alice, reservation(3))
        .await
        .unwrap();

    // The only fitting table is now reserved
    let err = app
        .seating
        .create_reservation(&bob, reservation(3))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NoTableAvailable);
    assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancelled_reservation_frees_the_table() {
    let app = app().await;
    let t1 = seed_table(&app.db, "T1", 4).await;
    let alice = user(Role::Client, "alice");
    let mallory = user(Role::Client, "mallory");

    let placed = app
        .seating
        .create_reservation(&alice, reservation(2))
        .await
        .unwrap();
    let t1_id = t1.id.clone().unwrap();
    assert_eq!(table_state(&app, &t1_id).await, TableState::Reserved);

    // Only the owner (or staff) may cancel
    let err = app
        .seating
        .cancel_reservation(&mallory, &id_string(&placed.id))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

    app.seating
        .cancel_reservation(&alice, &id_string(&placed.id))
        .await
        .unwrap();
    assert_eq!(table_state(&app, &t1_id).await, TableState::Free);

    // Cancelling a settled reservation is a conflict
    let err = app
        .seating
        .cancel_reservation(&alice, &id_string(&placed.id))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationNotPending);
}

#[tokio::test]
async fn test_walk_in_order_occupies_free_table_until_freed() {
    let app = app().await;
    let t1 = seed_table(&app.db, "T1", 4).await;
    let dish = seed_dish(&app.db, "omelette", price("8.00"), vec![]).await;
    let guest = user(Role::Guest, "g-1");
    let chef = user(Role::Chef, "carl");
    let server = user(Role::Server, "sam");
    let t1_id = t1.id.clone().unwrap();

    let view = app
        .engine
        .create(
            &guest,
            OrderCreate {
                items: vec![OrderItemRequest {
                    dish: id_string(&dish.id),
                    quantity: 1,
                }],
                table: Some(t1_id.to_string()),
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(table_state(&app, &t1_id).await, TableState::Occupied);

    let order_id = id_string(&view.order.id);
    app.engine.start(&chef, &order_id).await.unwrap();
    app.engine
        .mark_item_done(&chef, &order_id, &id_string(&view.items[0].id))
        .await
        .unwrap();
    app.engine.finish(&chef, &order_id).await.unwrap();
    app.engine.serve(&server, &order_id).await.unwrap();

    // Serving never frees the table; that is an explicit step
    assert_eq!(table_state(&app, &t1_id).await, TableState::Occupied);

    app.seating.free_table(&server, &t1_id.to_string()).await.unwrap();
    assert_eq!(table_state(&app, &t1_id).await, TableState::Free);

    // Freeing a free table is a conflict
    let err = app
        .seating
        .free_table(&server, &t1_id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableUnavailable);
}

#[tokio::test]
async fn test_walk_in_on_missing_table_is_not_found() {
    let app = app().await;
    let dish = seed_dish(&app.db, "crepe", price("4.00"), vec![]).await;
    let guest = user(Role::Guest, "g-2");

    let err = app
        .engine
        .create(
            &guest,
            OrderCreate {
                items: vec![OrderItemRequest {
                    dish: id_string(&dish.id),
                    quantity: 1,
                }],
                table: Some("dining_table:nope".to_string()),
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNotFound);

    // The table check and the order write share a transaction, so the
    // failed create persisted nothing
    let manager = user(Role::Manager, "mona");
    let orders = app.engine.list(&manager, None).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_confirm_fails_when_table_no_longer_reserved() {
    let app = app().await;
    let t1 = seed_table(&app.db, "T1", 4).await;
    let client = user(Role::Client, "alice");
    let server = user(Role::Server, "sam");
    let t1_id = t1.id.clone().unwrap();

    let placed = app
        .seating
        .create_reservation(&client, reservation(2))
        .await
        .unwrap();

    // The table slips out of `reserved` behind the reservation's back
    DiningTableRepository::new(app.db.clone())
        .cas_state(&t1_id, TableState::Reserved, TableState::Free)
        .await
        .unwrap();

    let err = app
        .seating
        .confirm_reservation(&server, &id_string(&placed.id))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableUnavailable);

    // The whole confirmation rolled back: the reservation is still pending
    let listed = app.seating.list_reservations(&server).await.unwrap();
    assert_eq!(listed[0].status, shared::ReservationStatus::Pending);
}

#[tokio::test]
async fn test_assistance_flag_clears_with_last_open_request() {
    let app = app().await;
    let t1 = seed_table(&app.db, "T1", 4).await;
    let guest = user(Role::Guest, "g-3");
    let client = user(Role::Client, "alice");
    let server = user(Role::Server, "sam");
    let t1_id = t1.id.clone().unwrap();
    let t1_str = t1_id.to_string();

    let first = app
        .seating
        .request_assistance(
            &guest,
            &t1_str,
            AssistanceCreate {
                kind: "water".to_string(),
                note: None,
            },
        )
        .await
        .unwrap();
    let second = app
        .seating
        .request_assistance(
            &client,
            &t1_str,
            AssistanceCreate {
                kind: "cutlery".to_string(),
                note: Some("two forks".to_string()),
            },
        )
        .await
        .unwrap();

    let repo = DiningTableRepository::new(app.db.clone());
    assert!(repo.find_by_id(&t1_id).await.unwrap().unwrap().assistance_needed);

    // The floor got pinged
    let inbox = app.notifier.list_for("sam", Role::Server).await.unwrap();
    assert_eq!(
        inbox
            .iter()
            .filter(|v| v.notification.kind == "assistance")
            .count(),
        2
    );

    let open = app.seating.list_open_assistance(&server).await.unwrap();
    assert_eq!(open.len(), 2);

    // Resolving one keeps the flag: the other request is still open
    app.seating
        .resolve_assistance(&server, &id_string(&first.id))
        .await
        .unwrap();
    assert!(repo.find_by_id(&t1_id).await.unwrap().unwrap().assistance_needed);

    app.seating
        .resolve_assistance(&server, &id_string(&second.id))
        .await
        .unwrap();
    assert!(!repo.find_by_id(&t1_id).await.unwrap().unwrap().assistance_needed);

    // Resolving twice is a conflict
    let err = app
        .seating
        .resolve_assistance(&server, &id_string(&second.id))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_diners_cannot_resolve_and_staff_cannot_request() {
    let app = app().await;
    let t1 = seed_table(&app.db, "T1", 2).await;
    let guest = user(Role::Guest, "g-4");
    let server = user(Role::Server, "sam");
    let t1_str = t1.id.clone().unwrap().to_string();

    let err = app
        .seating
        .request_assistance(
            &server,
            &t1_str,
            AssistanceCreate {
                kind: "water".to_string(),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

    let request = app
        .seating
        .request_assistance(
            &guest,
            &t1_str,
            AssistanceCreate {
                kind: "water".to_string(),
                note: None,
            },
        )
        .await
        .unwrap();

    let err = app
        .seating
        .resolve_assistance(&guest, &id_string(&request.id))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
}
