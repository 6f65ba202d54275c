//! Shared fixtures for the integration tests
//!
//! Everything runs against the in-memory engine; engines and
//! coordinators are exercised directly with constructed callers, the
//! same objects the HTTP layer would hand them.

use rust_decimal::Decimal;
use shared::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use tablier_server::CurrentUser;
use tablier_server::catalog::CatalogService;
use tablier_server::db::DbService;
use tablier_server::db::models::{
    DiningTable, DiningTableCreate, Dish, DishCreate, Ingredient, IngredientCreate, RecipeLine,
};
use tablier_server::db::repository::{
    DiningTableRepository, DishRepository, IngredientRepository,
};
use tablier_server::notify::NotificationBus;
use tablier_server::orders::OrderEngine;
use tablier_server::tables::TableCoordinator;

pub struct TestApp {
    pub db: Surreal<Db>,
    pub engine: OrderEngine,
    pub seating: TableCoordinator,
    pub notifier: NotificationBus,
}

pub async fn app() -> TestApp {
    let service = DbService::memory().await.expect("in-memory store");
    let db = service.db;
    let notifier = NotificationBus::new(db.clone());
    let catalog = CatalogService::new(db.clone());
    TestApp {
        engine: OrderEngine::new(db.clone(), catalog, notifier.clone()),
        seating: TableCoordinator::new(db.clone(), notifier.clone()),
        notifier,
        db,
    }
}

pub fn user(role: Role, id: &str) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        email: (role == Role::Client).then(|| format!("{id}@example.test")),
        role,
        is_guest: role == Role::Guest,
    }
}

pub fn price(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

pub async fn seed_ingredient(
    db: &Surreal<Db>,
    name: &str,
    quantity: f64,
    alert_threshold: f64,
) -> Ingredient {
    IngredientRepository::new(db.clone())
        .create(IngredientCreate {
            name: name.to_string(),
            category: None,
            unit: "g".to_string(),
            quantity,
            alert_threshold,
            unit_cost: None,
            expires_at: None,
        })
        .await
        .expect("seed ingredient")
}

pub async fn seed_dish(
    db: &Surreal<Db>,
    name: &str,
    price: Decimal,
    recipe: Vec<(&str, f64)>,
) -> Dish {
    DishRepository::new(db.clone())
        .create(DishCreate {
            name: name.to_string(),
            price,
            category: None,
            subcategory: None,
            prep_minutes: None,
            recipe: recipe
                .into_iter()
                .map(|(ingredient, grams)| RecipeLine {
                    ingredient: ingredient.to_string(),
                    grams,
                })
                .collect(),
        })
        .await
        .expect("seed dish")
}

pub async fn seed_table(db: &Surreal<Db>, name: &str, capacity: i32) -> DiningTable {
    DiningTableRepository::new(db.clone())
        .create(DiningTableCreate {
            name: name.to_string(),
            capacity,
        })
        .await
        .expect("seed table")
}

pub async fn ingredient_by_name(db: &Surreal<Db>, name: &str) -> Ingredient {
    IngredientRepository::new(db.clone())
        .find_by_name(name)
        .await
        .expect("ingredient lookup")
        .expect("ingredient exists")
}

pub fn id_string(id: &Option<surrealdb::RecordId>) -> String {
    id.as_ref().expect("record id").to_string()
}
