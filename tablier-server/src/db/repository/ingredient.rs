//! Ingredient Repository
//!
//! Stock draws for order starts are a cross-collection transaction and
//! live in the stock service; this repository covers CRUD, restock, and
//! low-stock flagging.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Ingredient, IngredientCreate};
use shared::Money;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "ingredient";

#[derive(Clone)]
pub struct IngredientRepository {
    base: BaseRepository,
}

impl IngredientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        record_id(TABLE, id)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Ingredient>> {
        let ingredients: Vec<Ingredient> = self
            .base
            .db()
            .query("SELECT * FROM ingredient ORDER BY name")
            .await?
            .take(0)?;
        Ok(ingredients)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Ingredient>> {
        let ingredient: Option<Ingredient> = self.base.db().select(id.clone()).await?;
        Ok(ingredient)
    }

    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Ingredient>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM ingredient WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let ingredients: Vec<Ingredient> = result.take(0)?;
        Ok(ingredients.into_iter().next())
    }

    pub async fn find_by_names(&self, names: Vec<String>) -> RepoResult<Vec<Ingredient>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM ingredient WHERE name IN $names")
            .bind(("names", names))
            .await?;
        let ingredients: Vec<Ingredient> = result.take(0)?;
        Ok(ingredients)
    }

    pub async fn create(&self, data: IngredientCreate) -> RepoResult<Ingredient> {
        if data.quantity < 0.0 || data.alert_threshold < 0.0 {
            return Err(RepoError::Validation(
                "Quantity and alert threshold must be non-negative".into(),
            ));
        }
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Ingredient '{}' already exists",
                data.name
            )));
        }

        let unit_cost = match data.unit_cost {
            Some(c) => Some(
                Money::from_decimal(c).map_err(|e| RepoError::Validation(e.to_string()))?,
            ),
            None => None,
        };

        let low_stock = data.quantity < data.alert_threshold;
        let ingredient = Ingredient {
            id: None,
            name: data.name,
            category: data.category,
            unit: data.unit,
            quantity: data.quantity,
            alert_threshold: data.alert_threshold,
            low_stock,
            unit_cost,
            expires_at: data.expires_at,
        };

        let created: Option<Ingredient> =
            self.base.db().create(TABLE).content(ingredient).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create ingredient".to_string()))
    }

    /// Add stock, clear the low-stock flag when back above threshold,
    /// and append to the restock log — one transaction
    pub async fn restock(
        &self,
        id: &RecordId,
        quantity: f64,
        restocked_by: &str,
    ) -> RepoResult<Ingredient> {
        if quantity <= 0.0 {
            return Err(RepoError::Validation(
                "Restock quantity must be positive".into(),
            ));
        }

        let result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $i = (UPDATE $thing SET quantity += $qty RETURN AFTER); \
                 IF array::len($i) == 0 { THROW 'not-found' }; \
                 UPDATE $thing SET low_stock = false WHERE quantity >= alert_threshold; \
                 CREATE restock_log CONTENT { \
                     ingredient: <string> $thing, \
                     restocked_by: $by, \
                     quantity: $qty, \
                     created_at: time::now() \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("thing", id.clone()))
            .bind(("qty", quantity))
            .bind(("by", restocked_by.to_string()))
            .await?;

        if let Err(e) = result.check() {
            let text = e.to_string();
            if text.contains("not-found") {
                return Err(RepoError::NotFound(format!("Ingredient {} not found", id)));
            }
            return Err(RepoError::Database(text));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Ingredient {} not found", id)))
    }

    /// Flag ingredients that have just crossed below their threshold
    ///
    /// Returns only the newly flagged ones, so each crossing notifies
    /// exactly once until a restock clears the flag.
    pub async fn flag_low_stock(&self, names: Vec<String>) -> RepoResult<Vec<Ingredient>> {
        if names.is_empty() {
            return Ok(vec![]);
        }
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE ingredient SET low_stock = true \
                 WHERE name IN $names AND quantity < alert_threshold AND low_stock = false \
                 RETURN AFTER",
            )
            .bind(("names", names))
            .await?;
        let flagged: Vec<Ingredient> = result.take(0)?;
        Ok(flagged)
    }
}
