//! Catalog service
//!
//! Read-model over dishes, categories and ingredients. Dish documents
//! are cached in a lock-free map keyed by record id; every catalog
//! write clears the cache. The order engine and the stock service get
//! their dish → recipe expansion from here.

use dashmap::DashMap;
use shared::{AppError, AppResult, ErrorCode};
use std::collections::BTreeMap;
use std::sync::Arc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::models::Dish;
use crate::db::repository::DishRepository;

#[derive(Clone)]
pub struct CatalogService {
    dishes: DishRepository,
    cache: Arc<DashMap<String, Dish>>,
}

impl CatalogService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            dishes: DishRepository::new(db),
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Fetch a dish, from cache when possible
    pub async fn dish(&self, id: &RecordId) -> AppResult<Dish> {
        let key = id.to_string();
        if let Some(dish) = self.cache.get(&key) {
            return Ok(dish.clone());
        }

        let dish = self
            .dishes
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::new(ErrorCode::DishNotFound).with_detail("dish", key.clone())
            })?;
        self.cache.insert(key, dish.clone());
        Ok(dish)
    }

    /// Drop one cached dish
    pub fn invalidate(&self, id: &RecordId) {
        self.cache.remove(&id.to_string());
    }

    /// Drop the whole cache; called on any catalog write
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Total ingredient draw for a set of (dish, quantity) pairs
    ///
    /// Aggregated by ingredient name: recipe grams × item quantity,
    /// summed across items that share an ingredient.
    pub fn required_draws(items: &[(Dish, i64)]) -> Vec<(String, f64)> {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for (dish, quantity) in items {
            for line in &dish.recipe {
                *totals.entry(line.ingredient.clone()).or_insert(0.0) +=
                    line.grams * *quantity as f64;
            }
        }
        totals.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RecipeLine;
    use shared::Money;

    fn dish(name: &str, recipe: Vec<RecipeLine>) -> Dish {
        Dish {
            id: None,
            name: name.to_string(),
            price: Money::from_minor(1000),
            category: None,
            subcategory: None,
            prep_minutes: None,
            rating: None,
            recipe,
        }
    }

    #[test]
    fn test_required_draws_aggregates_by_ingredient() {
        let d1 = dish(
            "ratatouille",
            vec![
                RecipeLine {
                    ingredient: "tomato".into(),
                    grams: 50.0,
                },
                RecipeLine {
                    ingredient: "zucchini".into(),
                    grams: 30.0,
                },
            ],
        );
        let d2 = dish(
            "salad",
            vec![RecipeLine {
                ingredient: "tomato".into(),
                grams: 20.0,
            }],
        );

        let draws = CatalogService::required_draws(&[(d1, 2), (d2, 1)]);
        assert_eq!(
            draws,
            vec![
                ("tomato".to_string(), 120.0),
                ("zucchini".to_string(), 60.0),
            ]
        );
    }

    #[test]
    fn test_required_draws_empty_recipe() {
        let draws = CatalogService::required_draws(&[(dish("water", vec![]), 3)]);
        assert!(draws.is_empty());
    }
}
