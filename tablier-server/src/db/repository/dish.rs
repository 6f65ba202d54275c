//! Dish and Category Repositories

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Category, CategoryCreate, Dish, DishCreate, DishUpdate};
use shared::Money;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "dish";
const CATEGORY_TABLE: &str = "category";

#[derive(Clone)]
pub struct DishRepository {
    base: BaseRepository,
}

impl DishRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        record_id(TABLE, id)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Dish>> {
        let dishes: Vec<Dish> = self
            .base
            .db()
            .query("SELECT * FROM dish ORDER BY name")
            .await?
            .take(0)?;
        Ok(dishes)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Dish>> {
        let dish: Option<Dish> = self.base.db().select(id.clone()).await?;
        Ok(dish)
    }

    pub async fn create(&self, data: DishCreate) -> RepoResult<Dish> {
        let price =
            Money::from_decimal(data.price).map_err(|e| RepoError::Validation(e.to_string()))?;
        if price == Money::ZERO {
            return Err(RepoError::Validation("Dish price must be positive".into()));
        }

        let dish = Dish {
            id: None,
            name: data.name,
            price,
            category: data.category,
            subcategory: data.subcategory,
            prep_minutes: data.prep_minutes,
            rating: None,
            recipe: data.recipe,
        };

        let created: Option<Dish> = self.base.db().create(TABLE).content(dish).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dish".to_string()))
    }

    pub async fn update(&self, id: &RecordId, data: DishUpdate) -> RepoResult<Dish> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dish {} not found", id)))?;

        let price = match data.price {
            Some(p) => {
                let p = Money::from_decimal(p)
                    .map_err(|e| RepoError::Validation(e.to_string()))?;
                if p == Money::ZERO {
                    return Err(RepoError::Validation("Dish price must be positive".into()));
                }
                p
            }
            None => existing.price,
        };

        let updated = Dish {
            id: Some(id.clone()),
            name: data.name.unwrap_or(existing.name),
            price,
            category: data.category.or(existing.category),
            subcategory: data.subcategory.or(existing.subcategory),
            prep_minutes: data.prep_minutes.or(existing.prep_minutes),
            rating: existing.rating,
            recipe: data.recipe.unwrap_or(existing.recipe),
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET name = $name, price = $price, category = $category, \
                 subcategory = $subcategory, prep_minutes = $prep_minutes, recipe = $recipe \
                 RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("name", updated.name))
            .bind(("price", updated.price))
            .bind(("category", updated.category.map(|c| c.to_string())))
            .bind(("subcategory", updated.subcategory.map(|c| c.to_string())))
            .bind(("prep_minutes", updated.prep_minutes))
            .bind(("recipe", updated.recipe))
            .await?;
        let dishes: Vec<Dish> = result.take(0)?;
        dishes
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Dish {} not found", id)))
    }
}

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let category = Category {
            id: None,
            name: data.name,
            parent: data.parent,
        };
        let created: Option<Category> = self
            .base
            .db()
            .create(CATEGORY_TABLE)
            .content(category)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }
}
