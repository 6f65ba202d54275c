//! Dish and Category Models

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::Money;
use surrealdb::RecordId;

/// One recipe line: grams of a named ingredient per single portion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient: String,
    pub grams: f64,
}

/// Dish entity
///
/// Price is carried in minor units and crosses the wire as a decimal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: Money,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub category: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub subcategory: Option<RecordId>,
    #[serde(default)]
    pub prep_minutes: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub recipe: Vec<RecipeLine>,
}

/// Create dish payload
#[derive(Debug, Clone, Deserialize)]
pub struct DishCreate {
    pub name: String,
    pub price: rust_decimal::Decimal,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub category: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub subcategory: Option<RecordId>,
    #[serde(default)]
    pub prep_minutes: Option<i32>,
    #[serde(default)]
    pub recipe: Vec<RecipeLine>,
}

/// Update dish payload
///
/// Field classes are role-gated: price and classification are manager
/// territory, recipe and prep fields belong to the kitchen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub price: Option<rust_decimal::Decimal>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub category: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub subcategory: Option<RecordId>,
    pub prep_minutes: Option<i32>,
    pub recipe: Option<Vec<RecipeLine>>,
}

impl DishUpdate {
    /// Price or classification change (manager-gated)
    pub fn touches_commercial_fields(&self) -> bool {
        self.price.is_some() || self.category.is_some() || self.subcategory.is_some()
    }

    /// Recipe or prep change (chef-gated)
    pub fn touches_kitchen_fields(&self) -> bool {
        self.recipe.is_some() || self.prep_minutes.is_some()
    }
}

/// Category entity (categories and sub-categories share the collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub parent: Option<RecordId>,
}

/// Create category payload
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub parent: Option<RecordId>,
}
