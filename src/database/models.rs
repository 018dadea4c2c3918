//! Database models
//!
//! Rust structs representing persisted entities.
//! All models use serde for serialization to the application shell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Result;

/// A tracked food item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    /// Set at creation, immutable afterwards
    pub date_added: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    /// Content hash into the photo store; the image bytes live out-of-line
    pub photo_hash: Option<String>,
    pub notes: String,
    pub location_id: Option<String>,
    pub category_id: Option<String>,
}

/// Create food item request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFoodItemRequest {
    pub name: String,
    pub quantity: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    pub location_id: Option<String>,
    pub category_id: Option<String>,
}

/// Update food item request
///
/// `None` leaves a field untouched; the double-option fields distinguish
/// "don't change" from "clear".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFoodItemRequest {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    pub notes: Option<String>,
    pub location_id: Option<Option<String>>,
    pub category_id: Option<Option<String>>,
}

/// A place where food is kept (fridge, freezer, pantry...)
///
/// Deleting a location deletes its items (cascade).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StorageLocation {
    pub id: String,
    pub name: String,
    /// Icon token rendered by the shell
    pub icon: String,
    pub color_hex: String,
    pub sort_order: i64,
    pub is_default: bool,
}

/// A food category tag (emoji icon)
///
/// Deleting a category leaves its items uncategorized (nullify).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodCategory {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub sort_order: i64,
    pub is_default: bool,
}

/// A saved dinner recommendation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: String,
    pub dish_name: String,
    pub cuisine: String,
    /// JSON-encoded array of [`IngredientUsage`]
    pub ingredients_json: String,
    /// JSON-encoded array of step strings
    pub steps_json: String,
    pub cooking_time: String,
    pub difficulty: String,
    pub video_search_chinese: Option<String>,
    pub video_search_english: Option<String>,
    pub video_link: Option<String>,
    pub reason: String,
    pub date_created: DateTime<Utc>,
    pub is_favorite: bool,
}

impl Recipe {
    /// Decode the ingredient list stored on this recipe.
    pub fn ingredients(&self) -> Result<Vec<IngredientUsage>> {
        Ok(serde_json::from_str(&self.ingredients_json)?)
    }

    /// Decode the recipe steps stored on this recipe.
    pub fn steps(&self) -> Result<Vec<String>> {
        Ok(serde_json::from_str(&self.steps_json)?)
    }
}

/// Create recipe request
#[derive(Debug, Clone)]
pub struct CreateRecipeRequest {
    pub dish_name: String,
    pub cuisine: String,
    pub ingredients_json: String,
    pub steps_json: String,
    pub cooking_time: String,
    pub difficulty: String,
    pub video_search_chinese: Option<String>,
    pub video_search_english: Option<String>,
    pub video_link: Option<String>,
    pub reason: String,
    pub is_favorite: bool,
}

/// One ingredient line of a recommendation.
///
/// Serialized with the same camelCase keys the model is asked to produce,
/// so the persisted column and the API payload share one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientUsage {
    pub food_item: String,
    /// Free-text amount, e.g. "2 pieces" or "200g"
    pub quantity: String,
    #[serde(default)]
    pub is_expiring_soon: bool,
    #[serde(default)]
    pub from_inventory: bool,
}
