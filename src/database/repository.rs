//! Repository layer for database operations
//!
//! CRUD operations for all entities. Sort-order rewrites run inside
//! transactions so a reorder is all-or-nothing.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Food items =====

    /// Create a new food item
    pub async fn create_item(&self, req: CreateFoodItemRequest) -> Result<FoodItem> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let item = sqlx::query_as::<_, FoodItem>(
            r#"
            INSERT INTO food_items (id, name, quantity, date_added, expiry_date, photo_hash, notes, location_id, category_id)
            VALUES (?, ?, ?, ?, ?, NULL, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(req.quantity)
        .bind(now)
        .bind(req.expiry_date)
        .bind(&req.notes)
        .bind(&req.location_id)
        .bind(&req.category_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created food item: {}", id);
        Ok(item)
    }

    /// Get a food item by ID
    pub async fn get_item(&self, id: &str) -> Result<FoodItem> {
        sqlx::query_as::<_, FoodItem>("SELECT * FROM food_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))
    }

    /// List all food items, newest first.
    ///
    /// This ordering is the base order the query engine preserves.
    pub async fn list_items(&self) -> Result<Vec<FoodItem>> {
        let items = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT * FROM food_items ORDER BY date_added DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Update a food item.
    ///
    /// Read-modify-write: `date_added` is immutable and never rewritten.
    pub async fn update_item(&self, id: &str, req: UpdateFoodItemRequest) -> Result<FoodItem> {
        let mut item = self.get_item(id).await?;

        if let Some(name) = req.name {
            item.name = name;
        }
        if let Some(quantity) = req.quantity {
            item.quantity = quantity;
        }
        if let Some(expiry_date) = req.expiry_date {
            item.expiry_date = expiry_date;
        }
        if let Some(notes) = req.notes {
            item.notes = notes;
        }
        if let Some(location_id) = req.location_id {
            item.location_id = location_id;
        }
        if let Some(category_id) = req.category_id {
            item.category_id = category_id;
        }

        let updated = sqlx::query_as::<_, FoodItem>(
            r#"
            UPDATE food_items
            SET name = ?, quantity = ?, expiry_date = ?, notes = ?, location_id = ?, category_id = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.expiry_date)
        .bind(&item.notes)
        .bind(&item.location_id)
        .bind(&item.category_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Updated food item: {}", id);
        Ok(updated)
    }

    /// Set or clear the out-of-line photo hash for an item
    pub async fn set_item_photo(&self, id: &str, photo_hash: Option<&str>) -> Result<()> {
        let rows = sqlx::query("UPDATE food_items SET photo_hash = ? WHERE id = ?")
            .bind(photo_hash)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ItemNotFound(id.to_string()));
        }

        Ok(())
    }

    /// Number of items referencing a photo hash.
    ///
    /// Identical photos dedup to one blob, so a blob may only be deleted
    /// once this reaches zero.
    pub async fn count_items_with_photo(&self, photo_hash: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM food_items WHERE photo_hash = ?")
                .bind(photo_hash)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Delete a food item
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM food_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ItemNotFound(id.to_string()));
        }

        tracing::debug!("Deleted food item: {}", id);
        Ok(())
    }

    // ===== Storage locations =====

    /// Create a storage location, appended after the current last sort order
    pub async fn create_location(
        &self,
        name: &str,
        icon: &str,
        color_hex: &str,
        is_default: bool,
    ) -> Result<StorageLocation> {
        let id = Uuid::new_v4().to_string();

        let location = sqlx::query_as::<_, StorageLocation>(
            r#"
            INSERT INTO storage_locations (id, name, icon, color_hex, sort_order, is_default)
            VALUES (?, ?, ?, ?, (SELECT COALESCE(MAX(sort_order), -1) + 1 FROM storage_locations), ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(icon)
        .bind(color_hex)
        .bind(is_default)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created storage location: {} ({})", name, id);
        Ok(location)
    }

    /// List storage locations in display order
    pub async fn list_locations(&self) -> Result<Vec<StorageLocation>> {
        let locations = sqlx::query_as::<_, StorageLocation>(
            r#"
            SELECT * FROM storage_locations ORDER BY sort_order ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }

    /// Update a storage location's display attributes
    pub async fn update_location(
        &self,
        id: &str,
        name: &str,
        icon: &str,
        color_hex: &str,
    ) -> Result<StorageLocation> {
        sqlx::query_as::<_, StorageLocation>(
            r#"
            UPDATE storage_locations SET name = ?, icon = ?, color_hex = ? WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(icon)
        .bind(color_hex)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::LocationNotFound(id.to_string()))
    }

    /// Rewrite sort orders for a set of locations in one transaction
    pub async fn set_location_orders(&self, orders: &[(String, i64)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (id, sort_order) in orders {
            sqlx::query("UPDATE storage_locations SET sort_order = ? WHERE id = ?")
                .bind(sort_order)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!("Rewrote sort order for {} locations", orders.len());
        Ok(())
    }

    /// Delete a storage location.
    ///
    /// Items in the location are deleted with it (ON DELETE CASCADE).
    pub async fn delete_location(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM storage_locations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::LocationNotFound(id.to_string()));
        }

        tracing::debug!("Deleted storage location: {}", id);
        Ok(())
    }

    pub async fn count_locations(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM storage_locations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ===== Food categories =====

    /// Create a category, appended after the current last sort order
    pub async fn create_category(
        &self,
        name: &str,
        icon: &str,
        is_default: bool,
    ) -> Result<FoodCategory> {
        let id = Uuid::new_v4().to_string();

        let category = sqlx::query_as::<_, FoodCategory>(
            r#"
            INSERT INTO food_categories (id, name, icon, sort_order, is_default)
            VALUES (?, ?, ?, (SELECT COALESCE(MAX(sort_order), -1) + 1 FROM food_categories), ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(icon)
        .bind(is_default)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created category: {} ({})", name, id);
        Ok(category)
    }

    /// List categories in display order
    pub async fn list_categories(&self) -> Result<Vec<FoodCategory>> {
        let categories = sqlx::query_as::<_, FoodCategory>(
            r#"
            SELECT * FROM food_categories ORDER BY sort_order ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Update a category's display attributes
    pub async fn update_category(&self, id: &str, name: &str, icon: &str) -> Result<FoodCategory> {
        sqlx::query_as::<_, FoodCategory>(
            r#"
            UPDATE food_categories SET name = ?, icon = ? WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(icon)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound(id.to_string()))
    }

    /// Rewrite sort orders for a set of categories in one transaction
    pub async fn set_category_orders(&self, orders: &[(String, i64)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (id, sort_order) in orders {
            sqlx::query("UPDATE food_categories SET sort_order = ? WHERE id = ?")
                .bind(sort_order)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!("Rewrote sort order for {} categories", orders.len());
        Ok(())
    }

    /// Delete a category.
    ///
    /// Items keep existing but become uncategorized (ON DELETE SET NULL).
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM food_categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::CategoryNotFound(id.to_string()));
        }

        tracing::debug!("Deleted category: {}", id);
        Ok(())
    }

    pub async fn count_categories(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM food_categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ===== Recipes =====

    /// Insert a recipe
    pub async fn insert_recipe(&self, req: CreateRecipeRequest) -> Result<Recipe> {
        self.insert_recipe_evicting(req, &[]).await
    }

    /// Insert a recipe, deleting the given recipe ids in the same
    /// transaction. Either the evictions and the insert all land or none
    /// do.
    pub async fn insert_recipe_evicting(
        &self,
        req: CreateRecipeRequest,
        evict_ids: &[String],
    ) -> Result<Recipe> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        for evict_id in evict_ids {
            sqlx::query("DELETE FROM recipes WHERE id = ?")
                .bind(evict_id)
                .execute(&mut *tx)
                .await?;
        }

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (
                id, dish_name, cuisine, ingredients_json, steps_json, cooking_time,
                difficulty, video_search_chinese, video_search_english, video_link,
                reason, date_created, is_favorite
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.dish_name)
        .bind(&req.cuisine)
        .bind(&req.ingredients_json)
        .bind(&req.steps_json)
        .bind(&req.cooking_time)
        .bind(&req.difficulty)
        .bind(&req.video_search_chinese)
        .bind(&req.video_search_english)
        .bind(&req.video_link)
        .bind(&req.reason)
        .bind(now)
        .bind(req.is_favorite)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if !evict_ids.is_empty() {
            tracing::debug!("Evicted {} recipes beyond retention cap", evict_ids.len());
        }
        tracing::debug!("Saved recipe: {} ({})", req.dish_name, id);
        Ok(recipe)
    }

    /// List all recipes, newest first
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT * FROM recipes ORDER BY date_created DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// List recipes by favorite flag, newest first
    pub async fn list_recipes_by_favorite(&self, is_favorite: bool) -> Result<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT * FROM recipes WHERE is_favorite = ? ORDER BY date_created DESC
            "#,
        )
        .bind(is_favorite)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// Find a recipe by its dedup key (dish name within a favorite tier)
    pub async fn find_recipe_by_dish(
        &self,
        dish_name: &str,
        is_favorite: bool,
    ) -> Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT * FROM recipes WHERE dish_name = ? AND is_favorite = ?
            ORDER BY date_created DESC LIMIT 1
            "#,
        )
        .bind(dish_name)
        .bind(is_favorite)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }

    /// Flip the favorite flag on a recipe
    pub async fn set_recipe_favorite(&self, id: &str, is_favorite: bool) -> Result<()> {
        let rows = sqlx::query("UPDATE recipes SET is_favorite = ? WHERE id = ?")
            .bind(is_favorite)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::RecipeNotFound(id.to_string()));
        }

        tracing::debug!("Set favorite = {} on recipe: {}", is_favorite, id);
        Ok(())
    }

    /// Delete a recipe
    pub async fn delete_recipe(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::RecipeNotFound(id.to_string()));
        }

        tracing::debug!("Deleted recipe: {}", id);
        Ok(())
    }
}
