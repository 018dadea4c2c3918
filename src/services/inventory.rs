//! Inventory service
//!
//! Orchestrates item, location and category operations over the
//! repository and the photo store: first-launch seeding, quantity
//! decrement, the filtered view and drag-reorder persistence.

use chrono::{DateTime, Utc};

use crate::database::{
    CreateFoodItemRequest, FoodCategory, FoodItem, Repository, StorageLocation,
    UpdateFoodItemRequest,
};
use crate::error::Result;
use crate::inventory::query::{filter_items, renumber_after_move, FilterCriteria};
use crate::storage::PhotoStore;

/// Seeded on first launch, marked default so the UI can protect them.
const DEFAULT_LOCATIONS: [(&str, &str, &str); 2] = [
    ("Fridge", "refrigerator", "2196F3"),
    ("Freezer", "snowflake", "00BCD4"),
];

const DEFAULT_CATEGORIES: [(&str, &str); 8] = [
    ("Meat", "🥩"),
    ("Vegetables", "🥬"),
    ("Fruits", "🍎"),
    ("Dairy", "🥛"),
    ("Bread", "🍞"),
    ("Beverages", "🧃"),
    ("Prepared Meals", "🍱"),
    ("Other", "📦"),
];

/// High-level inventory operations
#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
    photos: PhotoStore,
}

impl InventoryService {
    pub fn new(repository: Repository, photos: PhotoStore) -> Self {
        Self { repository, photos }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Seed the default locations and categories on first launch.
    ///
    /// Each table is seeded only while it is empty, so user deletions of
    /// the defaults are never undone.
    pub async fn seed_defaults(&self) -> Result<()> {
        if self.repository.count_locations().await? == 0 {
            for (name, icon, color_hex) in DEFAULT_LOCATIONS {
                self.repository
                    .create_location(name, icon, color_hex, true)
                    .await?;
            }
            tracing::info!("Seeded default storage locations");
        }

        if self.repository.count_categories().await? == 0 {
            for (name, icon) in DEFAULT_CATEGORIES {
                self.repository.create_category(name, icon, true).await?;
            }
            tracing::info!("Seeded default categories");
        }

        Ok(())
    }

    // ===== Items =====

    pub async fn add_item(&self, req: CreateFoodItemRequest) -> Result<FoodItem> {
        self.repository.create_item(req).await
    }

    pub async fn get_item(&self, id: &str) -> Result<FoodItem> {
        self.repository.get_item(id).await
    }

    pub async fn list_items(&self) -> Result<Vec<FoodItem>> {
        self.repository.list_items().await
    }

    /// The filtered inventory view: a fresh snapshot run through the
    /// query engine at the given instant.
    pub async fn items_filtered(
        &self,
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
    ) -> Result<Vec<FoodItem>> {
        let items = self.repository.list_items().await?;
        Ok(filter_items(&items, criteria, now))
    }

    pub async fn update_item(&self, id: &str, req: UpdateFoodItemRequest) -> Result<FoodItem> {
        self.repository.update_item(id, req).await
    }

    /// Use up one unit. At quantity 1 (or less) the item is removed
    /// entirely, photo included.
    pub async fn decrement_quantity(&self, id: &str) -> Result<Option<FoodItem>> {
        let item = self.repository.get_item(id).await?;

        if item.quantity <= 1 {
            self.delete_item(id).await?;
            tracing::debug!("Used up last unit of item: {}", id);
            return Ok(None);
        }

        let updated = self
            .repository
            .update_item(
                id,
                UpdateFoodItemRequest {
                    quantity: Some(item.quantity - 1),
                    ..Default::default()
                },
            )
            .await?;

        Ok(Some(updated))
    }

    /// Delete an item and its stored photo, if any
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        let item = self.repository.get_item(id).await?;

        self.repository.delete_item(id).await?;

        if let Some(hash) = &item.photo_hash {
            self.delete_photo_if_unreferenced(hash).await?;
        }

        Ok(())
    }

    // ===== Photos =====

    /// Delete a blob only once no item references it. Identical photos
    /// dedup to one blob, so a sibling item may still need it.
    async fn delete_photo_if_unreferenced(&self, hash: &str) -> Result<()> {
        if self.repository.count_items_with_photo(hash).await? == 0 {
            self.photos.delete(hash).await?;
        }
        Ok(())
    }

    /// Attach a photo to an item, replacing (and cleaning up) any
    /// previous one. Returns the content hash.
    pub async fn attach_photo(&self, id: &str, data: &[u8]) -> Result<String> {
        let item = self.repository.get_item(id).await?;

        let hash = self.photos.write(data).await?;
        self.repository.set_item_photo(id, Some(&hash)).await?;

        if let Some(previous) = &item.photo_hash {
            if previous != &hash {
                self.delete_photo_if_unreferenced(previous).await?;
            }
        }

        Ok(hash)
    }

    /// Detach and delete an item's photo; a no-op when it has none
    pub async fn clear_photo(&self, id: &str) -> Result<()> {
        let item = self.repository.get_item(id).await?;

        let Some(hash) = item.photo_hash else {
            return Ok(());
        };

        self.repository.set_item_photo(id, None).await?;
        self.delete_photo_if_unreferenced(&hash).await?;

        Ok(())
    }

    /// Read an item's photo bytes
    pub async fn photo_bytes(&self, hash: &str) -> Result<Vec<u8>> {
        self.photos.read(hash).await
    }

    // ===== Locations =====

    pub async fn add_location(
        &self,
        name: &str,
        icon: &str,
        color_hex: &str,
    ) -> Result<StorageLocation> {
        self.repository
            .create_location(name, icon, color_hex, false)
            .await
    }

    pub async fn list_locations(&self) -> Result<Vec<StorageLocation>> {
        self.repository.list_locations().await
    }

    pub async fn update_location(
        &self,
        id: &str,
        name: &str,
        icon: &str,
        color_hex: &str,
    ) -> Result<StorageLocation> {
        self.repository.update_location(id, name, icon, color_hex).await
    }

    /// Delete a location; its items (and their photos) go with it
    pub async fn delete_location(&self, id: &str) -> Result<()> {
        // Collect photo hashes before the cascade removes the rows
        let orphaned: Vec<String> = self
            .repository
            .list_items()
            .await?
            .into_iter()
            .filter(|item| item.location_id.as_deref() == Some(id))
            .filter_map(|item| item.photo_hash)
            .collect();

        self.repository.delete_location(id).await?;

        for hash in orphaned {
            self.delete_photo_if_unreferenced(&hash).await?;
        }

        Ok(())
    }

    /// Move a location from one display position to another and persist
    /// the resulting dense order.
    pub async fn reorder_locations(&self, from: usize, to: usize) -> Result<Vec<StorageLocation>> {
        let mut locations = self.repository.list_locations().await?;
        renumber_after_move(&mut locations, from, to);

        let orders: Vec<(String, i64)> = locations
            .iter()
            .map(|l| (l.id.clone(), l.sort_order))
            .collect();
        self.repository.set_location_orders(&orders).await?;

        Ok(locations)
    }

    // ===== Categories =====

    pub async fn add_category(&self, name: &str, icon: &str) -> Result<FoodCategory> {
        self.repository.create_category(name, icon, false).await
    }

    pub async fn list_categories(&self) -> Result<Vec<FoodCategory>> {
        self.repository.list_categories().await
    }

    pub async fn update_category(&self, id: &str, name: &str, icon: &str) -> Result<FoodCategory> {
        self.repository.update_category(id, name, icon).await
    }

    /// Delete a category; its items stay, uncategorized
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.repository.delete_category(id).await
    }

    /// Move a category from one display position to another and persist
    /// the resulting dense order.
    pub async fn reorder_categories(&self, from: usize, to: usize) -> Result<Vec<FoodCategory>> {
        let mut categories = self.repository.list_categories().await?;
        renumber_after_move(&mut categories, from, to);

        let orders: Vec<(String, i64)> = categories
            .iter()
            .map(|c| (c.id.clone(), c.sort_order))
            .collect();
        self.repository.set_category_orders(&orders).await?;

        Ok(categories)
    }
}
