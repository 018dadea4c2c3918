//! Integration tests for FreshKeeper
//!
//! These tests verify end-to-end functionality including:
//! - Database operations over a real file-backed pool
//! - First-launch seeding
//! - Filtered inventory views
//! - Photo storage round trips
//! - Recipe retention

use chrono::{Duration, Utc};
use freshkeeper::database::{create_pool, CreateFoodItemRequest, Repository};
use freshkeeper::inventory::{FilterCriteria, StatusFilter};
use freshkeeper::openai::DinnerRecommendation;
use freshkeeper::services::{CookbookService, InventoryService};
use freshkeeper::storage::PhotoStore;
use tempfile::TempDir;

/// Log output is opt-in via RUST_LOG when debugging a failing test
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Helper to create a service stack over a file-backed database
async fn create_test_services() -> (InventoryService, CookbookService, TempDir) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let pool = create_pool(&db_path).await.unwrap();
    let repo = Repository::new(pool);

    let photos = PhotoStore::new(temp_dir.path().join("photos"));
    photos.initialize().await.unwrap();

    let inventory = InventoryService::new(repo.clone(), photos);
    let cookbook = CookbookService::new(repo);

    (inventory, cookbook, temp_dir)
}

fn item_req(name: &str, quantity: i64) -> CreateFoodItemRequest {
    CreateFoodItemRequest {
        name: name.to_string(),
        quantity,
        expiry_date: None,
        notes: String::new(),
        location_id: None,
        category_id: None,
    }
}

fn recommendation(dish_name: &str) -> DinnerRecommendation {
    DinnerRecommendation {
        dish_name: dish_name.to_string(),
        cuisine: "Western".to_string(),
        ingredients: vec![],
        steps: vec!["Cook".to_string()],
        cooking_time: "30 minutes".to_string(),
        difficulty: "Medium".to_string(),
        video_search_chinese: None,
        video_search_english: None,
        video_link: None,
        reason: "test".to_string(),
        shopping_list: vec![],
    }
}

#[tokio::test]
async fn test_item_lifecycle() {
    let (inventory, _cookbook, _temp) = create_test_services().await;
    let now = Utc::now();

    let mut req = item_req("Milk", 2);
    req.expiry_date = Some(now + Duration::days(2));
    let item = inventory.add_item(req).await.unwrap();

    assert!(item.is_expiring_soon(now));
    assert!(!item.is_expired(now));

    // Use one unit, then the last; the item disappears
    let remaining = inventory.decrement_quantity(&item.id).await.unwrap();
    assert_eq!(remaining.unwrap().quantity, 1);

    assert!(inventory
        .decrement_quantity(&item.id)
        .await
        .unwrap()
        .is_none());
    assert!(inventory.get_item(&item.id).await.is_err());
}

#[tokio::test]
async fn test_seeding_and_structure_deletes() {
    let (inventory, _cookbook, _temp) = create_test_services().await;

    inventory.seed_defaults().await.unwrap();
    let locations = inventory.list_locations().await.unwrap();
    let categories = inventory.list_categories().await.unwrap();
    assert_eq!(locations.len(), 2);
    assert_eq!(categories.len(), 8);

    let mut in_fridge = item_req("Butter", 1);
    in_fridge.location_id = Some(locations[0].id.clone());
    in_fridge.category_id = Some(categories[3].id.clone());
    let item = inventory.add_item(in_fridge).await.unwrap();

    // Deleting the category leaves the item uncategorized
    inventory.delete_category(&categories[3].id).await.unwrap();
    let survivor = inventory.get_item(&item.id).await.unwrap();
    assert!(survivor.category_id.is_none());

    // Deleting the location takes the item with it
    inventory.delete_location(&locations[0].id).await.unwrap();
    assert!(inventory.get_item(&item.id).await.is_err());

    // Seeding again never resurrects deleted defaults
    inventory.seed_defaults().await.unwrap();
    assert_eq!(inventory.list_locations().await.unwrap().len(), 1);
    assert_eq!(inventory.list_categories().await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_filtered_view_end_to_end() {
    let (inventory, _cookbook, _temp) = create_test_services().await;
    let now = Utc::now();

    let mut expired = item_req("Old Yogurt", 1);
    expired.expiry_date = Some(now - Duration::days(2));
    inventory.add_item(expired).await.unwrap();

    let mut soon = item_req("Milk", 1);
    soon.expiry_date = Some(now + Duration::days(1));
    inventory.add_item(soon).await.unwrap();

    inventory.add_item(item_req("Rice", 1)).await.unwrap();

    let all = inventory
        .items_filtered(&FilterCriteria::default(), now)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    // Newest first
    assert_eq!(all[0].name, "Rice");

    let soon_view = inventory
        .items_filtered(
            &FilterCriteria {
                status: StatusFilter::ExpiringSoon,
                ..Default::default()
            },
            now,
        )
        .await
        .unwrap();
    assert_eq!(soon_view.len(), 1);
    assert_eq!(soon_view[0].name, "Milk");

    let expired_view = inventory
        .items_filtered(
            &FilterCriteria {
                status: StatusFilter::Expired,
                ..Default::default()
            },
            now,
        )
        .await
        .unwrap();
    assert_eq!(expired_view.len(), 1);
    assert_eq!(expired_view[0].name, "Old Yogurt");
}

#[tokio::test]
async fn test_reorder_survives_reload() {
    let (inventory, _cookbook, _temp) = create_test_services().await;

    for name in ["Pantry", "Fridge", "Freezer", "Cellar"] {
        inventory.add_location(name, "square", "FFFFFF").await.unwrap();
    }

    inventory.reorder_locations(3, 0).await.unwrap();

    let reloaded = inventory.list_locations().await.unwrap();
    let names: Vec<_> = reloaded.iter().map(|l| l.name.clone()).collect();
    assert_eq!(names, vec!["Cellar", "Pantry", "Fridge", "Freezer"]);

    let orders: Vec<_> = reloaded.iter().map(|l| l.sort_order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_photo_round_trip() {
    let (inventory, _cookbook, _temp) = create_test_services().await;

    let item = inventory.add_item(item_req("Tomato", 1)).await.unwrap();

    let hash = inventory
        .attach_photo(&item.id, b"jpeg bytes here")
        .await
        .unwrap();

    let stored = inventory.get_item(&item.id).await.unwrap();
    assert_eq!(stored.photo_hash.as_deref(), Some(hash.as_str()));
    assert_eq!(inventory.photo_bytes(&hash).await.unwrap(), b"jpeg bytes here");

    // Deleting the item cleans up its photo
    inventory.delete_item(&item.id).await.unwrap();
    assert!(inventory.photo_bytes(&hash).await.is_err());
}

#[tokio::test]
async fn test_recipe_retention_end_to_end() {
    let (_inventory, cookbook, _temp) = create_test_services().await;

    let keeper = cookbook
        .save_recommendation(&recommendation("Keeper"), false)
        .await
        .unwrap();
    cookbook.toggle_favorite(&keeper.id).await.unwrap();

    for i in 0..7 {
        cookbook
            .save_recommendation(&recommendation(&format!("Dish {i}")), false)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    // The recent tier is capped; the favorite survived the churn
    assert_eq!(cookbook.recent().await.unwrap().len(), 5);
    let favorites = cookbook.favorites().await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].dish_name, "Keeper");

    // Today's suggestion is the newest recent recipe
    let latest = cookbook
        .latest_recommendation(Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.dish_name, "Dish 6");
}
