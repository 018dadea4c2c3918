//! Recipe retention
//!
//! Saved recommendations live in two tiers: a bounded recent list and an
//! unbounded favorites list. The recent tier keeps at most
//! [`RECENT_RECIPE_CAP`] recipes, oldest evicted first; favorites are
//! exempt. Within a tier a dish name appears at most once.

use chrono::{DateTime, Datelike, Utc};

use crate::config::RECENT_RECIPE_CAP;
use crate::database::{CreateRecipeRequest, Recipe, Repository};
use crate::error::{AppError, Result};
use crate::openai::DinnerRecommendation;

/// Saved-recipe operations
#[derive(Clone)]
pub struct CookbookService {
    repository: Repository,
}

impl CookbookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Persist a recommendation.
    ///
    /// A dish already saved in the target tier is not inserted again; the
    /// existing recipe is returned. Saving into the recent tier evicts the
    /// oldest recipes beyond the cap first; favorites are never evicted.
    pub async fn save_recommendation(
        &self,
        recommendation: &DinnerRecommendation,
        is_favorite: bool,
    ) -> Result<Recipe> {
        if let Some(existing) = self
            .repository
            .find_recipe_by_dish(&recommendation.dish_name, is_favorite)
            .await?
        {
            tracing::debug!(
                dish_name = %recommendation.dish_name,
                "Recipe already saved, skipping duplicate"
            );
            return Ok(existing);
        }

        // Build the row before touching the store so a serialization
        // failure evicts nothing
        let req = to_recipe_request(recommendation, is_favorite)?;

        let evict_ids = if is_favorite {
            Vec::new()
        } else {
            self.ids_beyond_cap().await?
        };

        // Evictions and insert commit together
        let recipe = self
            .repository
            .insert_recipe_evicting(req, &evict_ids)
            .await?;

        tracing::info!(
            dish_name = %recipe.dish_name,
            is_favorite,
            "Saved recipe"
        );
        Ok(recipe)
    }

    /// Recent recipes that must go to make room for one more.
    ///
    /// Newest first; everything past cap-1 goes so the insert lands at cap.
    async fn ids_beyond_cap(&self) -> Result<Vec<String>> {
        let recent = self.repository.list_recipes_by_favorite(false).await?;

        Ok(recent
            .into_iter()
            .skip(RECENT_RECIPE_CAP - 1)
            .map(|stale| stale.id)
            .collect())
    }

    /// Recent (non-favorite) recipes, newest first
    pub async fn recent(&self) -> Result<Vec<Recipe>> {
        self.repository.list_recipes_by_favorite(false).await
    }

    /// Favorite recipes, newest first
    pub async fn favorites(&self) -> Result<Vec<Recipe>> {
        self.repository.list_recipes_by_favorite(true).await
    }

    /// All recipes, newest first
    pub async fn all(&self) -> Result<Vec<Recipe>> {
        self.repository.list_recipes().await
    }

    /// Flip a recipe between the recent and favorite tiers.
    ///
    /// If the destination tier already holds the same dish, that copy is
    /// removed so the dish stays unique per tier.
    pub async fn toggle_favorite(&self, id: &str) -> Result<Recipe> {
        let recipe = self
            .repository
            .list_recipes()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))?;

        let target = !recipe.is_favorite;

        if let Some(duplicate) = self
            .repository
            .find_recipe_by_dish(&recipe.dish_name, target)
            .await?
        {
            self.repository.delete_recipe(&duplicate.id).await?;
        }

        self.repository.set_recipe_favorite(id, target).await?;

        Ok(Recipe {
            is_favorite: target,
            ..recipe
        })
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repository.delete_recipe(id).await
    }

    /// The most recent non-favorite recipe saved today (UTC calendar day),
    /// if any. Used to show "tonight's suggestion" without a new API call.
    pub async fn latest_recommendation(&self, now: DateTime<Utc>) -> Result<Option<Recipe>> {
        let recent = self.repository.list_recipes_by_favorite(false).await?;

        Ok(recent.into_iter().find(|recipe| {
            recipe.date_created.year() == now.year()
                && recipe.date_created.ordinal() == now.ordinal()
        }))
    }
}

/// Flatten a recommendation into the persisted row shape; the structured
/// fields are stored JSON-encoded.
fn to_recipe_request(
    recommendation: &DinnerRecommendation,
    is_favorite: bool,
) -> Result<CreateRecipeRequest> {
    Ok(CreateRecipeRequest {
        dish_name: recommendation.dish_name.clone(),
        cuisine: recommendation.cuisine.clone(),
        ingredients_json: serde_json::to_string(&recommendation.ingredients)?,
        steps_json: serde_json::to_string(&recommendation.steps)?,
        cooking_time: recommendation.cooking_time.clone(),
        difficulty: recommendation.difficulty.clone(),
        video_search_chinese: recommendation.video_search_chinese.clone(),
        video_search_english: recommendation.video_search_english.clone(),
        video_link: recommendation.video_link.clone(),
        reason: recommendation.reason.clone(),
        is_favorite,
    })
}
