//! Dinner recommendation orchestration
//!
//! Glues the inventory snapshot, the chat-completion client and the
//! cookbook together: one call produces a recommendation and lands it in
//! the recent tier.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::openai::{CuisinePreference, DinnerRecommendation, OpenAiClient};
use crate::services::cookbook::CookbookService;
use crate::services::inventory::InventoryService;

#[derive(Clone)]
pub struct DinnerService {
    client: OpenAiClient,
    inventory: InventoryService,
    cookbook: CookbookService,
}

impl DinnerService {
    pub fn new(
        client: OpenAiClient,
        inventory: InventoryService,
        cookbook: CookbookService,
    ) -> Self {
        Self {
            client,
            inventory,
            cookbook,
        }
    }

    /// Recommend a dinner from the current inventory and save it as a
    /// recent recipe.
    pub async fn recommend(
        &self,
        cuisine: CuisinePreference,
        now: DateTime<Utc>,
    ) -> Result<DinnerRecommendation> {
        let items = self.inventory.list_items().await?;

        let recommendation = self.client.recommend_dinner(&items, cuisine, now).await?;

        self.cookbook
            .save_recommendation(&recommendation, false)
            .await?;

        Ok(recommendation)
    }
}
