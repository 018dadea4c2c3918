//! Dinner recommendation from the inventory snapshot
//!
//! Builds a prompt from the current items (expired stock is excluded,
//! expiring-soon stock is pushed to the front), asks the selected
//! reasoning model for one dish as JSON, and parses it leniently with
//! documented defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{RECOMMEND_MAX_TOKENS, RECOMMEND_TEMPERATURE};
use crate::database::{FoodItem, IngredientUsage};
use crate::error::{AppError, Result};
use crate::openai::chat::{ChatMessage, ChatRequest};
use crate::openai::json::{opt_str_field, slice_json_object, str_field, str_list_field};
use crate::openai::OpenAiClient;
use crate::services::credentials::ModelPurpose;

/// Cuisine direction for the recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CuisinePreference {
    #[default]
    Auto,
    Chinese,
    Western,
}

impl CuisinePreference {
    fn instruction(self) -> &'static str {
        match self {
            CuisinePreference::Auto => {
                "Prefer Chinese cuisine (家常菜), but suggest French or Italian if \
                 ingredients are much better suited for it"
            }
            CuisinePreference::Chinese => {
                "Chinese cuisine ONLY (be specific: 川菜/Sichuan, 粤菜/Cantonese, \
                 江浙菜/Jiangzhe, etc.)"
            }
            CuisinePreference::Western => {
                "WESTERN cuisine ONLY - French or Italian ONLY. NEVER suggest Chinese \
                 dishes. Choose between authentic French (Coq au Vin, Boeuf Bourguignon, \
                 Ratatouille) or Italian (Carbonara, Risotto, Osso Buco). NO other cuisines."
            }
        }
    }
}

/// One recommended dish
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DinnerRecommendation {
    pub dish_name: String,
    pub cuisine: String,
    pub ingredients: Vec<IngredientUsage>,
    pub steps: Vec<String>,
    pub cooking_time: String,
    pub difficulty: String,
    pub video_search_chinese: Option<String>,
    pub video_search_english: Option<String>,
    pub video_link: Option<String>,
    pub reason: String,
    /// Ingredients the dish needs that the inventory lacks
    pub shopping_list: Vec<String>,
}

impl OpenAiClient {
    /// Recommend one dinner dish from the inventory snapshot using the
    /// selected reasoning model.
    ///
    /// Fails with [`AppError::EmptyInventory`] before any network traffic
    /// when there is nothing usable to cook with.
    pub async fn recommend_dinner(
        &self,
        items: &[FoodItem],
        cuisine: CuisinePreference,
        now: DateTime<Utc>,
    ) -> Result<DinnerRecommendation> {
        let api_key = self.require_api_key()?;

        let usable: Vec<&FoodItem> = items.iter().filter(|i| !i.is_expired(now)).collect();
        if usable.is_empty() {
            return Err(AppError::EmptyInventory);
        }

        let model = self.credentials().selected_model(ModelPurpose::Reasoning)?;
        let request = ChatRequest::new(
            model,
            vec![
                ChatMessage::system(RECOMMEND_SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(&usable, cuisine, now)),
            ],
        )
        .with_output_limits(RECOMMEND_MAX_TOKENS, RECOMMEND_TEMPERATURE);

        let content = self.send(&api_key, &request).await?;

        let recommendation = parse_recommendation(&content)?;
        tracing::info!(
            dish_name = %recommendation.dish_name,
            cuisine = %recommendation.cuisine,
            "Dinner recommended"
        );
        Ok(recommendation)
    }
}

const RECOMMEND_SYSTEM_PROMPT: &str = "You are a professional chef specializing in home \
cooking. Create a delicious dinner recommendation that intelligently uses available \
ingredients while suggesting additional items to buy if needed. Respond with ONLY a valid \
JSON object, no text outside it.";

/// Fixed placeholder when the model omits a reason
const DEFAULT_REASON: &str = "A delicious meal using your available ingredients";

/// Render the usable inventory and output contract into the user prompt.
///
/// Expiring-soon items carry their remaining days so the model can weigh
/// urgency; already-expired items never reach the prompt.
fn build_prompt(usable: &[&FoodItem], cuisine: CuisinePreference, now: DateTime<Utc>) -> String {
    let mut expiring = String::new();
    let mut fresh = String::new();

    for item in usable {
        if item.is_expiring_soon(now) {
            expiring.push_str(&format!(
                "- {}: {} items, expires in {} days\n",
                item.name,
                item.quantity,
                item.days_until_expiry(now).unwrap_or(0)
            ));
        } else {
            fresh.push_str(&format!("- {}: {} items\n", item.name, item.quantity));
        }
    }

    format!(
        "Available Inventory (prioritize using these, especially expiring items):\n\
         Expiring Soon (use these first to reduce waste):\n{expiring}\n\
         Fresh Items:\n{fresh}\n\
         Cuisine Preference: {}\n\n\
         IMPORTANT GUIDELINES:\n\
         1. Create proper, restaurant-quality dishes that people actually want to eat\n\
         2. INTELLIGENTLY use expiring items where they fit naturally in the recipe\n\
         3. You CAN and SHOULD suggest additional ingredients to buy from the supermarket \
         to complete the dish\n\
         4. Mark clearly which ingredients come from inventory vs. which need to be purchased\n\
         5. Use authentic dish names (e.g., \"Coq au Vin\" for French, \"Carbonara\" for \
         Italian, \"麻婆豆腐\" for Sichuan)\n\
         6. Recipe steps should be detailed enough for a home cook to follow\n\n\
         LANGUAGE REQUIREMENTS:\n\
         - If creating a Chinese dish: write the recipe steps in Chinese (简体中文)\n\
         - If creating a Western (French/Italian) dish: write the recipe steps in English\n\n\
         Respond with ONLY a valid JSON object:\n\
         {{\n\
         \"dishName\": \"authentic name of the dish\",\n\
         \"cuisine\": \"specific cuisine type (e.g., 'Italian', 'French', 'Sichuan/川菜'), \
         NOT just 'Western' or 'Chinese'\",\n\
         \"ingredients\": [{{\"foodItem\": \"ingredient name\", \"quantity\": \"specific \
         amount (e.g., '2 pieces', '200g')\", \"isExpiringSoon\": true/false, \
         \"fromInventory\": true/false}}],\n\
         \"recipe\": [\"Step 1\", \"Step 2\", ...],\n\
         \"cookingTime\": \"realistic time (e.g., '30 minutes' or '30分钟')\",\n\
         \"difficulty\": \"Easy/Medium/Hard or 简单/中等/困难\",\n\
         \"videoSearchChinese\": \"Chinese search terms - ALWAYS provide\",\n\
         \"videoSearchEnglish\": \"English search terms - ONLY for Western cuisine, \
         null for Chinese\",\n\
         \"videoLink\": \"specific tutorial video URL if you know one, otherwise null\",\n\
         \"reason\": \"why this dish makes sense\",\n\
         \"shoppingList\": [\"items to buy from the supermarket\"]\n\
         }}",
        cuisine.instruction()
    )
}

/// Lenient parse with documented defaults; only a response with no JSON
/// object at all is rejected.
fn parse_recommendation(content: &str) -> Result<DinnerRecommendation> {
    let sliced = slice_json_object(content).ok_or_else(|| {
        AppError::InvalidResponse("No JSON object in recommendation response".to_string())
    })?;

    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(sliced) else {
        return Err(AppError::InvalidResponse(
            "Recommendation response is not a JSON object".to_string(),
        ));
    };

    let ingredients = object
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(parse_ingredient)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Ok(DinnerRecommendation {
        dish_name: str_field(&object, "dishName", "Mystery Dish"),
        cuisine: str_field(&object, "cuisine", "Fusion"),
        ingredients,
        steps: str_list_field(&object, "recipe"),
        cooking_time: str_field(&object, "cookingTime", "30 minutes"),
        difficulty: str_field(&object, "difficulty", "Medium"),
        video_search_chinese: opt_str_field(&object, "videoSearchChinese"),
        video_search_english: opt_str_field(&object, "videoSearchEnglish"),
        video_link: opt_str_field(&object, "videoLink"),
        reason: str_field(&object, "reason", DEFAULT_REASON),
        shopping_list: str_list_field(&object, "shoppingList"),
    })
}

/// Ingredient entries missing a name or amount are dropped rather than
/// failing the whole recommendation.
fn parse_ingredient(entry: &Value) -> Option<IngredientUsage> {
    let object = entry.as_object()?;
    Some(IngredientUsage {
        food_item: object.get("foodItem")?.as_str()?.to_string(),
        quantity: object.get("quantity")?.as_str()?.to_string(),
        is_expiring_soon: object
            .get("isExpiringSoon")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        from_inventory: object
            .get("fromInventory")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}
