//! Food identification from a photo
//!
//! The image is downscaled and re-encoded as JPEG before upload, sent
//! inline as a base64 data URI, and the model is forced to answer with a
//! JSON object over a closed category vocabulary. Parsing runs strict
//! first, then lenient with per-field defaults, then fails.

use base64::prelude::{Engine, BASE64_STANDARD};
use image::codecs::jpeg::JpegEncoder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{
    CATEGORY_VOCABULARY, IDENTIFY_MAX_TOKENS, IDENTIFY_TEMPERATURE, MAX_IMAGE_BYTES,
    MAX_IMAGE_DIMENSION, UPLOAD_JPEG_QUALITY,
};
use crate::error::{AppError, Result};
use crate::openai::chat::{ChatMessage, ChatRequest};
use crate::openai::json::{opt_str_field, slice_json_object, str_field};
use crate::openai::OpenAiClient;
use crate::services::credentials::ModelPurpose;

/// The model's answer to "what food is this?"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodIdentification {
    pub food_name: String,
    /// One of the closed category vocabulary values
    pub category: String,
    /// "high", "medium" or "low"
    pub confidence: String,
    pub additional_info: Option<String>,
}

impl OpenAiClient {
    /// Identify the food shown in `image_bytes` using the selected vision
    /// model.
    pub async fn identify_food(&self, image_bytes: &[u8]) -> Result<FoodIdentification> {
        let api_key = self.require_api_key()?;

        let jpeg = prepare_upload_image(image_bytes)?;
        if jpeg.len() >= MAX_IMAGE_BYTES {
            return Err(AppError::ImageTooLarge);
        }

        let data_uri = format!("data:image/jpeg;base64,{}", BASE64_STANDARD.encode(&jpeg));
        let model = self.credentials().selected_model(ModelPurpose::Vision)?;

        let request = ChatRequest::new(
            model,
            vec![
                ChatMessage::system(identification_system_prompt()),
                ChatMessage::user_with_image("What food item is in this image?", data_uri),
            ],
        )
        .with_output_limits(IDENTIFY_MAX_TOKENS, IDENTIFY_TEMPERATURE);

        let content = self.send(&api_key, &request).await?;

        let identification = parse_identification(&content)?;
        tracing::info!(
            food_name = %identification.food_name,
            category = %identification.category,
            "Food identified"
        );
        Ok(identification)
    }
}

/// Decode, downscale to the upload dimension cap and re-encode as JPEG.
fn prepare_upload_image(image_bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(image_bytes)
        .map_err(|e| AppError::InvalidRequest(format!("Unreadable image: {}", e)))?;

    // thumbnail() preserves aspect ratio and never upscales
    let resized = if decoded.width().max(decoded.height()) > MAX_IMAGE_DIMENSION {
        decoded.thumbnail(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION)
    } else {
        decoded
    };

    // JPEG has no alpha channel
    let rgb = resized.to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, UPLOAD_JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| AppError::InvalidRequest(format!("JPEG encoding failed: {}", e)))?;

    Ok(jpeg)
}

fn identification_system_prompt() -> String {
    format!(
        "You are a food identification assistant. Identify the food item in the image \
         and respond with ONLY a JSON object in this exact format:\n\
         {{\"foodName\": \"name of the food\", \"category\": \"one of the categories below\", \
         \"confidence\": \"high, medium or low\", \"additionalInfo\": \"optional short note\"}}\n\
         The category MUST be exactly one of: {}.\n\
         Do not include any text outside the JSON object.",
        CATEGORY_VOCABULARY.join(", ")
    )
}

/// Strict parse of the sliced JSON object; on failure, a lenient pass
/// with per-field defaults; only when no object exists at all does the
/// whole parse fail.
fn parse_identification(content: &str) -> Result<FoodIdentification> {
    let sliced = slice_json_object(content).unwrap_or(content);

    match serde_json::from_str::<FoodIdentification>(sliced) {
        Ok(identification) => Ok(identification),
        Err(strict_error) => {
            tracing::debug!(error = %strict_error, "Strict identification parse failed, retrying leniently");

            let Ok(Value::Object(object)) = serde_json::from_str::<Value>(sliced) else {
                return Err(AppError::InvalidResponse(
                    "No JSON object in identification response".to_string(),
                ));
            };

            Ok(FoodIdentification {
                food_name: str_field(&object, "foodName", "Unknown Food"),
                category: str_field(&object, "category", "Other"),
                confidence: str_field(&object, "confidence", "low"),
                additional_info: opt_str_field(&object, "additionalInfo"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse_of_a_clean_response() {
        let content = r#"{"foodName": "Tomato", "category": "Vegetables", "confidence": "high", "additionalInfo": "ripe"}"#;

        let parsed = parse_identification(content).unwrap();
        assert_eq!(parsed.food_name, "Tomato");
        assert_eq!(parsed.category, "Vegetables");
        assert_eq!(parsed.confidence, "high");
        assert_eq!(parsed.additional_info.as_deref(), Some("ripe"));
    }

    #[test]
    fn test_parse_recovers_from_markdown_fences() {
        let content = "```json\n{\"foodName\": \"Milk\", \"category\": \"Dairy & Eggs\", \"confidence\": \"medium\"}\n```";

        let parsed = parse_identification(content).unwrap();
        assert_eq!(parsed.food_name, "Milk");
        assert!(parsed.additional_info.is_none());
    }

    #[test]
    fn test_lenient_parse_fills_missing_fields_with_defaults() {
        let content = r#"{"category": "Fruits"}"#;

        let parsed = parse_identification(content).unwrap();
        assert_eq!(parsed.food_name, "Unknown Food");
        assert_eq!(parsed.category, "Fruits");
        assert_eq!(parsed.confidence, "low");
        assert!(parsed.additional_info.is_none());
    }

    #[test]
    fn test_no_json_object_is_an_error() {
        let error = parse_identification("I cannot tell what this is.").unwrap_err();
        assert!(matches!(error, AppError::InvalidResponse(_)));
    }

    #[test]
    fn test_prompt_carries_the_full_category_vocabulary() {
        let prompt = identification_system_prompt();
        for category in CATEGORY_VOCABULARY {
            assert!(prompt.contains(category), "missing category {category}");
        }
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let wide = image::DynamicImage::new_rgb8(2048, 512);
        let mut png = Vec::new();
        wide.write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageFormat::Png,
        )
        .unwrap();

        let jpeg = prepare_upload_image(&png).unwrap();
        let reloaded = image::load_from_memory(&jpeg).unwrap();
        assert!(reloaded.width() <= MAX_IMAGE_DIMENSION);
        assert!(reloaded.height() <= MAX_IMAGE_DIMENSION);
    }

    #[test]
    fn test_undecodable_bytes_are_rejected() {
        let error = prepare_upload_image(b"not an image").unwrap_err();
        assert!(matches!(error, AppError::InvalidRequest(_)));
    }
}
