//! Chat-completion wire types
//!
//! Typed request/response structures for the chat-completion endpoint,
//! including multimodal user content and the model-family parameter table.
//! Request bodies are only ever logged through [`ChatRequest::redacted`],
//! which never serializes the raw image payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chat-completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(model: String, messages: Vec<ChatMessage>) -> Self {
        Self {
            model,
            messages,
            max_tokens: None,
            max_completion_tokens: None,
            temperature: None,
        }
    }

    /// Apply output-length and temperature parameters, shaped for the
    /// request's model family.
    pub fn with_output_limits(mut self, max_output_tokens: u32, temperature: f32) -> Self {
        let family = ModelFamily::for_model(&self.model);

        match family.length_param {
            LengthParam::MaxTokens => self.max_tokens = Some(max_output_tokens),
            LengthParam::MaxCompletionTokens => {
                self.max_completion_tokens = Some(max_output_tokens)
            }
        }

        if family.supports_temperature {
            self.temperature = Some(temperature);
        }

        self
    }

    /// JSON rendering safe for logs: any data-URI image payload is
    /// replaced with a fixed marker.
    pub fn redacted(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);

        if let Some(messages) = value.get_mut("messages").and_then(Value::as_array_mut) {
            for message in messages {
                let Some(parts) = message.get_mut("content").and_then(Value::as_array_mut)
                else {
                    continue;
                };
                for part in parts {
                    if let Some(url) = part
                        .get_mut("image_url")
                        .and_then(|i| i.get_mut("url"))
                    {
                        if url.as_str().is_some_and(|u| u.starts_with("data:")) {
                            *url = Value::String("data:image/jpeg;base64,[redacted]".to_string());
                        }
                    }
                }
            }
        }

        value
    }
}

/// One message turn
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// User turn carrying a question plus an inline image at low fidelity
    /// (the fixed detail hint keeps vision cost down).
    pub fn user_with_image(text: impl Into<String>, image_data_uri: String) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_uri,
                        detail: "low".to_string(),
                    },
                },
            ]),
        }
    }
}

/// Plain text or multimodal content parts
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: String,
}

/// Which request key carries the output-length limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthParam {
    MaxTokens,
    MaxCompletionTokens,
}

/// Request-parameter shape shared by a group of model identifiers.
///
/// Selection is a plain prefix match on the model id; adding support for a
/// new family means adding a table row, nothing else.
#[derive(Debug, Clone, Copy)]
pub struct ModelFamily {
    pub prefix: &'static str,
    pub length_param: LengthParam,
    pub supports_temperature: bool,
}

/// Families that deviate from the standard parameter pair. The gpt-5
/// generation renamed the length parameter and only accepts the provider
/// default temperature.
const MODEL_FAMILIES: &[ModelFamily] = &[ModelFamily {
    prefix: "gpt-5",
    length_param: LengthParam::MaxCompletionTokens,
    supports_temperature: false,
}];

const STANDARD_FAMILY: ModelFamily = ModelFamily {
    prefix: "",
    length_param: LengthParam::MaxTokens,
    supports_temperature: true,
};

impl ModelFamily {
    pub fn for_model(model_id: &str) -> ModelFamily {
        MODEL_FAMILIES
            .iter()
            .find(|family| model_id.starts_with(family.prefix))
            .copied()
            .unwrap_or(STANDARD_FAMILY)
    }
}

/// Response envelope: only the first choice's message text is consumed
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_models_use_max_tokens_and_temperature() {
        for model in ["gpt-4.1-nano", "gpt-4o-mini", "some-future-model"] {
            let request =
                ChatRequest::new(model.to_string(), vec![ChatMessage::user("hi")])
                    .with_output_limits(150, 0.2);

            assert_eq!(request.max_tokens, Some(150));
            assert_eq!(request.max_completion_tokens, None);
            assert_eq!(request.temperature, Some(0.2));
        }
    }

    #[test]
    fn test_gpt5_family_uses_alternate_length_param_without_temperature() {
        for model in ["gpt-5", "gpt-5-mini", "gpt-5.2-turbo"] {
            let request =
                ChatRequest::new(model.to_string(), vec![ChatMessage::user("hi")])
                    .with_output_limits(2000, 0.7);

            assert_eq!(request.max_tokens, None);
            assert_eq!(request.max_completion_tokens, Some(2000));
            assert_eq!(request.temperature, None);
        }
    }

    #[test]
    fn test_unset_parameters_are_omitted_from_the_body() {
        let request = ChatRequest::new(
            "gpt-5-mini".to_string(),
            vec![ChatMessage::user("hi")],
        )
        .with_output_limits(100, 0.5);

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
        assert_eq!(body["max_completion_tokens"], 100);
    }

    #[test]
    fn test_multimodal_message_shape() {
        let message = ChatMessage::user_with_image(
            "What food is in this image?",
            "data:image/jpeg;base64,AAAA".to_string(),
        );

        let body = serde_json::to_value(&message).unwrap();
        assert_eq!(body["role"], "user");
        assert_eq!(body["content"][0]["type"], "text");
        assert_eq!(body["content"][1]["type"], "image_url");
        assert_eq!(body["content"][1]["image_url"]["detail"], "low");
    }

    #[test]
    fn test_redacted_body_never_contains_the_image_payload() {
        let request = ChatRequest::new(
            "gpt-4.1-nano".to_string(),
            vec![
                ChatMessage::system("identify food"),
                ChatMessage::user_with_image(
                    "What food is in this image?",
                    "data:image/jpeg;base64,SECRETPAYLOAD".to_string(),
                ),
            ],
        );

        let redacted = request.redacted().to_string();
        assert!(!redacted.contains("SECRETPAYLOAD"));
        assert!(redacted.contains("[redacted]"));
        // The text parts survive redaction
        assert!(redacted.contains("identify food"));
    }

    #[test]
    fn test_envelope_tolerates_missing_content() {
        let envelope: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{}}]}"#).unwrap();
        assert!(envelope.choices[0].message.content.is_none());

        let empty: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.choices.is_empty());
    }
}
