//! OpenAI-compatible chat-completion client
//!
//! Two operations are built on one request path: food identification from
//! a photo and dinner recommendation from the inventory snapshot. The
//! HTTP layer maps transport and status failures onto the crate error
//! taxonomy; prompt construction and response parsing are pure functions
//! in the submodules.

pub mod chat;
pub mod identify;
pub mod json;
pub mod recommend;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, ModelFamily};
pub use identify::FoodIdentification;
pub use recommend::{CuisinePreference, DinnerRecommendation};

use std::time::Duration;

use crate::config::{HTTP_TIMEOUT_SECS, OPENAI_BASE_URL};
use crate::error::{AppError, Result};
use crate::services::credentials::CredentialManager;

/// Chat-completion API client
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    credentials: CredentialManager,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(credentials: CredentialManager) -> Result<Self> {
        Self::with_base_url(credentials, OPENAI_BASE_URL)
    }

    /// Client against a non-default endpoint (local proxies, test servers)
    pub fn with_base_url(
        credentials: CredentialManager,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            credentials,
            base_url: base_url.into(),
        })
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }

    /// The configured API key, or [`AppError::NoApiKey`]
    fn require_api_key(&self) -> Result<String> {
        self.credentials.api_key()?.ok_or(AppError::NoApiKey)
    }

    /// Send one chat-completion request and return the first choice's
    /// message text.
    ///
    /// Distinguishes a rejected key (401) from other failures so callers
    /// can prompt for reconfiguration instead of a blind retry.
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            body = %request.redacted(),
            "Sending chat-completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 401 {
            return Err(AppError::InvalidApiKey);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "API request failed");
            return Err(AppError::RequestFailed(status.as_u16()));
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::InvalidResponse(format!("Malformed response envelope: {}", e)))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AppError::NoContent)
    }
}
