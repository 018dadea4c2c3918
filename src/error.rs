//! Error types for the FreshKeeper core
//!
//! All errors use thiserror for structured error handling.
//! API-facing variants carry enough detail to render a message;
//! none are retried automatically by the core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Food item not found: {0}")]
    ItemNotFound(String),

    #[error("Storage location not found: {0}")]
    LocationNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Photo store error: {0}")]
    PhotoStore(String),

    #[error("Credential store error: {0}")]
    Credential(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Image is too large to upload")]
    ImageTooLarge,

    #[error("Request failed with status code: {0}")]
    RequestFailed(u16),

    #[error("No content in API response")]
    NoContent,

    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No food items in inventory")]
    EmptyInventory,
}

pub type Result<T> = std::result::Result<T, AppError>;
