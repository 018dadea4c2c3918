//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the crate.

// ===== Expiry Rules =====

/// Items with 0..=3 whole days remaining count as "expiring soon".
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 3;

// ===== Recipe Retention =====

/// Maximum number of non-favorite recipes kept; oldest evicted first.
/// Favorites are exempt from this cap.
pub const RECENT_RECIPE_CAP: usize = 5;

// ===== Image Upload Limits =====

/// Longest image side after downscaling, in pixels.
/// The API resizes "low detail" images to 512px anyway; pre-resizing
/// saves upload bandwidth.
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// JPEG re-encode quality for uploaded photos (0-100).
pub const UPLOAD_JPEG_QUALITY: u8 = 70;

/// Hard cap on the encoded image payload in bytes (20 MB).
pub const MAX_IMAGE_BYTES: usize = 20_000_000;

// ===== Chat-Completion API =====

/// Base URL of the OpenAI-compatible API; overridable on the client for tests.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Fallback model when no selection is stored.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Explicit request timeout; expiry surfaces as a transport error.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Output length limit for food identification calls.
pub const IDENTIFY_MAX_TOKENS: u32 = 150;

/// Sampling temperature for food identification (model family permitting).
pub const IDENTIFY_TEMPERATURE: f32 = 0.2;

/// Output length limit for dinner recommendation calls.
pub const RECOMMEND_MAX_TOKENS: u32 = 2000;

/// Sampling temperature for dinner recommendations (model family permitting).
pub const RECOMMEND_TEMPERATURE: f32 = 0.7;

/// Closed category vocabulary the vision prompt forces the model to pick from.
/// Case-sensitive, including ampersands.
pub const CATEGORY_VOCABULARY: [&str; 11] = [
    "Vegetables",
    "Meat",
    "Fruits",
    "Dairy & Eggs",
    "Seasonings & Sauces",
    "Grains & Pasta",
    "Canned & Packaged",
    "Frozen",
    "Snacks",
    "Beverages",
    "Other",
];

// ===== Credential Storage =====

/// Keyring service namespace for all FreshKeeper secrets.
pub const KEYRING_SERVICE: &str = "com.freshkeeper.openai";

/// Keyring account holding the API key.
pub const ACCOUNT_API_KEY: &str = "api-key";

/// Keyring account holding the model used for image identification.
pub const ACCOUNT_VISION_MODEL: &str = "selected-vision-model";

/// Keyring account holding the model used for text reasoning.
pub const ACCOUNT_REASONING_MODEL: &str = "selected-reasoning-model";
