//! FreshKeeper core
//!
//! Food inventory tracking with expiry awareness, plus AI-assisted food
//! identification and dinner recommendations over an OpenAI-compatible
//! chat-completion API.
//!
//! The crate is the headless core behind an application shell: SQLite
//! persistence, a pure query engine over inventory snapshots, a
//! content-addressed photo store, keychain-backed credentials and the
//! API client, composed by the service layer.

pub mod config;
pub mod database;
pub mod error;
pub mod inventory;
pub mod openai;
pub mod services;
pub mod storage;

pub use error::{AppError, Result};
