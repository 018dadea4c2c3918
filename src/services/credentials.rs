//! Credential management
//!
//! Secure storage for the API key and per-purpose model selection.
//! Persistence goes through the [`SecretStore`] trait so the core is
//! testable without a real OS keychain; production uses [`KeyringStore`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use keyring::Entry;

use crate::config::{
    ACCOUNT_API_KEY, ACCOUNT_REASONING_MODEL, ACCOUNT_VISION_MODEL, DEFAULT_MODEL,
    KEYRING_SERVICE,
};
use crate::error::{AppError, Result};

/// Which task a model selection applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPurpose {
    /// Image identification
    Vision,
    /// Text reasoning and recommendations
    Reasoning,
}

impl ModelPurpose {
    fn account(self) -> &'static str {
        match self {
            ModelPurpose::Vision => ACCOUNT_VISION_MODEL,
            ModelPurpose::Reasoning => ACCOUNT_REASONING_MODEL,
        }
    }
}

/// Minimal secret persistence: get/set/delete, with "not found" read as
/// "unconfigured" rather than an error.
pub trait SecretStore: Send + Sync {
    fn get(&self, account: &str) -> Result<Option<String>>;
    fn set(&self, account: &str, value: &str) -> Result<()>;
    fn delete(&self, account: &str) -> Result<()>;
}

/// OS keychain-backed secret store
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    fn entry(&self, account: &str) -> Result<Entry> {
        Entry::new(&self.service, account)
            .map_err(|e| AppError::Credential(format!("Failed to create keyring entry: {}", e)))
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, account: &str) -> Result<Option<String>> {
        match self.entry(account)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::Credential(format!(
                "Failed to read credential: {}",
                e
            ))),
        }
    }

    fn set(&self, account: &str, value: &str) -> Result<()> {
        self.entry(account)?
            .set_password(value)
            .map_err(|e| AppError::Credential(format!("Failed to store credential: {}", e)))
    }

    fn delete(&self, account: &str) -> Result<()> {
        match self.entry(account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AppError::Credential(format!(
                "Failed to delete credential: {}",
                e
            ))),
        }
    }
}

/// In-memory secret store for tests and previews
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, account: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .lock()
            .map_err(|_| AppError::Credential("secret store poisoned".to_string()))?
            .get(account)
            .cloned())
    }

    fn set(&self, account: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| AppError::Credential("secret store poisoned".to_string()))?
            .insert(account.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, account: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| AppError::Credential("secret store poisoned".to_string()))?
            .remove(account);
        Ok(())
    }
}

/// API credential and model-selection manager
#[derive(Clone)]
pub struct CredentialManager {
    store: Arc<dyn SecretStore>,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Manager over the OS keychain
    pub fn keyring() -> Self {
        Self::new(Arc::new(KeyringStore::new()))
    }

    /// The configured API key, if any
    pub fn api_key(&self) -> Result<Option<String>> {
        self.store.get(ACCOUNT_API_KEY)
    }

    pub fn has_api_key(&self) -> bool {
        matches!(self.api_key(), Ok(Some(_)))
    }

    pub fn set_api_key(&self, api_key: &str) -> Result<()> {
        self.store.set(ACCOUNT_API_KEY, api_key)?;
        tracing::info!("API key stored");
        Ok(())
    }

    pub fn delete_api_key(&self) -> Result<()> {
        self.store.delete(ACCOUNT_API_KEY)?;
        tracing::info!("API key deleted");
        Ok(())
    }

    /// Selected model for a purpose, falling back to the default model
    /// when nothing is stored.
    pub fn selected_model(&self, purpose: ModelPurpose) -> Result<String> {
        Ok(self
            .store
            .get(purpose.account())?
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()))
    }

    pub fn set_selected_model(&self, purpose: ModelPurpose, model_id: &str) -> Result<()> {
        self.store.set(purpose.account(), model_id)
    }

    /// Remove the API key and both model selections
    pub fn delete_all(&self) -> Result<()> {
        self.store.delete(ACCOUNT_API_KEY)?;
        self.store.delete(ACCOUNT_VISION_MODEL)?;
        self.store.delete(ACCOUNT_REASONING_MODEL)?;
        tracing::info!("All API configuration deleted");
        Ok(())
    }
}
