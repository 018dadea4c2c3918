//! Service layer
//!
//! High-level operations composed from the repository, photo store,
//! credential store and API client.

pub mod cookbook;
pub mod credentials;
pub mod dinner;
pub mod inventory;

pub use cookbook::CookbookService;
pub use credentials::{CredentialManager, ModelPurpose, SecretStore};
pub use dinner::DinnerService;
pub use inventory::InventoryService;
