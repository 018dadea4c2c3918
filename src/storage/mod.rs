//! Binary storage
//!
//! Food item photos are stored out-of-line, addressed by content hash.

pub mod photo_store;

pub use photo_store::PhotoStore;
