//! Inventory query engine
//!
//! Pure, synchronous functions over an in-memory snapshot of food items:
//! derived expiry status, multi-dimensional filtering, and list reordering.
//! `now` is always an explicit input so callers and tests control the clock.

pub mod expiry;
pub mod query;

pub use expiry::{days_until_expiry, ExpiryStatus};
pub use query::{filter_items, renumber_after_move, FilterCriteria, Reorderable, StatusFilter};
