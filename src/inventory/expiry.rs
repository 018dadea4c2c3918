//! Derived expiry status
//!
//! Expiry is purely a computed display attribute; nothing in the store is
//! ever mutated because time passed.

use chrono::{DateTime, Utc};

use crate::config::EXPIRING_SOON_WINDOW_DAYS;
use crate::database::FoodItem;

const SECONDS_PER_DAY: i64 = 86_400;

/// Status of an item relative to its expiry date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Fresh,
    ExpiringSoon,
    Expired,
}

/// Whole days until expiry, floored.
///
/// Euclidean division means one second past the expiry instant is already
/// day -1, so "expired" flips immediately rather than a day late.
/// `None` when the item has no expiry date.
pub fn days_until_expiry(
    expiry_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<i64> {
    expiry_date.map(|expiry| (expiry - now).num_seconds().div_euclid(SECONDS_PER_DAY))
}

impl ExpiryStatus {
    /// Classify an expiry date against `now`.
    ///
    /// No expiry date means the item never expires and is always fresh.
    pub fn of(expiry_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match days_until_expiry(expiry_date, now) {
            None => ExpiryStatus::Fresh,
            Some(days) if days < 0 => ExpiryStatus::Expired,
            Some(days) if days <= EXPIRING_SOON_WINDOW_DAYS => ExpiryStatus::ExpiringSoon,
            Some(_) => ExpiryStatus::Fresh,
        }
    }
}

impl FoodItem {
    pub fn expiry_status(&self, now: DateTime<Utc>) -> ExpiryStatus {
        ExpiryStatus::of(self.expiry_date, now)
    }

    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        days_until_expiry(self.expiry_date, now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_status(now) == ExpiryStatus::Expired
    }

    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        self.expiry_status(now) == ExpiryStatus::ExpiringSoon
    }
}
