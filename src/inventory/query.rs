//! Filtering and reordering
//!
//! The filtered inventory view is recomputed explicitly from a snapshot on
//! every mutation or criteria change; there is no live query binding here.

use chrono::{DateTime, Utc};

use crate::database::{FoodCategory, FoodItem, StorageLocation};
use crate::inventory::expiry::ExpiryStatus;

/// Expiry-status dimension of the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    ExpiringSoon,
    Expired,
}

/// Criteria for the filtered inventory view. All dimensions AND together.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub status: StatusFilter,
    pub location_id: Option<String>,
    pub category_id: Option<String>,
    /// Case-insensitive substring match on the item name
    pub search_text: Option<String>,
}

/// Filter a snapshot of items.
///
/// The input is expected in display order (date added, newest first) and
/// that order is preserved; this is a stable filter, never a resort.
/// Idempotent for a fixed `criteria` and `now`.
pub fn filter_items(
    items: &[FoodItem],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<FoodItem> {
    let search = criteria
        .search_text
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    items
        .iter()
        .filter(|item| match criteria.status {
            StatusFilter::All => true,
            // Guard against boundary overlap: expiring-soon never includes expired
            StatusFilter::ExpiringSoon => {
                item.expiry_status(now) == ExpiryStatus::ExpiringSoon && !item.is_expired(now)
            }
            StatusFilter::Expired => item.expiry_status(now) == ExpiryStatus::Expired,
        })
        .filter(|item| match &criteria.location_id {
            Some(location_id) => item.location_id.as_deref() == Some(location_id.as_str()),
            None => true,
        })
        .filter(|item| match &criteria.category_id {
            Some(category_id) => item.category_id.as_deref() == Some(category_id.as_str()),
            None => true,
        })
        .filter(|item| match &search {
            Some(needle) => item.name.to_lowercase().contains(needle),
            None => true,
        })
        .cloned()
        .collect()
}

/// Anything with a user-draggable display position
pub trait Reorderable {
    fn set_sort_order(&mut self, sort_order: i64);
}

impl Reorderable for StorageLocation {
    fn set_sort_order(&mut self, sort_order: i64) {
        self.sort_order = sort_order;
    }
}

impl Reorderable for FoodCategory {
    fn set_sort_order(&mut self, sort_order: i64) {
        self.sort_order = sort_order;
    }
}

/// Move one entry from `from` to `to` and renumber the whole list.
///
/// After the call every entry's sort order equals its index: a dense,
/// gapless permutation of [0, len). Out-of-range `from` leaves the order
/// untouched (still renumbered dense); `to` is clamped.
pub fn renumber_after_move<T: Reorderable>(items: &mut [T], from: usize, to: usize) {
    if from < items.len() {
        let to = to.min(items.len() - 1);
        if from < to {
            items[from..=to].rotate_left(1);
        } else if to < from {
            items[to..=from].rotate_right(1);
        }
    }

    for (index, item) in items.iter_mut().enumerate() {
        item.set_sort_order(index as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(name: &str, days_to_expiry: Option<i64>, now: DateTime<Utc>) -> FoodItem {
        FoodItem {
            id: format!("id-{name}"),
            name: name.to_string(),
            quantity: 1,
            date_added: now,
            expiry_date: days_to_expiry.map(|d| now + Duration::days(d)),
            photo_hash: None,
            notes: String::new(),
            location_id: None,
            category_id: None,
        }
    }

    fn location(name: &str, sort_order: i64) -> StorageLocation {
        StorageLocation {
            id: format!("loc-{name}"),
            name: name.to_string(),
            icon: "square.grid.2x2".to_string(),
            color_hex: "4CAF50".to_string(),
            sort_order,
            is_default: false,
        }
    }

    #[test]
    fn test_status_filters_compose_with_search() {
        let now = Utc::now();
        let items = vec![
            item("Old Milk", Some(-2), now),
            item("Milk", Some(2), now),
            item("Rice", None, now),
            item("Oat Milk", Some(10), now),
        ];

        let criteria = FilterCriteria {
            status: StatusFilter::ExpiringSoon,
            search_text: Some("milk".to_string()),
            ..Default::default()
        };

        let filtered = filter_items(&items, &criteria, now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Milk");
    }

    #[test]
    fn test_expired_filter_excludes_expiring_soon() {
        let now = Utc::now();
        let items = vec![item("A", Some(-1), now), item("B", Some(0), now)];

        let expired = filter_items(
            &items,
            &FilterCriteria {
                status: StatusFilter::Expired,
                ..Default::default()
            },
            now,
        );
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].name, "A");

        let soon = filter_items(
            &items,
            &FilterCriteria {
                status: StatusFilter::ExpiringSoon,
                ..Default::default()
            },
            now,
        );
        assert_eq!(soon.len(), 1);
        assert_eq!(soon[0].name, "B");
    }

    #[test]
    fn test_location_and_category_dimensions() {
        let now = Utc::now();
        let mut a = item("A", None, now);
        a.location_id = Some("fridge".to_string());
        a.category_id = Some("dairy".to_string());
        let mut b = item("B", None, now);
        b.location_id = Some("fridge".to_string());
        let c = item("C", None, now);

        let items = vec![a, b, c];

        let by_location = filter_items(
            &items,
            &FilterCriteria {
                location_id: Some("fridge".to_string()),
                ..Default::default()
            },
            now,
        );
        assert_eq!(by_location.len(), 2);

        let by_both = filter_items(
            &items,
            &FilterCriteria {
                location_id: Some("fridge".to_string()),
                category_id: Some("dairy".to_string()),
                ..Default::default()
            },
            now,
        );
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].name, "A");
    }

    #[test]
    fn test_filter_is_stable_and_idempotent() {
        let now = Utc::now();
        let items = vec![
            item("Newest", Some(1), now),
            item("Middle", Some(2), now),
            item("Oldest", Some(3), now),
        ];

        let criteria = FilterCriteria {
            status: StatusFilter::ExpiringSoon,
            ..Default::default()
        };

        let once = filter_items(&items, &criteria, now);
        let names: Vec<_> = once.iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);

        let twice = filter_items(&once, &criteria, now);
        let names_twice: Vec<_> = twice.iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, names_twice);
    }

    #[test]
    fn test_empty_search_text_matches_everything() {
        let now = Utc::now();
        let items = vec![item("A", None, now), item("B", None, now)];

        let criteria = FilterCriteria {
            search_text: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(filter_items(&items, &criteria, now).len(), 2);
    }

    #[test]
    fn test_move_down_renumbers_dense() {
        let mut locations: Vec<_> = (0..5).map(|i| location(&format!("L{i}"), i)).collect();

        renumber_after_move(&mut locations, 1, 3);

        let names: Vec<_> = locations.iter().map(|l| l.name.clone()).collect();
        assert_eq!(names, vec!["L0", "L2", "L3", "L1", "L4"]);

        let orders: Vec<_> = locations.iter().map(|l| l.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_move_up_renumbers_dense() {
        let mut locations: Vec<_> = (0..4).map(|i| location(&format!("L{i}"), i)).collect();

        renumber_after_move(&mut locations, 3, 0);

        let names: Vec<_> = locations.iter().map(|l| l.name.clone()).collect();
        assert_eq!(names, vec!["L3", "L0", "L1", "L2"]);

        let orders: Vec<_> = locations.iter().map(|l| l.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_move_repairs_gapped_sort_orders() {
        // Orders with gaps (e.g. after a delete) come out dense again
        let mut locations = vec![location("A", 0), location("B", 7), location("C", 9)];

        renumber_after_move(&mut locations, 0, 0);

        let orders: Vec<_> = locations.iter().map(|l| l.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }
}
