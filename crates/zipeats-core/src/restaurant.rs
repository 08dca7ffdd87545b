use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::genre::Genre;

/// One aggregated restaurant as returned to clients and stored in snapshots.
///
/// `price_level` and `is_open` stay `None` when the provider did not supply
/// them; they are omitted from JSON rather than serialized as `0`/`false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    pub name: String,
    pub genre: Genre,
    /// Provider price level, `0` (free) through `4` (very expensive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
}

/// An immutable aggregate captured for one zip code by a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipCodeSnapshot {
    pub id: i64,
    pub zip_code: String,
    pub retrieved_at: DateTime<Utc>,
    /// Restaurants in provider discovery order.
    pub restaurants: Vec<RestaurantRecord>,
}

impl ZipCodeSnapshot {
    /// A snapshot only counts as a cache hit when it holds at least one restaurant.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.restaurants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_omitted_from_json() {
        let record = RestaurantRecord {
            name: "Golden Spoon".to_string(),
            genre: Genre::Restaurant,
            price_level: None,
            is_open: None,
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"name": "Golden Spoon", "genre": "restaurant"})
        );
    }

    #[test]
    fn known_fields_use_camel_case_keys() {
        let record = RestaurantRecord {
            name: "Taqueria".to_string(),
            genre: Genre::Mexican,
            price_level: Some(0),
            is_open: Some(false),
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["priceLevel"], 0);
        assert_eq!(json["isOpen"], false);
    }

    #[test]
    fn empty_snapshot_is_not_usable() {
        let snapshot = ZipCodeSnapshot {
            id: 1,
            zip_code: "94103".to_string(),
            retrieved_at: Utc::now(),
            restaurants: vec![],
        };
        assert!(!snapshot.is_usable());
    }
}
