//! Places provider response types for the text-search and details endpoints.
//!
//! ## Observed shapes
//!
//! ### Envelope
//! Both endpoints wrap results in `{"status": "...", ...}`. `status` is `"OK"`
//! on success, `"ZERO_RESULTS"` for an empty search, and an upper-case error
//! code (`"REQUEST_DENIED"`, `"INVALID_REQUEST"`, `"OVER_QUERY_LIMIT"`, ...)
//! otherwise. `error_message` accompanies most error statuses.
//!
//! ### Search results
//! `place_id` is present in practice but modelled as optional; a place without
//! one is kept and simply not enriched. `price_level` is omitted (not `null`)
//! for places with no pricing data. `name` and `types` may be missing or
//! explicitly `null`; both read as empty.
//!
//! ### Opening hours
//! `current_opening_hours.open_now` is the current field;
//! `opening_hours.open_now` is the legacy one. Either may be missing while
//! `opening_hours.periods` is still present. Period times are HHMM strings
//! (`"0900"`) and days run `0` (Sunday) to `6`.

use serde::{Deserialize, Deserializer};
use zipeats_core::{parse_hhmm, OpeningPeriod};

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
pub const STATUS_REQUEST_DENIED: &str = "REQUEST_DENIED";

/// One page from `GET textsearch/json`.
#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<RawPlace>,
    /// Present when another page exists. Not usable until a short delay passes.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A place summary from a search page. Transient: consumed by one pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Provider category identifiers, e.g. `["mexican_restaurant", "food"]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(default)]
    pub price_level: Option<u8>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response from `GET details/json`.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub current_opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub periods: Option<Vec<RawPeriod>>,
}

#[derive(Debug, Deserialize)]
pub struct RawPeriod {
    #[serde(default)]
    pub open: Option<RawPeriodPoint>,
    #[serde(default)]
    pub close: Option<RawPeriodPoint>,
}

#[derive(Debug, Deserialize)]
pub struct RawPeriodPoint {
    pub day: u8,
    pub time: String,
}

/// Converts provider periods into [`OpeningPeriod`]s.
///
/// Periods without an `open` point or with an unparseable open time are
/// dropped. An unparseable close time is treated as absent. Callers decide
/// unknown-vs-closed on the raw list, not on this result.
#[must_use]
pub fn decode_periods(raw: &[RawPeriod]) -> Vec<OpeningPeriod> {
    raw.iter()
        .filter_map(|p| {
            let open = p.open.as_ref()?;
            Some(OpeningPeriod {
                day_of_week: open.day,
                open_time: parse_hhmm(&open.time)?,
                close_time: p.close.as_ref().and_then(|c| parse_hhmm(&c.time)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_page_tolerates_missing_optional_fields() {
        let page: TextSearchResponse = serde_json::from_value(serde_json::json!({
            "status": "OK",
            "results": [{ "name": "No Id Diner" }]
        }))
        .expect("deserialize");
        assert_eq!(page.results.len(), 1);
        assert!(page.results[0].place_id.is_none());
        assert!(page.results[0].price_level.is_none());
        assert!(page.results[0].types.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn explicit_nulls_read_as_empty() {
        let page: TextSearchResponse = serde_json::from_value(serde_json::json!({
            "status": "OK",
            "results": [
                { "place_id": "p1", "name": null, "types": null, "price_level": null },
                { "place_id": "p2", "name": "Taqueria Uno", "types": ["restaurant"] }
            ]
        }))
        .expect("deserialize");
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].name, "");
        assert!(page.results[0].types.is_empty());
        assert!(page.results[0].price_level.is_none());
        assert_eq!(page.results[1].name, "Taqueria Uno");

        let empty: TextSearchResponse =
            serde_json::from_value(serde_json::json!({ "status": "OK", "results": null }))
                .expect("deserialize");
        assert!(empty.results.is_empty());
    }

    #[test]
    fn zero_results_page_has_no_results_field() {
        let page: TextSearchResponse =
            serde_json::from_value(serde_json::json!({ "status": "ZERO_RESULTS" }))
                .expect("deserialize");
        assert!(page.results.is_empty());
    }

    #[test]
    fn decode_periods_drops_malformed_entries() {
        let raw: Vec<RawPeriod> = serde_json::from_value(serde_json::json!([
            { "open": { "day": 1, "time": "0900" }, "close": { "day": 1, "time": "1700" } },
            { "close": { "day": 2, "time": "1700" } },
            { "open": { "day": 3, "time": "nine" } },
            { "open": { "day": 0, "time": "0000" } }
        ]))
        .expect("deserialize");

        let periods = decode_periods(&raw);
        assert_eq!(
            periods,
            vec![
                OpeningPeriod {
                    day_of_week: 1,
                    open_time: 900,
                    close_time: Some(1700),
                },
                OpeningPeriod {
                    day_of_week: 0,
                    open_time: 0,
                    close_time: None,
                },
            ]
        );
    }
}
