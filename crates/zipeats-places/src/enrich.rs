//! Batched detail enrichment: turns raw places into restaurant records.

use chrono::{DateTime, FixedOffset};
use futures::stream::{self, StreamExt};
use zipeats_core::{classify, is_open_now, RestaurantRecord};

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::types::{decode_periods, DetailsResponse, PlaceDetails, RawPlace, STATUS_OK};

const DETAIL_FIELDS: &str = "opening_hours,current_opening_hours";

impl PlacesClient {
    /// Enriches `places` with open-now status, returning one record per place
    /// in input order.
    ///
    /// Places are processed in batches of `batch_size`; lookups inside a batch
    /// run concurrently, batches run one after another with `batch_delay`
    /// between them. A failed lookup never fails the run: that record simply
    /// has no open status. `now` is captured once by the caller so every
    /// record in the run is evaluated against the same instant.
    pub async fn enrich_places(
        &self,
        places: &[RawPlace],
        now: DateTime<FixedOffset>,
    ) -> Vec<RestaurantRecord> {
        let batch_size = self.options.batch_size.max(1);
        let batch_count = places.len().div_ceil(batch_size);
        let mut records = Vec::with_capacity(places.len());

        for (batch_index, batch) in places.chunks(batch_size).enumerate() {
            let futures: Vec<_> = batch
                .iter()
                .enumerate()
                .map(|(i, place)| async move { (i, self.enrich_place(place, &now).await) })
                .collect();
            let mut results = stream::iter(futures)
            .buffer_unordered(batch_size)
            .collect::<Vec<_>>()
            .await;

            // Completion order is arbitrary; restore discovery order.
            results.sort_by_key(|(i, _)| *i);
            records.extend(results.into_iter().map(|(_, record)| record));

            tracing::debug!(
                batch = batch_index + 1,
                batches = batch_count,
                size = batch.len(),
                "enrichment batch complete"
            );

            if batch_index + 1 < batch_count {
                tokio::time::sleep(self.options.batch_delay).await;
            }
        }

        records
    }

    async fn enrich_place(&self, place: &RawPlace, now: &DateTime<FixedOffset>) -> RestaurantRecord {
        let is_open = match place.place_id.as_deref() {
            Some(place_id) => self.fetch_open_status(place_id, now).await,
            None => {
                tracing::warn!(name = %place.name, "place has no place_id, skipping details");
                None
            }
        };

        RestaurantRecord {
            name: place.name.clone(),
            genre: classify(&place.name, place.types.as_slice()),
            price_level: place.price_level,
            is_open,
        }
    }

    async fn fetch_open_status(
        &self,
        place_id: &str,
        now: &DateTime<FixedOffset>,
    ) -> Option<bool> {
        match self.place_details(place_id).await {
            Ok(details) => {
                let status = resolve_open_status(&details, now);
                if status.is_none()
                    && details.current_opening_hours.is_none()
                    && details.opening_hours.is_none()
                {
                    tracing::debug!(place_id, "no opening hours data");
                }
                status
            }
            Err(e) => {
                tracing::warn!(place_id, error = %e, "place details lookup failed");
                None
            }
        }
    }

    /// Fetches opening-hours details for one place.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Provider`] if the status is not `OK`.
    /// - [`PlacesError::Http`] or [`PlacesError::Deserialize`] on transport failure.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.build_url(
            "details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        );
        let response: DetailsResponse = self.request_json(url, "details").await?;

        if response.status != STATUS_OK {
            let detail = response.error_message.as_deref().unwrap_or("Unknown error");
            return Err(PlacesError::Provider {
                message: format!("{} - {detail}", response.status),
                status: response.status,
            });
        }

        Ok(response.result.unwrap_or_default())
    }
}

/// Picks the open-now answer from the first available source:
/// `current_opening_hours.open_now`, then `opening_hours.open_now`, then the
/// weekly `opening_hours.periods` evaluated at `now`. Only a missing or empty
/// period list is unknown; a non-empty list with no entry for today is closed.
pub(crate) fn resolve_open_status(
    details: &PlaceDetails,
    now: &DateTime<FixedOffset>,
) -> Option<bool> {
    if let Some(open) = details
        .current_opening_hours
        .as_ref()
        .and_then(|h| h.open_now)
    {
        return Some(open);
    }

    let legacy = details.opening_hours.as_ref()?;
    if let Some(open) = legacy.open_now {
        return Some(open);
    }

    let raw = legacy.periods.as_deref()?;
    if raw.is_empty() {
        return None;
    }
    // Periods exist but none survive decoding, so nothing can match today.
    let periods = decode_periods(raw);
    if periods.is_empty() {
        return Some(false);
    }
    is_open_now(&periods, now)
}
