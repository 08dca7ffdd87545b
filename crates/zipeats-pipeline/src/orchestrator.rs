//! Cache-or-fetch orchestration for one zip code lookup.
//!
//! ```text
//! RECEIVED -> CACHE_LOOKUP -> CACHE_HIT -> RESPOND
//!                          -> CACHE_MISS -> SEARCHING -> ENRICHING -> PERSISTING -> RESPOND
//! any request-level error  -> FAILED
//! ```

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, Utc};
use zipeats_core::{AppConfig, RestaurantRecord};
use zipeats_db::SnapshotStore;
use zipeats_places::{PlacesClient, PlacesOptions};

use crate::error::PipelineError;

pub const ZIP_REQUIRED: &str = "Zip code is required";
pub const API_KEY_MISSING: &str = "Google Places API key not configured";

/// Lifecycle stages of a lookup, logged at `debug` as the run advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    CacheLookup,
    CacheHit,
    CacheMiss,
    Searching,
    Enriching,
    Persisting,
    Respond,
    Failed,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::CacheLookup => "cache_lookup",
            Stage::CacheHit => "cache_hit",
            Stage::CacheMiss => "cache_miss",
            Stage::Searching => "searching",
            Stage::Enriching => "enriching",
            Stage::Persisting => "persisting",
            Stage::Respond => "respond",
            Stage::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the returned restaurants came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Cache {
        snapshot_id: i64,
        retrieved_at: DateTime<Utc>,
    },
    /// Freshly aggregated. `snapshot_id` is `None` when nothing was persisted
    /// (empty result or a failed write).
    Fresh { snapshot_id: Option<i64> },
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub zip_code: String,
    pub restaurants: Vec<RestaurantRecord>,
    pub source: Source,
}

type Clock = fn() -> DateTime<FixedOffset>;

fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Runs the lookup pipeline against a snapshot store and, on a miss, the
/// places provider.
///
/// The provider client is optional: a deployment without an API key still
/// serves cached zip codes and only fails on a miss.
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn SnapshotStore>,
    places: Option<Arc<PlacesClient>>,
    clock: Clock,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("places", &self.places)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotStore>, places: Option<Arc<PlacesClient>>) -> Self {
        Self {
            store,
            places,
            clock: local_now,
        }
    }

    /// Builds a pipeline from application config, creating the places client
    /// when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if the places client cannot
    /// be constructed (bad base URL or TLS setup).
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Self, PipelineError> {
        let places = match config.google_places_api_key.as_deref() {
            Some(key) => {
                let client = PlacesClient::with_base_url(
                    key,
                    &config.places_base_url,
                    PlacesOptions::from_app_config(config),
                )
                .map_err(|e| PipelineError::Configuration(e.to_string()))?;
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("GOOGLE_PLACES_API_KEY not set; only cached zip codes can be served");
                None
            }
        };
        Ok(Self::new(store, places))
    }

    /// Replaces the clock used to evaluate opening periods.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Resolves restaurants for `zip_code`.
    ///
    /// The zip code is trimmed once and the trimmed value is used everywhere.
    /// With `refresh` set the cache read is skipped; the fresh result is
    /// still persisted.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Validation`] for an empty zip code.
    /// - [`PipelineError::Configuration`] on a cache miss with no API key.
    /// - [`PipelineError::Provider`] / [`PipelineError::Network`] when the
    ///   search stage fails.
    pub async fn run(&self, zip_code: &str, refresh: bool) -> Result<PipelineOutcome, PipelineError> {
        let zip_code = zip_code.trim();
        advance(zip_code, Stage::Received);

        let result = self.execute(zip_code, refresh).await;
        match &result {
            Ok(outcome) => {
                advance(zip_code, Stage::Respond);
                tracing::debug!(zip_code, restaurants = outcome.restaurants.len(), "lookup complete");
            }
            Err(e) => {
                advance(zip_code, Stage::Failed);
                match e {
                    PipelineError::Network { detail } => {
                        tracing::error!(zip_code, error = %detail, "provider transport failure");
                    }
                    other => {
                        tracing::warn!(zip_code, kind = other.kind(), error = %other, "lookup failed");
                    }
                }
            }
        }
        result
    }

    async fn execute(&self, zip_code: &str, refresh: bool) -> Result<PipelineOutcome, PipelineError> {
        if zip_code.is_empty() {
            return Err(PipelineError::Validation(ZIP_REQUIRED.to_string()));
        }

        if refresh {
            tracing::info!(zip_code, "refresh requested, skipping cache");
        } else if let Some(outcome) = self.lookup_cache(zip_code).await {
            return Ok(outcome);
        }

        advance(zip_code, Stage::CacheMiss);
        let places = self
            .places
            .as_ref()
            .ok_or_else(|| PipelineError::Configuration(API_KEY_MISSING.to_string()))?;

        advance(zip_code, Stage::Searching);
        let raw = places.search_restaurants(zip_code).await?;

        advance(zip_code, Stage::Enriching);
        let now = (self.clock)();
        let restaurants = places.enrich_places(&raw, now).await;

        let snapshot_id = self.persist(zip_code, &restaurants).await;

        Ok(PipelineOutcome {
            zip_code: zip_code.to_string(),
            restaurants,
            source: Source::Fresh { snapshot_id },
        })
    }

    /// Returns a usable cached result, or `None` for a miss. Read failures
    /// count as a miss.
    async fn lookup_cache(&self, zip_code: &str) -> Option<PipelineOutcome> {
        advance(zip_code, Stage::CacheLookup);
        match self.store.latest_snapshot(zip_code).await {
            Ok(Some(snapshot)) if snapshot.is_usable() => {
                advance(zip_code, Stage::CacheHit);
                tracing::info!(
                    zip_code,
                    snapshot_id = snapshot.id,
                    restaurants = snapshot.restaurants.len(),
                    "cache hit"
                );
                Some(PipelineOutcome {
                    zip_code: snapshot.zip_code,
                    restaurants: snapshot.restaurants,
                    source: Source::Cache {
                        snapshot_id: snapshot.id,
                        retrieved_at: snapshot.retrieved_at,
                    },
                })
            }
            Ok(Some(snapshot)) => {
                tracing::info!(zip_code, snapshot_id = snapshot.id, "cached snapshot is empty, refetching");
                None
            }
            Ok(None) => {
                tracing::info!(zip_code, "cache miss");
                None
            }
            Err(e) => {
                tracing::error!(zip_code, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Best-effort write. Empty results are skipped since they would only
    /// ever be read back as a miss.
    async fn persist(&self, zip_code: &str, restaurants: &[RestaurantRecord]) -> Option<i64> {
        if restaurants.is_empty() {
            tracing::info!(zip_code, "no restaurants found, nothing to persist");
            return None;
        }

        advance(zip_code, Stage::Persisting);
        match self.store.insert_snapshot(zip_code, restaurants).await {
            Ok(id) => {
                tracing::info!(zip_code, snapshot_id = id, restaurants = restaurants.len(), "snapshot saved");
                Some(id)
            }
            Err(e) => {
                tracing::error!(zip_code, error = %e, "failed to persist snapshot, returning results anyway");
                None
            }
        }
    }
}

fn advance(zip_code: &str, stage: Stage) {
    tracing::debug!(zip_code, stage = %stage, "pipeline stage");
}
