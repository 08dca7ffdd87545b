//! HTTP client for the places provider REST API.
//!
//! Wraps `reqwest` with API key management, endpoint URL construction, and
//! typed response deserialization. Pagination lives in `search.rs` and detail
//! enrichment in `enrich.rs`; both build on [`PlacesClient::request_json`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use zipeats_core::AppConfig;

use crate::error::PlacesError;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
const DEFAULT_USER_AGENT: &str = "zipeats/0.1 (restaurant-lookup)";

/// Pacing and sizing knobs for search and enrichment.
#[derive(Debug, Clone)]
pub struct PlacesOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Wait before a next-page token is used; the provider rejects fresh tokens.
    pub page_token_delay: Duration,
    /// Upper bound on places aggregated across all pages.
    pub max_places: usize,
    /// Detail lookups issued concurrently per batch. Always at least 1.
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for PlacesOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_token_delay: Duration::from_millis(2000),
            max_places: 60,
            batch_size: 10,
            batch_delay: Duration::from_millis(100),
        }
    }
}

impl PlacesOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.places_timeout_secs,
            user_agent: config.places_user_agent.clone(),
            page_token_delay: Duration::from_millis(config.page_token_delay_ms),
            max_places: config.max_places,
            batch_size: config.enrich_batch_size.max(1),
            batch_delay: Duration::from_millis(config.enrich_batch_delay_ms),
        }
    }
}

/// Client for the places text-search and details endpoints.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    pub(crate) options: PlacesOptions,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[redacted]")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, options: PlacesOptions) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, options)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        options: PlacesOptions,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash so endpoint paths join under the base
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            options,
        })
    }

    #[must_use]
    pub fn options(&self) -> &PlacesOptions {
        &self.options
    }

    /// Builds `{base}{endpoint}?{params}&key={api_key}` with percent-encoded values.
    pub(crate) fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{endpoint}", self.base_url.path()));
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and deserializes the body.
    ///
    /// `context` names the call in deserialization errors; the URL itself is
    /// never included because it carries the API key.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    /// Returns [`PlacesError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, PlacesError> {
        let response = self.client.get(url).send().await.map_err(without_url)?;
        let response = response.error_for_status().map_err(without_url)?;
        let body = response.text().await.map_err(without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Strips the request URL (and with it the API key) from a reqwest error.
fn without_url(err: reqwest::Error) -> PlacesError {
    PlacesError::Http(err.without_url())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
