use thiserror::Error;

/// Errors returned by the places provider client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network, TLS, timeout, or non-2xx HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a status other than `OK`/`ZERO_RESULTS`.
    /// `message` is the user-facing diagnostic.
    #[error("{message}")]
    Provider { status: String, message: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid places base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl PlacesError {
    /// `true` for failures of the transport rather than of the provider's answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, PlacesError::Http(_) | PlacesError::Deserialize { .. })
    }
}
