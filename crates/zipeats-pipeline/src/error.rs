use thiserror::Error;
use zipeats_places::PlacesError;

/// Request-level failures of the lookup pipeline.
///
/// Per-item enrichment failures never appear here; they are absorbed inside
/// the enricher and the affected record just has no open status.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad or missing input. User-fixable.
    #[error("{0}")]
    Validation(String),

    /// Missing or unusable provider setup. Operator-fixable.
    #[error("{0}")]
    Configuration(String),

    /// The provider rejected the search; `message` is the diagnostic shown to callers.
    #[error("{message}")]
    Provider { status: String, message: String },

    /// Transport failure talking to the provider. `detail` is logged, never shown.
    #[error("Failed to fetch restaurants")]
    Network { detail: String },
}

impl PipelineError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Provider { .. } => "provider",
            PipelineError::Network { .. } => "network",
        }
    }
}

impl From<PlacesError> for PipelineError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::Provider { status, message } => PipelineError::Provider { status, message },
            other if other.is_transport() => PipelineError::Network {
                detail: other.to_string(),
            },
            other => PipelineError::Configuration(other.to_string()),
        }
    }
}
