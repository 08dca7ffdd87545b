//! Zip code lookup pipeline: cache read, provider search, enrichment, and
//! best-effort persistence.

mod error;
mod orchestrator;

pub use error::PipelineError;
pub use orchestrator::{
    Pipeline, PipelineOutcome, Source, Stage, API_KEY_MISSING, ZIP_REQUIRED,
};
