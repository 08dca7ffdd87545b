use axum::{body::Bytes, extract::State, Extension, Json};
use serde::Serialize;
use zipeats_core::RestaurantRecord;
use zipeats_pipeline::{Source, ZIP_REQUIRED};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    restaurants: Vec<RestaurantRecord>,
}

/// `POST /search` and `POST /api/restaurants` with body `{ "zipCode": "..." }`.
///
/// The body is read leniently: anything that is not a JSON object with a
/// string `zipCode` is a 400, including malformed JSON and a wrong
/// content type.
pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
    let zip_code = extract_zip_code(&body).ok_or_else(|| ApiError::bad_request(ZIP_REQUIRED))?;

    let outcome = state.pipeline.run(&zip_code, false).await?;

    let source = match outcome.source {
        Source::Cache { .. } => "cache",
        Source::Fresh { .. } => "provider",
    };
    tracing::info!(
        request_id = %req_id.0,
        zip_code = %outcome.zip_code,
        source,
        restaurants = outcome.restaurants.len(),
        "search served"
    );

    Ok(Json(SearchResponse {
        restaurants: outcome.restaurants,
    }))
}

fn extract_zip_code(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("zipCode")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_zip_code_reads_string_field() {
        assert_eq!(
            extract_zip_code(br#"{"zipCode":"94103"}"#),
            Some("94103".to_string())
        );
    }

    #[test]
    fn extract_zip_code_rejects_missing_or_non_string() {
        assert_eq!(extract_zip_code(br#"{}"#), None);
        assert_eq!(extract_zip_code(br#"{"zipCode":94103}"#), None);
        assert_eq!(extract_zip_code(br#"{"zipCode":null}"#), None);
        assert_eq!(extract_zip_code(b"not json"), None);
        assert_eq!(extract_zip_code(b""), None);
    }
}
