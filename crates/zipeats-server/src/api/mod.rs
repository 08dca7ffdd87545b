mod restaurants;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use zipeats_pipeline::{Pipeline, PipelineError};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Error payload: `{ "error": "<message>" }` with a matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        let status = match error {
            PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
            PipelineError::Configuration(_)
            | PipelineError::Provider { .. }
            | PipelineError::Network { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

fn build_cors(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
}

fn search_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/search", post(restaurants::search))
        .route("/api/restaurants", post(restaurants::search))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, cors_origin: HeaderValue, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(search_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors(cors_origin))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.pipeline.store().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                store: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: snapshot store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    store: "unavailable",
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
