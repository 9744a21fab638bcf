//! interviewbot-server — HTTP API for the AI interview backend.
//!
//! Exposes transcription, question generation, and answer evaluation under
//! `/api`, backed by an [`InterviewGateway`](interviewbot_core::InterviewGateway)
//! and a session log injected through [`AppState`].

pub mod error;
pub mod handlers;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use interviewbot_core::error::ServiceError;

pub use error::ApiError;
pub use state::AppState;

/// Routes without middleware, nested under `/api`.
pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    let api = Router::new()
        .route("/transcribe", post(handlers::transcribe).layer(upload_limit))
        .route("/next_question", get(handlers::next_question))
        .route("/evaluate", post(handlers::evaluate));

    Router::new().nest("/api", api).with_state(state)
}

/// CORS policy: only the listed origins, with credentials, mirroring the
/// requested methods and headers.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServiceError> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ServiceError::Config(format!("invalid CORS origin: {origin}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Full application: routes plus CORS and request tracing.
pub fn app(state: AppState, allowed_origins: &[String]) -> Result<Router, ServiceError> {
    Ok(router(state)
        .layer(cors_layer(allowed_origins)?)
        .layer(TraceLayer::new_for_http()))
}
