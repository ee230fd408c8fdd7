//! Axum router for the prediction API.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::inference::service::Pipeline;

use super::handlers;

/// Application state shared across handlers.
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

/// Create the API router.
///
/// - `GET /` service metadata
/// - `GET /health` liveness and artefact status
/// - `GET /docs` endpoint and input listing
/// - `POST /predict` one record
/// - `POST /predict-batch` `{"predictions": [...]}`
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/docs", get(handlers::docs))
        .route("/predict", post(handlers::predict))
        .route("/predict-batch", post(handlers::predict_batch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
