//! Request handlers for the prediction API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::data::service::{validate_batch, validate_record, Loc};

use super::error::{ApiError, Endpoint};
use super::routes::AppState;
use super::schema::{self, BatchPredictionResponse, HealthResponse, PredictionResponse, ServiceInfo};

/// Location prefix for errors found in the request body.
fn body_loc() -> [Loc; 1] {
    [Loc::from("body")]
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// Artefacts are loaded before the listener binds, so a running server always has both.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: true,
        scaler_loaded: true,
    })
}

pub async fn docs() -> Json<Value> {
    Json(schema::api_docs())
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(body) = body?;
    let features = validate_record(&body, &body_loc())?;
    let prediction = state
        .pipeline
        .predict(&features)
        .map_err(|err| ApiError::from_core(Endpoint::Single, err))?;
    Ok(Json(prediction.into()))
}

pub async fn predict_batch(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchPredictionResponse>, ApiError> {
    let Json(body) = body?;
    let batch = validate_batch(&body, &body_loc())?;
    let predictions = state
        .pipeline
        .predict_batch(&batch)
        .map_err(|err| ApiError::from_core(Endpoint::Batch, err))?;
    tracing::debug!(records = predictions.len(), "batch predicted");
    Ok(Json(predictions.into_iter().collect()))
}
