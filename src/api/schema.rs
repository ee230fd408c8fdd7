//! Wire shapes of the prediction API.

use serde::Serialize;
use serde_json::{json, Value};

use crate::data::domain::{Feature, FEATURE_ORDER};
use crate::inference::domain::Prediction;

/// Outcome for one record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub prediction: u8,
    pub probability_diabetes: f64,
    pub probability_no_diabetes: f64,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            prediction: prediction.label.as_u8(),
            probability_diabetes: prediction.probabilities.positive,
            probability_no_diabetes: prediction.probabilities.negative,
        }
    }
}

/// Outcomes for a batch, positionally aligned with the request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchPredictionResponse {
    pub results: Vec<PredictionResponse>,
}

impl FromIterator<Prediction> for BatchPredictionResponse {
    fn from_iter<I: IntoIterator<Item = Prediction>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().map(PredictionResponse::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub docs: &'static str,
    pub health: &'static str,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            message: "Diabetes Prediction API",
            version: env!("CARGO_PKG_VERSION"),
            docs: "/docs",
            health: "/health",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

/// The documented example request body.
pub fn example_record() -> Value {
    let fields = FEATURE_ORDER
        .iter()
        .map(|f| (f.name().to_string(), json!(f.default_value())))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(fields)
}

fn feature_schema(feature: Feature) -> Value {
    let range = feature.range();
    json!({
        "name": feature.name(),
        "description": feature.description(),
        "type": if feature.is_integral() { "integer" } else { "number" },
        "minimum": range.min,
        "maximum": range.max,
        "default": feature.default_value(),
        "training_column": feature.column(),
    })
}

/// Endpoint and input listing served at `/docs`.
pub fn api_docs() -> Value {
    json!({
        "title": "Diabetes Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            {"method": "GET", "path": "/", "summary": "Service metadata"},
            {"method": "GET", "path": "/health", "summary": "Liveness and artefact status"},
            {"method": "GET", "path": "/docs", "summary": "This document"},
            {"method": "POST", "path": "/predict", "summary": "Predict one patient record"},
            {"method": "POST", "path": "/predict-batch", "summary": "Predict a list of records under \"predictions\""},
        ],
        "features": FEATURE_ORDER.iter().map(|f| feature_schema(*f)).collect::<Vec<_>>(),
        "example": example_record(),
    })
}
