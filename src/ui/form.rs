//! Slider form model: control definitions, posted values and the verdict line.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::data::domain::{Feature, FEATURE_COUNT, FEATURE_ORDER};
use crate::data::service::ValidationErrors;
use crate::inference::domain::Prediction;

/// Increment of the slider for `feature`, fine enough to reach its default.
pub fn step(feature: Feature) -> f64 {
    match feature {
        Feature::Bmi => 0.1,
        Feature::DiabetesPedigreeFunction => 0.0005,
        _ => 1.0,
    }
}

/// One range control as the template sees it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Slider {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    pub error: Option<String>,
}

/// Build the eight sliders at `values`, attaching any field errors.
pub fn sliders(values: &[f64; FEATURE_COUNT], errors: Option<&ValidationErrors>) -> Vec<Slider> {
    FEATURE_ORDER
        .iter()
        .map(|&feature| {
            let range = feature.range();
            let error = errors.and_then(|errs| {
                errs.errors()
                    .iter()
                    .find(|err| err.field() == Some(feature.name()))
                    .map(|err| err.msg.clone())
            });
            Slider {
                name: feature.name(),
                label: feature.label(),
                description: feature.description(),
                min: range.min,
                max: range.max,
                step: step(feature),
                value: values[feature.index()],
                error,
            }
        })
        .collect()
}

/// Slider positions before anything is submitted.
pub fn default_values() -> [f64; FEATURE_COUNT] {
    FEATURE_ORDER.map(Feature::default_value)
}

/// Convert posted form fields into a record for the validator.
///
/// Text that parses as a finite number becomes a JSON number; anything else is
/// kept as a string so the validator reports it.
pub fn to_record(fields: &HashMap<String, String>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, raw)| {
            let value = raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.clone()));
            (key.clone(), value)
        })
        .collect()
}

/// Where to put each slider when re-rendering a submitted form. Unparsable
/// fields fall back to their defaults.
pub fn submitted_values(record: &Map<String, Value>) -> [f64; FEATURE_COUNT] {
    FEATURE_ORDER.map(|feature| {
        record
            .get(feature.name())
            .and_then(Value::as_f64)
            .unwrap_or_else(|| feature.default_value())
    })
}

/// Result line shown under the form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Verdict {
    pub positive: bool,
    pub message: String,
}

impl From<&Prediction> for Verdict {
    fn from(prediction: &Prediction) -> Self {
        let p = prediction.probabilities.positive;
        if prediction.label.is_positive() {
            Self {
                positive: true,
                message: format!("The model predicts diabetes with a probability of {p:.2}"),
            }
        } else {
            Self {
                positive: false,
                message: format!(
                    "The model predicts no diabetes with a probability of {:.2}",
                    1.0 - p
                ),
            }
        }
    }
}
