//! Validation of untyped patient records into [`FeatureVector`]s.
//!
//! Records arrive as JSON values (API bodies, or form posts converted by the
//! UI). Every problem is collected so callers can report all offending fields
//! at once. Values are never clamped.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::domain::{Feature, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};

/// One step of the path to an offending value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Loc {
    Key(String),
    Index(usize),
}

impl From<&str> for Loc {
    fn from(key: &str) -> Self {
        Loc::Key(key.to_string())
    }
}

impl From<usize> for Loc {
    fn from(index: usize) -> Self {
        Loc::Index(index)
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loc::Key(key) => f.write_str(key),
            Loc::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// A single rejected value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<Loc>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldError {
    pub fn new(loc: Vec<Loc>, kind: &'static str, msg: impl Into<String>, input: Option<&Value>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind,
            input: input.cloned(),
        }
    }

    /// Name of the field this error is about, if it concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self.loc.last() {
            Some(Loc::Key(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .loc
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        if path.is_empty() {
            f.write_str(&self.msg)
        } else {
            write!(f, "{path}: {}", self.msg)
        }
    }
}

/// Every failure found in one request.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any error concerns `feature`.
    pub fn mentions(&self, feature: Feature) -> bool {
        self.0.iter().any(|err| err.field() == Some(feature.name()))
    }

    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (idx, err) in self.0.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { "; " };
            write!(f, "{sep}{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn child(loc: &[Loc], segment: impl Into<Loc>) -> Vec<Loc> {
    let mut path = loc.to_vec();
    path.push(segment.into());
    path
}

/// Check one feature value.
fn check_value(feature: Feature, value: &Value, loc: Vec<Loc>) -> Result<f64, FieldError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    let Some(number) = number.filter(|n| n.is_finite()) else {
        return Err(FieldError::new(
            loc,
            "float_type",
            "Input should be a valid number",
            Some(value),
        ));
    };

    let range = feature.range();
    if number < range.min {
        return Err(FieldError::new(
            loc,
            "greater_than_equal",
            format!("Input should be greater than or equal to {}", range.min),
            Some(value),
        ));
    }
    if number > range.max {
        return Err(FieldError::new(
            loc,
            "less_than_equal",
            format!("Input should be less than or equal to {}", range.max),
            Some(value),
        ));
    }
    Ok(number)
}

/// Validate the eight named fields of an object. Extra keys are ignored.
pub fn validate_fields(fields: &Map<String, Value>, loc: &[Loc]) -> Result<FeatureVector, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut values = [0.0; FEATURE_COUNT];

    for feature in FEATURE_ORDER {
        let path = child(loc, feature.name());
        match fields.get(feature.name()) {
            None => errors.push(FieldError::new(path, "missing", "Field required", None)),
            Some(raw) => match check_value(feature, raw, path) {
                Ok(number) => values[feature.index()] = number,
                Err(err) => errors.push(err),
            },
        }
    }

    if errors.is_empty() {
        Ok(FeatureVector::from_checked(values))
    } else {
        Err(errors)
    }
}

/// Validate a single record, which must be a JSON object.
pub fn validate_record(record: &Value, loc: &[Loc]) -> Result<FeatureVector, ValidationErrors> {
    match record {
        Value::Object(fields) => validate_fields(fields, loc),
        other => Err(ValidationErrors::single(FieldError::new(
            loc.to_vec(),
            "dict_type",
            "Input should be a valid dictionary",
            Some(other),
        ))),
    }
}

/// Validate a batch envelope `{"predictions": [record, ...]}`.
///
/// Errors from every record are reported together, each located by its index.
pub fn validate_batch(body: &Value, loc: &[Loc]) -> Result<Vec<FeatureVector>, ValidationErrors> {
    let Value::Object(envelope) = body else {
        return Err(ValidationErrors::single(FieldError::new(
            loc.to_vec(),
            "dict_type",
            "Input should be a valid dictionary",
            Some(body),
        )));
    };

    let list_loc = child(loc, "predictions");
    let records = match envelope.get("predictions") {
        None => {
            return Err(ValidationErrors::single(FieldError::new(
                list_loc,
                "missing",
                "Field required",
                None,
            )))
        }
        Some(Value::Array(records)) => records,
        Some(other) => {
            return Err(ValidationErrors::single(FieldError::new(
                list_loc,
                "list_type",
                "Input should be a valid list",
                Some(other),
            )))
        }
    };

    let mut errors = ValidationErrors::default();
    let mut vectors = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match validate_record(record, &child(&list_loc, index)) {
            Ok(vector) => vectors.push(vector),
            Err(record_errors) => errors.extend(record_errors),
        }
    }

    if errors.is_empty() {
        Ok(vectors)
    } else {
        Err(errors)
    }
}

/// Validate values already in training column order.
pub fn validate_values(values: [f64; FEATURE_COUNT]) -> Result<FeatureVector, ValidationErrors> {
    let fields: Map<String, Value> = FEATURE_ORDER
        .iter()
        .zip(values)
        .map(|(feature, value)| {
            let json = serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number);
            (feature.name().to_string(), json)
        })
        .collect();
    validate_fields(&fields, &[])
}
