//! Mapping of core failures onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::common::error::DiabError;
use crate::data::service::{FieldError, Loc, ValidationErrors};

/// Which endpoint an inference failure came from; picks the message prefix.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endpoint {
    Single,
    Batch,
}

#[derive(Debug)]
pub enum ApiError {
    /// 422 with field-level detail.
    Unprocessable(ValidationErrors),
    /// 400 with a message.
    BadRequest(String),
}

impl ApiError {
    /// Classify a core error raised while serving `endpoint`.
    pub fn from_core(endpoint: Endpoint, err: DiabError) -> Self {
        match err {
            DiabError::Validation(errors) => ApiError::Unprocessable(errors),
            other => {
                let prefix = match endpoint {
                    Endpoint::Single => "Prediction error",
                    Endpoint::Batch => "Batch prediction error",
                };
                ApiError::BadRequest(format!("{prefix}: {other}"))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Unprocessable(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match rejection {
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "json_invalid",
        };
        ApiError::Unprocessable(ValidationErrors::single(FieldError::new(
            vec![Loc::from("body")],
            kind,
            rejection.body_text(),
            None,
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Unprocessable(errors) => {
                tracing::warn!(errors = errors.errors().len(), "{errors}");
                (status, Json(json!({ "detail": errors }))).into_response()
            }
            ApiError::BadRequest(message) => {
                tracing::warn!("{message}");
                (status, Json(json!({ "detail": message }))).into_response()
            }
        }
    }
}
