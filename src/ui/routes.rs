//! Axum router for the interactive form.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use tower_http::trace::TraceLayer;

use crate::common::error::DiabResult;
use crate::data::service::validate_fields;
use crate::inference::service::Pipeline;

use super::form::{default_values, sliders, submitted_values, to_record, Verdict};
use super::render::{problems, Renderer};

/// Shared UI state. A failed artefact load is kept so every request can report it.
pub struct UiState {
    pipeline: Result<Arc<Pipeline>, String>,
    renderer: Renderer,
}

impl UiState {
    pub fn new(pipeline: Result<Arc<Pipeline>, String>) -> DiabResult<Self> {
        Ok(Self {
            pipeline,
            renderer: Renderer::new()?,
        })
    }

    fn page(&self, status: StatusCode, html: DiabResult<String>) -> Response {
        match html {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(code = err.code() as u32, "{err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
            }
        }
    }

    fn unavailable(&self, reason: &str) -> Response {
        self.page(
            StatusCode::SERVICE_UNAVAILABLE,
            self.renderer.load_error(reason),
        )
    }
}

/// Create the UI router: `GET /` shows the form, `POST /` predicts.
pub fn create_router(state: Arc<UiState>) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn show_form(State(state): State<Arc<UiState>>) -> Response {
    if let Err(reason) = &state.pipeline {
        return state.unavailable(reason);
    }
    let html = state
        .renderer
        .form(&sliders(&default_values(), None), None, &[]);
    state.page(StatusCode::OK, html)
}

async fn submit(
    State(state): State<Arc<UiState>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let pipeline = match &state.pipeline {
        Ok(pipeline) => pipeline,
        Err(reason) => return state.unavailable(reason),
    };

    let record = to_record(&fields);
    let values = submitted_values(&record);

    let features = match validate_fields(&record, &[]) {
        Ok(features) => features,
        Err(errors) => {
            tracing::warn!("{errors}");
            let html = state
                .renderer
                .form(&sliders(&values, Some(&errors)), None, &problems(&errors));
            return state.page(StatusCode::UNPROCESSABLE_ENTITY, html);
        }
    };

    let controls = sliders(&values, None);
    match pipeline.predict(&features) {
        Ok(prediction) => {
            let verdict = Verdict::from(&prediction);
            let html = state.renderer.form(&controls, Some(&verdict), &[]);
            state.page(StatusCode::OK, html)
        }
        Err(err) => {
            tracing::warn!(code = err.code() as u32, "Prediction error: {err}");
            let html = state
                .renderer
                .form(&controls, None, &[format!("Prediction error: {err}")]);
            state.page(StatusCode::BAD_REQUEST, html)
        }
    }
}
