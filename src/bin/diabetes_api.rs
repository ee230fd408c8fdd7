//! JSON prediction API.
//!
//! Loads the scaler and classifier before binding; if either is missing or
//! invalid the process exits without serving.

use std::process::ExitCode;
use std::sync::Arc;

use diabetes_risk::api::{self, AppState};
use diabetes_risk::artefact::service as artefacts;
use diabetes_risk::common::log;
use diabetes_risk::{AppCfg, DiabResult, FrontEnd, Pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code() as u32, "{err}");
            eprintln!("diabetes-api: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DiabResult<()> {
    let cfg = AppCfg::load(FrontEnd::Api)?;
    log::init(&cfg)?;

    let pipeline = Arc::new(Pipeline::from_artefacts(artefacts::load_from_cfg(&cfg)?));
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        scaler = pipeline.scaler_kind(),
        classifier = pipeline.classifier_kind(),
        "diabetes-api starting"
    );

    let app = api::create_router(Arc::new(AppState::new(pipeline)));
    api::serve(app, &cfg).await
}
