//! Interactive form front end.
//!
//! Unlike the API, a failed artefact load does not stop the process: every
//! page shows the load error instead of the form.

use std::process::ExitCode;
use std::sync::Arc;

use diabetes_risk::artefact::service as artefacts;
use diabetes_risk::common::log;
use diabetes_risk::ui::{self, UiState};
use diabetes_risk::{api, AppCfg, DiabResult, FrontEnd, Pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code() as u32, "{err}");
            eprintln!("diabetes-ui: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DiabResult<()> {
    let cfg = AppCfg::load(FrontEnd::Ui)?;
    log::init(&cfg)?;

    let pipeline = match artefacts::load_from_cfg(&cfg) {
        Ok(set) => Ok(Arc::new(Pipeline::from_artefacts(set))),
        Err(err) => {
            tracing::error!(code = err.code() as u32, "{err}");
            Err(err.to_string())
        }
    };

    let app = ui::create_router(Arc::new(UiState::new(pipeline)?));
    api::serve(app, &cfg).await
}
