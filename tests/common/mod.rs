#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use diabetes_risk::artefact::service as artefacts;
use diabetes_risk::artefact::FsArtefactRepo;
use diabetes_risk::Pipeline;

pub fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn fixture_repo() -> FsArtefactRepo {
    FsArtefactRepo::with_paths(fixtures().join("scaler.json"), fixtures().join("model.json"))
}

pub fn fixture_pipeline() -> Arc<Pipeline> {
    let set = artefacts::load(&fixture_repo()).expect("fixture artefacts load");
    Arc::new(Pipeline::from_artefacts(set))
}

pub fn server(app: Router) -> TestServer {
    TestServer::new(app).expect("test server starts")
}
