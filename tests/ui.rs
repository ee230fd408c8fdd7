mod common;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum_test::TestServer;

use diabetes_risk::artefact::service as artefacts;
use diabetes_risk::artefact::FsArtefactRepo;
use diabetes_risk::ui::{create_router, UiState};

use common::{fixture_pipeline, server};

fn ui() -> TestServer {
    server(create_router(Arc::new(UiState::new(Ok(fixture_pipeline())).unwrap())))
}

async fn submit(server: &TestServer, values: &[(&str, &str)]) -> (StatusCode, String) {
    let response = server.post("/").form(values).await;
    (response.status_code(), response.text())
}

fn example_form() -> [(&'static str, &'static str); 8] {
    [
        ("pregnancies", "3"),
        ("glucose", "117"),
        ("blood_pressure", "72"),
        ("skin_thickness", "29"),
        ("insulin", "125"),
        ("bmi", "32.3"),
        ("diabetes_pedigree_function", "0.3725"),
        ("age", "29"),
    ]
}

#[tokio::test]
async fn form_renders_eight_sliders() {
    let response = ui().get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let content_type = response.header(header::CONTENT_TYPE);
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
    let html = response.text();
    assert!(html.contains("Diabetes Prediction (Machine Learning Model)"));
    assert!(html.contains("Enter Patient Information:"));
    assert_eq!(html.matches("type=\"range\"").count(), 8);
    assert!(html.contains("min=\"44.0\" max=\"199.0\""));
    assert!(!html.contains("Prediction Result:"));
}

#[tokio::test]
async fn submitting_the_example_shows_a_negative_verdict() {
    let (status, html) = submit(&ui(), &example_form()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Prediction Result:"));
    assert!(html.contains("The model predicts no diabetes with a probability of 0.78"));
    assert!(html.contains("class=\"success\""));
}

#[tokio::test]
async fn submitting_a_high_risk_record_shows_an_alert() {
    let high = [
        ("pregnancies", "17"),
        ("glucose", "199"),
        ("blood_pressure", "122"),
        ("skin_thickness", "99"),
        ("insulin", "846"),
        ("bmi", "67.1"),
        ("diabetes_pedigree_function", "2.42"),
        ("age", "81"),
    ];
    let (status, html) = submit(&ui(), &high).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("The model predicts diabetes with a probability of 1.00"));
    assert!(html.contains("class=\"alert\" role=\"status\""));
}

#[tokio::test]
async fn hand_crafted_posts_are_still_validated() {
    let mut values = example_form();
    values[1] = ("glucose", "300");
    let (status, html) = submit(&ui(), &values).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("glucose: Input should be less than or equal to 199"));
    assert!(!html.contains("Prediction Result:"));
}

#[tokio::test]
async fn missing_artefacts_render_an_error_page() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FsArtefactRepo::with_paths(dir.path().join("scaler.json"), dir.path().join("model.json"));
    let reason = artefacts::load(&repo).map(|_| ()).unwrap_err().to_string();
    let ui = server(create_router(Arc::new(UiState::new(Err(reason)).unwrap())));

    let response = ui.get("/").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let html = response.text();
    assert!(html.contains("Error loading model files: artefact not found"));
    assert!(!html.contains("<form"));

    let (status, html) = submit(&ui, &example_form()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(!html.contains("Prediction Result:"));
}
