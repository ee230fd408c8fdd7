// lib.rs - central orchestrator
pub mod common;
pub mod data;
pub mod artefact;
pub mod inference;
pub mod api;
pub mod ui;

pub use common::{AppCfg, DiabCode, DiabError, DiabResult, FrontEnd};
pub use data::{Feature, FeatureVector};
pub use inference::{Label, Pipeline, Prediction};
