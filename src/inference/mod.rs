//! Inference domain providing single and batch prediction over the loaded artefacts.

pub mod domain;
pub mod engines;
pub mod service;

pub use domain::{ClassProbabilities, Classifier, Label, Prediction};
pub use service::Pipeline;
