//! Artefact domain: the fitted scaler and classifier consumed at startup.
//!
//! Training happens offline; this module only reads and checks what it produced.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{ArtefactSet, FittedClassifier, FittedScaler, ModelKind};
pub use repo_fs::{ArtefactRepo, FsArtefactRepo};
