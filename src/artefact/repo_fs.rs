//! Filesystem repository for the fitted artefacts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::common::config::AppCfg;
use crate::common::error::{DiabError, DiabResult};

use super::domain::{ClassifierArtefact, ScalerArtefact};

/// Source of the two artefacts.
pub trait ArtefactRepo {
    fn load_scaler(&self) -> DiabResult<ScalerArtefact>;
    fn load_classifier(&self) -> DiabResult<ClassifierArtefact>;
}

/// Reads `scaler.json` and `model.json` (or the configured names) from one directory.
pub struct FsArtefactRepo {
    scaler_path: PathBuf,
    model_path: PathBuf,
}

impl FsArtefactRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self::with_paths(cfg.scaler_path(), cfg.model_path())
    }

    pub fn with_paths(scaler_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            scaler_path: scaler_path.into(),
            model_path: model_path.into(),
        }
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl ArtefactRepo for FsArtefactRepo {
    fn load_scaler(&self) -> DiabResult<ScalerArtefact> {
        read_json(&self.scaler_path)
    }

    fn load_classifier(&self) -> DiabResult<ClassifierArtefact> {
        read_json(&self.model_path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> DiabResult<T> {
    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DiabError::ArtefactMissing {
            path: path.to_path_buf(),
        },
        _ => DiabError::ArtefactIo {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&raw).map_err(|source| DiabError::ArtefactDecode {
        path: path.to_path_buf(),
        source,
    })
}
