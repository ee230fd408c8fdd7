//! Startup loading of the fitted artefacts.

use crate::common::config::AppCfg;
use crate::common::error::DiabResult;

use super::domain::{ArtefactSet, FittedClassifier, FittedScaler};
use super::repo_fs::{ArtefactRepo, FsArtefactRepo};

/// Load and check both artefacts. Any failure here means the process must not serve.
pub fn load(repo: &dyn ArtefactRepo) -> DiabResult<ArtefactSet> {
    let scaler = FittedScaler::try_from(repo.load_scaler()?)?;
    let classifier = FittedClassifier::try_from(repo.load_classifier()?)?;

    tracing::info!(
        scaler = scaler.kind(),
        classifier = classifier.kind().as_str(),
        "artefacts loaded"
    );
    Ok(ArtefactSet { scaler, classifier })
}

/// Load the artefacts named by the configuration.
pub fn load_from_cfg(cfg: &AppCfg) -> DiabResult<ArtefactSet> {
    let repo = FsArtefactRepo::new(cfg);
    tracing::info!(
        scaler = %repo.scaler_path().display(),
        model = %repo.model_path().display(),
        "loading artefacts"
    );
    load(&repo)
}
