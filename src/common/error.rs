//! Error handling primitives shared across the core.
//!
//! Every fallible path in the crate returns [`DiabResult`]. Front ends map the
//! variants onto their own surfaces (HTTP status codes, an error page).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::ValidationErrors;

/// Stable error codes, logged alongside every failure.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DiabCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// An artefact file was not present.
    ArtefactMissing = 1,
    /// An artefact file could not be read, decoded or was structurally invalid.
    ArtefactInvalid = 2,
    /// Input failed validation.
    InvalidInput = 3,
    /// The scaler or classifier failed on a validated input.
    Inference = 4,
    /// Configuration could not be parsed.
    Config = 5,
    /// Catch-all for failures outside the prediction path.
    Internal = 6,
}

/// Canonical error type for the core.
#[derive(Debug, Error)]
pub enum DiabError {
    #[error("artefact not found: {}", path.display())]
    ArtefactMissing { path: PathBuf },

    #[error("failed to read artefact {}: {source}", path.display())]
    ArtefactIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed artefact {}: {source}", path.display())]
    ArtefactDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{artefact} artefact rejected: {reason}")]
    ArtefactInvalid {
        artefact: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Inference(String),

    #[error("record {index}: {source}")]
    BatchRecord {
        index: usize,
        #[source]
        source: Box<DiabError>,
    },

    #[error("invalid configuration for {key}: {reason}")]
    Config { key: &'static str, reason: String },

    #[error("failed to render page: {0}")]
    Render(#[from] minijinja::Error),

    #[error("server error: {0}")]
    Server(#[source] io::Error),
}

/// Result alias used throughout the crate.
pub type DiabResult<T> = Result<T, DiabError>;

impl DiabError {
    /// Inference helper.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Structural artefact check helper.
    pub fn invalid_artefact(artefact: &'static str, reason: impl Into<String>) -> Self {
        Self::ArtefactInvalid {
            artefact,
            reason: reason.into(),
        }
    }

    /// Configuration helper.
    pub fn config(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Config {
            key,
            reason: reason.into(),
        }
    }

    /// Machine parsable code for the failure category.
    pub fn code(&self) -> DiabCode {
        match self {
            DiabError::ArtefactMissing { .. } => DiabCode::ArtefactMissing,
            DiabError::ArtefactIo { .. }
            | DiabError::ArtefactDecode { .. }
            | DiabError::ArtefactInvalid { .. } => DiabCode::ArtefactInvalid,
            DiabError::Validation(_) => DiabCode::InvalidInput,
            DiabError::Inference(_) => DiabCode::Inference,
            DiabError::BatchRecord { source, .. } => source.code(),
            DiabError::Config { .. } => DiabCode::Config,
            DiabError::Render(_) | DiabError::Server(_) => DiabCode::Internal,
        }
    }
}
