//! Runtime configuration loaded from the process environment.

use std::env;
use std::path::PathBuf;

use crate::common::error::{DiabError, DiabResult};

/// Which front end a configuration snapshot is for. Only the default port differs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FrontEnd {
    Api,
    Ui,
}

impl FrontEnd {
    fn default_port(self) -> u16 {
        match self {
            FrontEnd::Api => 8000,
            FrontEnd::Ui => 8501,
        }
    }
}

/// Output format of the tracing subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Text,
    /// One JSON object per line.
    Json,
}

/// Snapshot of configuration values consumed by the binaries.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub artefact_dir: PathBuf,
    pub scaler_file: String,
    pub model_file: String,
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load(front_end: FrontEnd) -> DiabResult<Self> {
        Self::from_lookup(front_end, |key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup.
    pub fn from_lookup<F>(front_end: FrontEnd, lookup: F) -> DiabResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let artefact_dir = match lookup("DIABETES_ARTEFACT_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => executable_dir()?,
        };

        let port = match lookup("DIABETES_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|err| DiabError::config("DIABETES_PORT", format!("{raw:?}: {err}")))?,
            None => front_end.default_port(),
        };

        let log_format = match env_or("DIABETES_LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(DiabError::config(
                    "DIABETES_LOG_FORMAT",
                    format!("expected text or json, got {other:?}"),
                ))
            }
        };

        Ok(Self {
            artefact_dir,
            scaler_file: env_or("DIABETES_SCALER_FILE", "scaler.json"),
            model_file: env_or("DIABETES_MODEL_FILE", "model.json"),
            host: env_or("DIABETES_HOST", "0.0.0.0"),
            port,
            log_filter: env_or("DIABETES_LOG", "diabetes_risk=info,tower_http=info"),
            log_format,
        })
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.artefact_dir.join(&self.scaler_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.artefact_dir.join(&self.model_file)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Artefacts ship next to the binary unless told otherwise.
fn executable_dir() -> DiabResult<PathBuf> {
    let exe = env::current_exe()
        .map_err(|err| DiabError::config("DIABETES_ARTEFACT_DIR", err.to_string()))?;
    exe.parent().map(PathBuf::from).ok_or_else(|| {
        DiabError::config(
            "DIABETES_ARTEFACT_DIR",
            format!("{} has no parent directory", exe.display()),
        )
    })
}
