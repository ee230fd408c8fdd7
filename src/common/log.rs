//! Tracing subscriber setup, emitting plain text or JSON lines.

use tracing_subscriber::EnvFilter;

use crate::common::config::{AppCfg, LogFormat};
use crate::common::error::{DiabError, DiabResult};

/// Install the global subscriber described by `cfg`.
///
/// `RUST_LOG` is ignored; the filter comes from `DIABETES_LOG` so both binaries
/// are configured the same way.
pub fn init(cfg: &AppCfg) -> DiabResult<()> {
    let filter = EnvFilter::try_new(&cfg.log_filter)
        .map_err(|err| DiabError::config("DIABETES_LOG", err.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match cfg.log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    installed.map_err(|err| DiabError::config("DIABETES_LOG", err.to_string()))
}
