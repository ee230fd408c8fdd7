//! Shared utilities that glue the different domains together.
pub mod config;
pub mod error;
pub mod log;

pub use config::{AppCfg, FrontEnd, LogFormat};
pub use error::{DiabCode, DiabError, DiabResult};
