//! Interactive HTML form in front of the same inference pipeline.

pub mod form;
pub mod render;
pub mod routes;

pub use routes::{create_router, UiState};
