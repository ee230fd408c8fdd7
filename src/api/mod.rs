//! JSON prediction API served over HTTP.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod schema;
pub mod server;

pub use error::ApiError;
pub use routes::{create_router, AppState};
pub use server::serve;
