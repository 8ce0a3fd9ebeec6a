//! Configuration handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

/// Configuration routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::get_config))
        .route("/{name}", put(handler::set_config))
}
