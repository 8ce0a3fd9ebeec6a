//! Judgehost API handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Judgehost routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_judgehosts))
        .route("/", post(handler::register))
        .route("/{hostname}/active", put(handler::set_active))
        .route("/{hostname}/fetch-work", post(handler::fetch_work))
        .route("/internal-errors", get(handler::list_internal_errors))
        .route("/internal-errors", post(handler::report_internal_error))
        .route("/internal-errors/{id}", put(handler::close_internal_error))
}
