//! Judging handlers

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

/// Judging routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stale", get(handler::stale_judgings))
        .route("/consistency-checks", get(handler::consistency_checks))
        .route("/{id}", get(handler::get_judging))
        .route("/{id}/compile", put(handler::report_compile))
        .route("/{id}/runs", post(handler::add_judging_run))
        .route("/{id}/verify", put(handler::verify))
        .route("/{id}/result", put(handler::override_result))
        .route("/{id}/abort", post(handler::abort))
}
