//! Contest handlers

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

/// Contest routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_contests))
        .route("/{id}", get(handler::get_contest))
        .route("/{id}/times", put(handler::update_times))
        .route(
            "/{id}/removed-intervals",
            get(handler::list_removed_intervals).post(handler::add_removed_interval),
        )
        .route("/{id}/finalize-check", get(handler::finalize_check))
}
