//! Rejudging handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Rejudging routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_rejudgings))
        .route("/", post(handler::start_rejudging))
        .route("/{id}", get(handler::get_rejudging))
        .route("/{id}/apply", post(handler::apply_rejudging))
        .route("/{id}/cancel", post(handler::cancel_rejudging))
}
