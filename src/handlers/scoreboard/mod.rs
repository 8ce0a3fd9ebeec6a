//! Scoreboard handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Scoreboard routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{contest_id}", get(handler::public_scoreboard))
        .route("/{contest_id}/jury", get(handler::jury_scoreboard))
        .route("/{contest_id}/recalculate", post(handler::recalculate))
}
