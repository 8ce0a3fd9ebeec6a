//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod config;
pub mod contests;
pub mod health;
pub mod judgehosts;
pub mod judgings;
pub mod rejudgings;
pub mod scoreboard;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/config", config::routes())
        .nest("/contests", contests::routes())
        .nest("/submissions", submissions::routes())
        .nest("/judgehosts", judgehosts::routes())
        .nest("/judgings", judgings::routes())
        .nest("/rejudgings", rejudgings::routes())
        .nest("/scoreboard", scoreboard::routes())
}
