//! judgecore - Contest Judging Engine
//!
//! This library provides the backend core of a programming contest
//! judging platform: it dispatches submissions to judgehosts, tracks
//! judgings through their lifecycle, coordinates rejudgings, and keeps
//! the scoreboard caches consistent with the judged results.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Models**: Domain models and DTOs
//!
//! The scoring and verdict computations live in `scoring` and `verdict`
//! as pure functions of the submission history, so the scoreboard can
//! always be rebuilt from scratch.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod scoring;
pub mod services;
pub mod settings;
pub mod state;
pub mod utils;
pub mod verdict;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
