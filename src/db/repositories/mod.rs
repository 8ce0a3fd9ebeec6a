//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod config_repo;
pub mod contest_repo;
pub mod internal_error_repo;
pub mod judgehost_repo;
pub mod judging_repo;
pub mod rejudging_repo;
pub mod scoreboard_repo;
pub mod submission_repo;

pub use config_repo::{AuditRepository, ConfigRepository};
pub use contest_repo::ContestRepository;
pub use internal_error_repo::InternalErrorRepository;
pub use judgehost_repo::JudgehostRepository;
pub use judging_repo::JudgingRepository;
pub use rejudging_repo::RejudgingRepository;
pub use scoreboard_repo::ScoreboardRepository;
pub use submission_repo::SubmissionRepository;
