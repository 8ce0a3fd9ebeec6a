//! Business logic services

pub mod balloon_service;
pub mod check_service;
pub mod contest_service;
pub mod dispatch_service;
pub mod event_service;
pub mod judging_service;
pub mod rejudging_service;
pub mod scoreboard_service;
pub mod submission_service;

pub use balloon_service::BalloonService;
pub use check_service::CheckService;
pub use contest_service::ContestService;
pub use dispatch_service::DispatchService;
pub use event_service::EventService;
pub use judging_service::JudgingService;
pub use rejudging_service::RejudgingService;
pub use scoreboard_service::ScoreboardService;
pub use submission_service::SubmissionService;
