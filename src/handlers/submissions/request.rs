//! Submission request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// Create submission request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    pub contest_id: i64,
    pub team_id: i64,
    pub problem_id: i64,

    #[validate(length(min = 1, max = 32))]
    pub language_id: String,

    /// Defaults to now; jury imports may backdate
    pub submit_time: Option<DateTime<Utc>>,

    /// Expected results for jury test submissions
    #[validate(length(max = 10))]
    pub expected_results: Option<Vec<String>>,
}
