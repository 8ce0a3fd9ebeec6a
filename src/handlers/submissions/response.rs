//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Submission;

/// Submission response
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: i64,
    pub contest_id: i64,
    pub team_id: i64,
    pub problem_id: i64,
    pub language_id: String,
    pub submit_time: DateTime<Utc>,
    pub valid: bool,
    pub judgehost: Option<String>,
    pub rejudging_id: Option<i64>,
}

impl From<&Submission> for SubmissionResponse {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id,
            contest_id: submission.contest_id,
            team_id: submission.team_id,
            problem_id: submission.problem_id,
            language_id: submission.language_id.clone(),
            submit_time: submission.submit_time,
            valid: submission.valid,
            judgehost: submission.judgehost.clone(),
            rejudging_id: submission.rejudging_id,
        }
    }
}
