//! Judging and judging run models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One judging attempt of a submission.
///
/// A submission has at most one valid judging; rejudge attempts are
/// created with `valid = false` and promoted when the rejudging is
/// applied.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Judging {
    pub id: i64,
    pub submission_id: i64,
    pub contest_id: i64,
    pub judgehost: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Final verdict; NULL while the judging is in progress
    pub result: Option<String>,
    pub valid: bool,
    pub verified: bool,
    pub jury_member: Option<String>,
    pub verify_comment: Option<String>,
    /// Rejudging that created this judging, if any
    pub rejudging_id: Option<i64>,
    /// Judging that was valid when this rejudge attempt was created
    pub prev_judging_id: Option<i64>,
    pub output_compile: Option<String>,
}

impl Judging {
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }
}

/// Per-testcase result within a judging
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct JudgingRun {
    pub id: i64,
    pub judging_id: i64,
    pub testcase_id: i64,
    pub run_result: String,
    pub run_time: f64,
    pub end_time: DateTime<Utc>,
    pub output_run: Option<String>,
    pub output_diff: Option<String>,
    pub output_error: Option<String>,
    pub output_system: Option<String>,
}
