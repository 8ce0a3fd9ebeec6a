//! Judging response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Judging;

/// Judging response
#[derive(Debug, Serialize)]
pub struct JudgingResponse {
    pub id: i64,
    pub submission_id: i64,
    pub contest_id: i64,
    pub judgehost: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub valid: bool,
    pub verified: bool,
    pub jury_member: Option<String>,
    pub rejudging_id: Option<i64>,
}

impl From<&Judging> for JudgingResponse {
    fn from(judging: &Judging) -> Self {
        Self {
            id: judging.id,
            submission_id: judging.submission_id,
            contest_id: judging.contest_id,
            judgehost: judging.judgehost.clone(),
            start_time: judging.start_time,
            end_time: judging.end_time,
            result: judging.result.clone(),
            valid: judging.valid,
            verified: judging.verified,
            jury_member: judging.jury_member.clone(),
            rejudging_id: judging.rejudging_id,
        }
    }
}

/// Stale judging list
#[derive(Debug, Serialize)]
pub struct StaleJudgingsResponse {
    pub judgings: Vec<JudgingResponse>,
}
