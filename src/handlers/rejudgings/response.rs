//! Rejudging response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Rejudging;

/// Rejudging response
#[derive(Debug, Serialize)]
pub struct RejudgingResponse {
    pub id: i64,
    pub started_by: String,
    pub finished_by: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub valid: bool,
    pub repeat_count: Option<i32>,
    pub repeated_rejudging_id: Option<i64>,
    /// Judgings finished so far
    pub finished: i64,
    /// Judgings created so far
    pub total: i64,
}

/// Rejudging list response
#[derive(Debug, Serialize)]
pub struct RejudgingsListResponse {
    pub rejudgings: Vec<RejudgingResponse>,
}

impl RejudgingResponse {
    pub fn from_rejudging(rejudging: &Rejudging, finished: i64, total: i64) -> Self {
        Self {
            id: rejudging.id,
            started_by: rejudging.started_by.clone(),
            finished_by: rejudging.finished_by.clone(),
            start_time: rejudging.start_time,
            end_time: rejudging.end_time,
            reason: rejudging.reason.clone(),
            valid: rejudging.valid,
            repeat_count: rejudging.repeat_count,
            repeated_rejudging_id: rejudging.repeated_rejudging_id,
            finished,
            total,
        }
    }
}
