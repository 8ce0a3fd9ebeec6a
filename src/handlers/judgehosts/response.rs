//! Judgehost response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Judgehost, JudgehostHealth};

/// Judgehost response
#[derive(Debug, Serialize)]
pub struct JudgehostResponse {
    pub hostname: String,
    pub active: bool,
    pub poll_time: Option<DateTime<Utc>>,
    pub health: JudgehostHealth,
}

/// Judgehost list response
#[derive(Debug, Serialize)]
pub struct JudgehostsListResponse {
    pub judgehosts: Vec<JudgehostResponse>,
}

/// Internal error record
#[derive(Debug, Serialize)]
pub struct InternalErrorResponse {
    pub id: i64,
    pub judging_id: Option<i64>,
    pub contest_id: Option<i64>,
    pub description: String,
    pub time: DateTime<Utc>,
    pub status: String,
}

impl JudgehostResponse {
    pub fn from_judgehost(
        host: &Judgehost,
        now: DateTime<Utc>,
        warning_secs: i64,
        critical_secs: i64,
    ) -> Self {
        Self {
            hostname: host.hostname.clone(),
            active: host.active,
            poll_time: host.poll_time,
            health: host.health(now, warning_secs, critical_secs),
        }
    }
}
