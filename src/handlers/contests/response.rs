//! Contest response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Contest, RemovedInterval};

/// Contest response
#[derive(Debug, Serialize)]
pub struct ContestResponse {
    pub id: i64,
    pub name: String,
    pub shortname: String,
    pub activate_time: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub freeze_time: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
    pub unfreeze_time: Option<DateTime<Utc>>,
    pub deactivate_time: Option<DateTime<Utc>>,
    pub enabled: bool,
    pub public: bool,
    /// Elapsed contest seconds at response time; absent before start
    pub contest_time_secs: Option<i64>,
    pub started: bool,
    pub frozen: bool,
    pub final_standings: bool,
}

/// Contest list response
#[derive(Debug, Serialize)]
pub struct ContestsListResponse {
    pub contests: Vec<ContestResponse>,
}

/// Result of a times update
#[derive(Debug, Serialize)]
pub struct UpdateTimesResponse {
    pub contest: ContestResponse,
    /// The scoreboard caches need an explicit recalculation
    pub cache_refresh_needed: bool,
}

/// Clock pause interval
#[derive(Debug, Serialize)]
pub struct RemovedIntervalResponse {
    pub id: i64,
    pub contest_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<&RemovedInterval> for RemovedIntervalResponse {
    fn from(interval: &RemovedInterval) -> Self {
        Self {
            id: interval.id,
            contest_id: interval.contest_id,
            start_time: interval.start_time,
            end_time: interval.end_time,
        }
    }
}

/// Removed intervals of a contest
#[derive(Debug, Serialize)]
pub struct RemovedIntervalsResponse {
    pub intervals: Vec<RemovedIntervalResponse>,
}

/// Finalize readiness
#[derive(Debug, Serialize)]
pub struct FinalizeCheckResponse {
    pub can_finalize: bool,
    pub blocking_reasons: Vec<String>,
}

impl ContestResponse {
    pub fn from_contest(contest: &Contest, now: DateTime<Utc>, contest_time_secs: Option<i64>) -> Self {
        let freeze = contest.freeze_data(now);
        Self {
            id: contest.id,
            name: contest.name.clone(),
            shortname: contest.shortname.clone(),
            activate_time: contest.activate_time,
            start_time: contest.start_time,
            freeze_time: contest.freeze_time,
            end_time: contest.end_time,
            unfreeze_time: contest.unfreeze_time,
            deactivate_time: contest.deactivate_time,
            enabled: contest.enabled,
            public: contest.public,
            contest_time_secs,
            started: freeze.started,
            frozen: freeze.show_frozen,
            final_standings: freeze.show_final,
        }
    }
}
