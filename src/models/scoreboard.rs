//! Score and rank cache models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cached scoreboard cell for one (contest, team, problem).
///
/// Restricted columns reflect true results; public columns treat
/// everything after the freeze as pending.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoreCacheCell {
    pub contest_id: i64,
    pub team_id: i64,
    pub problem_id: i64,
    pub submissions_restricted: i32,
    pub pending_restricted: i32,
    /// Contest time of the first correct submission, in seconds
    pub solve_time_restricted: i64,
    pub is_correct_restricted: bool,
    pub submissions_public: i32,
    pub pending_public: i32,
    pub solve_time_public: i64,
    pub is_correct_public: bool,
    pub is_first_to_solve: bool,
}

/// Cached rank totals for one (contest, team)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RankCacheRow {
    pub contest_id: i64,
    pub team_id: i64,
    pub points_restricted: i32,
    pub total_time_restricted: i64,
    pub points_public: i32,
    pub total_time_public: i64,
}

/// A balloon owed for a first correct submission on a problem
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Balloon {
    pub id: i64,
    pub submission_id: i64,
    pub done: bool,
}

/// Error reported by a judgehost that needs jury attention
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InternalError {
    pub id: i64,
    pub judging_id: Option<i64>,
    pub contest_id: Option<i64>,
    pub description: String,
    pub judgehost_log: Option<String>,
    pub time: DateTime<Utc>,
    /// What got disabled when the error was reported, stored as JSON
    pub disabled: String,
    pub status: String,
}

/// Target of an internal error's automatic disable action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisabledTarget {
    Judgehost { hostname: String },
    Problem { problem_id: i64 },
    Language { language_id: String },
}

pub mod internal_error_status {
    pub const OPEN: &str = "open";
    pub const RESOLVED: &str = "resolved";
    pub const IGNORED: &str = "ignored";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_target_json_shape() {
        let t = DisabledTarget::Judgehost {
            hostname: "judge-1".to_string(),
        };
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"kind":"judgehost","hostname":"judge-1"}"#);

        let back: DisabledTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
