//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Submission database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub contest_id: i64,
    pub team_id: i64,
    pub problem_id: i64,
    pub language_id: String,
    pub submit_time: DateTime<Utc>,
    pub valid: bool,
    /// Judgehost that claimed this submission; NULL while unclaimed
    pub judgehost: Option<String>,
    /// Dispatch priority, lower is judged sooner
    pub priority: i32,
    /// Rejudging this submission is currently part of
    pub rejudging_id: Option<i64>,
    /// Expected results for jury test submissions, used for auto-verify
    pub expected_results: Option<Vec<String>>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    /// Teams only compete against teams in the same sortorder
    pub sortorder: i32,
    pub enabled: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub name: String,
    pub timelimit_secs: f64,
    pub memlimit_kb: Option<i64>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Testcase {
    pub id: i64,
    pub problem_id: i64,
    /// Execution order within the problem, starting at 1
    pub rank: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    pub allow_judge: bool,
    /// Multiplier applied to the problem time limit
    pub time_factor: f64,
}
