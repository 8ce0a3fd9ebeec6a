//! Scoreboard response DTOs

use serde::Serialize;

/// One problem cell in a scoreboard row
#[derive(Debug, Serialize)]
pub struct ScoreboardCellResponse {
    pub problem_id: i64,
    pub submissions: i32,
    pub pending: i32,
    pub solve_time_secs: i64,
    pub is_correct: bool,
    pub is_first_to_solve: bool,
}

/// One team row
#[derive(Debug, Serialize)]
pub struct ScoreboardRowResponse {
    pub rank: u32,
    pub team_id: i64,
    pub sortorder: i32,
    pub points: i32,
    pub total_time: i64,
    pub cells: Vec<ScoreboardCellResponse>,
}

/// Full scoreboard
#[derive(Debug, Serialize)]
pub struct ScoreboardResponse {
    pub contest_id: i64,
    /// True while the public board is hiding post-freeze results
    pub frozen: bool,
    pub rows: Vec<ScoreboardRowResponse>,
}

/// Result of a cache rebuild
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub contest_id: i64,
    pub pruned_cells: u64,
}
