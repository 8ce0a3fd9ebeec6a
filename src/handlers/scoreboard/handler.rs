//! Scoreboard handler implementations

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    db::repositories::ScoreboardRepository,
    error::AppResult,
    models::ScoreCacheCell,
    services::ScoreboardService,
    state::AppState,
    utils::time::now_utc,
};

use super::response::{
    RecalculateResponse, ScoreboardCellResponse, ScoreboardResponse, ScoreboardRowResponse,
};

/// Public scoreboard: post-freeze results are hidden
pub async fn public_scoreboard(
    State(state): State<AppState>,
    Path(contest_id): Path<i64>,
) -> AppResult<Json<ScoreboardResponse>> {
    scoreboard(state, contest_id, false).await
}

/// Jury scoreboard: true results, freeze ignored
pub async fn jury_scoreboard(
    State(state): State<AppState>,
    Path(contest_id): Path<i64>,
) -> AppResult<Json<ScoreboardResponse>> {
    scoreboard(state, contest_id, true).await
}

/// Rebuild the score and rank caches from scratch
pub async fn recalculate(
    State(state): State<AppState>,
    Path(contest_id): Path<i64>,
) -> AppResult<Json<RecalculateResponse>> {
    let settings = state.settings().await?;
    let contest = ScoreboardService::load_contest(state.db(), contest_id).await?;
    let pruned_cells = ScoreboardService::recalculate_all(state.db(), &settings, &contest).await?;

    Ok(Json(RecalculateResponse {
        contest_id,
        pruned_cells,
    }))
}

async fn scoreboard(
    state: AppState,
    contest_id: i64,
    restricted: bool,
) -> AppResult<Json<ScoreboardResponse>> {
    let settings = state.settings().await?;
    let contest = ScoreboardService::load_contest(state.db(), contest_id).await?;
    let standings =
        ScoreboardService::standings(state.db(), &settings, &contest, restricted).await?;
    let cells = ScoreboardRepository::contest_cells(state.db(), contest_id).await?;

    let cells_by_team: HashMap<i64, Vec<&ScoreCacheCell>> =
        cells.iter().fold(HashMap::new(), |mut acc, c| {
            acc.entry(c.team_id).or_default().push(c);
            acc
        });

    let rows = standings
        .iter()
        .map(|(rank, standing)| ScoreboardRowResponse {
            rank: *rank,
            team_id: standing.team_id,
            sortorder: standing.sortorder,
            points: standing.points,
            total_time: standing.total_time,
            cells: cells_by_team
                .get(&standing.team_id)
                .map(|cells| {
                    cells
                        .iter()
                        .map(|c| cell_response(c, restricted))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    let frozen = contest.freeze_data(now_utc()).show_frozen;
    Ok(Json(ScoreboardResponse {
        contest_id,
        frozen,
        rows,
    }))
}

fn cell_response(cell: &ScoreCacheCell, restricted: bool) -> ScoreboardCellResponse {
    if restricted {
        ScoreboardCellResponse {
            problem_id: cell.problem_id,
            submissions: cell.submissions_restricted,
            pending: cell.pending_restricted,
            solve_time_secs: cell.solve_time_restricted,
            is_correct: cell.is_correct_restricted,
            is_first_to_solve: cell.is_first_to_solve,
        }
    } else {
        ScoreboardCellResponse {
            problem_id: cell.problem_id,
            submissions: cell.submissions_public,
            pending: cell.pending_public,
            solve_time_secs: cell.solve_time_public,
            is_correct: cell.is_correct_public,
            is_first_to_solve: cell.is_first_to_solve && cell.is_correct_public,
        }
    }
}
