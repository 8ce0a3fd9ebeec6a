//! Submission handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{error::AppResult, services::SubmissionService, state::AppState};

use super::{request::CreateSubmissionRequest, response::SubmissionResponse};

/// Accept a new submission
pub async fn create_submission(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubmissionRequest>,
) -> AppResult<(StatusCode, Json<SubmissionResponse>)> {
    payload.validate()?;

    let submission = SubmissionService::create_submission(
        state.db(),
        &state.redis(),
        payload.contest_id,
        payload.team_id,
        payload.problem_id,
        &payload.language_id,
        payload.submit_time,
        payload.expected_results,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(&submission))))
}

/// Get a submission
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = SubmissionService::get_submission(state.db(), id).await?;
    Ok(Json(SubmissionResponse::from(&submission)))
}
