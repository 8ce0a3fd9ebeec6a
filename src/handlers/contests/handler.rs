//! Contest handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    db::repositories::ContestRepository,
    error::AppResult,
    services::{contest_service::TimeStringUpdate, ContestService},
    state::AppState,
    utils::time::now_utc,
};

use super::{
    request::{AddRemovedIntervalRequest, UpdateTimesRequest},
    response::{
        ContestResponse, ContestsListResponse, FinalizeCheckResponse, RemovedIntervalResponse,
        RemovedIntervalsResponse, UpdateTimesResponse,
    },
};

/// List active contests
pub async fn list_contests(State(state): State<AppState>) -> AppResult<Json<ContestsListResponse>> {
    let contests = ContestService::list_active(state.db()).await?;

    let mut responses = Vec::with_capacity(contests.len());
    for contest in &contests {
        responses.push(contest_response(&state, contest).await?);
    }

    Ok(Json(ContestsListResponse { contests: responses }))
}

/// Get a contest with its clock state
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ContestResponse>> {
    let contest = ContestService::get_contest(state.db(), id).await?;
    Ok(Json(contest_response(&state, &contest).await?))
}

/// Update contest times from their authoritative strings
pub async fn update_times(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTimesRequest>,
) -> AppResult<Json<UpdateTimesResponse>> {
    payload.validate()?;

    let update = TimeStringUpdate {
        activate_time: payload.activate_time,
        start_time: payload.start_time,
        freeze_time: payload.freeze_time,
        end_time: payload.end_time,
        unfreeze_time: payload.unfreeze_time,
        deactivate_time: payload.deactivate_time,
    };
    let (contest, cache_refresh_needed) =
        ContestService::update_times(state.db(), id, update, &payload.username).await?;

    Ok(Json(UpdateTimesResponse {
        contest: contest_response(&state, &contest).await?,
        cache_refresh_needed,
    }))
}

/// Pause the contest clock over an interval
pub async fn add_removed_interval(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AddRemovedIntervalRequest>,
) -> AppResult<(StatusCode, Json<RemovedIntervalResponse>)> {
    payload.validate()?;

    let interval = ContestService::add_removed_interval(
        state.db(),
        id,
        payload.start_time,
        payload.end_time,
        &payload.username,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(RemovedIntervalResponse::from(&interval))))
}

/// List the clock pauses of a contest
pub async fn list_removed_intervals(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RemovedIntervalsResponse>> {
    let intervals = ContestService::removed_intervals(state.db(), id).await?;

    Ok(Json(RemovedIntervalsResponse {
        intervals: intervals.iter().map(RemovedIntervalResponse::from).collect(),
    }))
}

/// Check whether the contest can be finalized
pub async fn finalize_check(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<FinalizeCheckResponse>> {
    let settings = state.settings().await?;
    let reasons = ContestService::finalize_check(state.db(), &settings, id).await?;

    Ok(Json(FinalizeCheckResponse {
        can_finalize: reasons.is_empty(),
        blocking_reasons: reasons,
    }))
}

async fn contest_response(state: &AppState, contest: &crate::models::Contest) -> AppResult<ContestResponse> {
    let now = now_utc();
    let removed = ContestRepository::removed_intervals(state.db(), contest.id).await?;
    let contest_time_secs = contest.contest_time(now, &removed).map(|d| d.num_seconds());
    Ok(ContestResponse::from_contest(contest, now, contest_time_secs))
}
