//! Judging handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    services::{
        check_service::ConsistencyIssue, judging_service::RunOutputs, CheckService, JudgingService,
    },
    state::AppState,
    utils::{encoding::decode_base64, time::now_utc},
};

use super::{
    request::{AddJudgingRunRequest, OverrideResultRequest, ReportCompileRequest, VerifyRequest},
    response::{JudgingResponse, StaleJudgingsResponse},
};

/// Get a judging
pub async fn get_judging(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<JudgingResponse>> {
    let judging = JudgingService::get_judging(state.db(), id).await?;
    Ok(Json(JudgingResponse::from(&judging)))
}

/// Record the compile step of a judging
pub async fn report_compile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReportCompileRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    let settings = state.settings().await?;
    let output = payload
        .output_compile
        .as_deref()
        .map(decode_base64)
        .transpose()?;

    JudgingService::report_compile(
        state.db(),
        &state.redis(),
        &settings,
        id,
        payload.success,
        output,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Record one testcase result
pub async fn add_judging_run(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AddJudgingRunRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    let settings = state.settings().await?;
    let outputs = RunOutputs {
        run: payload.output_run.as_deref().map(decode_base64).transpose()?,
        diff: payload.output_diff.as_deref().map(decode_base64).transpose()?,
        error: payload.output_error.as_deref().map(decode_base64).transpose()?,
        system: payload.output_system.as_deref().map(decode_base64).transpose()?,
    };

    JudgingService::add_judging_run(
        state.db(),
        &state.redis(),
        &settings,
        id,
        payload.testcase_id,
        payload.run_result,
        payload.run_time,
        now_utc(),
        outputs,
    )
    .await?;

    Ok(StatusCode::CREATED)
}

/// Verify or unverify a judging
pub async fn verify(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<VerifyRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    let settings = state.settings().await?;
    JudgingService::set_verified(
        state.db(),
        &state.redis(),
        &settings,
        id,
        payload.verified,
        payload.jury_member.as_deref(),
        payload.comment.as_deref(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Override the verdict of a judging
pub async fn override_result(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<OverrideResultRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    let settings = state.settings().await?;
    JudgingService::override_result(
        state.db(),
        &state.redis(),
        &settings,
        id,
        &payload.result,
        &payload.jury_member,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Abort a judging whose host went away
pub async fn abort(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    JudgingService::abort_judging(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Judgings that look crashed (host silent past the critical threshold)
pub async fn stale_judgings(
    State(state): State<AppState>,
) -> AppResult<Json<StaleJudgingsResponse>> {
    let settings = state.settings().await?;
    let judgings = CheckService::stale_judgings(state.db(), &settings).await?;

    Ok(Json(StaleJudgingsResponse {
        judgings: judgings.iter().map(JudgingResponse::from).collect(),
    }))
}

/// Run the data consistency checks
pub async fn consistency_checks(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ConsistencyIssue>>> {
    let issues = CheckService::run_consistency_checks(state.db()).await?;
    Ok(Json(issues))
}
