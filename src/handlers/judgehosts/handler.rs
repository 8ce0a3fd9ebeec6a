//! Judgehost handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    db::repositories::JudgehostRepository,
    error::{AppError, AppResult},
    models::InternalError,
    services::{CheckService, DispatchService},
    state::AppState,
    utils::{encoding::decode_base64, time::now_utc},
};

use super::{
    request::{
        CloseInternalErrorRequest, RegisterJudgehostRequest, ReportInternalErrorRequest,
        SetActiveRequest,
    },
    response::{InternalErrorResponse, JudgehostResponse, JudgehostsListResponse},
};

/// Register a judgehost (idempotent)
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterJudgehostRequest>,
) -> AppResult<(StatusCode, Json<JudgehostResponse>)> {
    payload.validate()?;

    let settings = state.settings().await?;
    let host = JudgehostRepository::register(state.db(), &payload.hostname, now_utc()).await?;

    Ok((
        StatusCode::CREATED,
        Json(JudgehostResponse::from_judgehost(
            &host,
            now_utc(),
            settings.judgehost_warning,
            settings.judgehost_critical,
        )),
    ))
}

/// List judgehosts with their health
pub async fn list_judgehosts(
    State(state): State<AppState>,
) -> AppResult<Json<JudgehostsListResponse>> {
    let settings = state.settings().await?;
    let hosts = CheckService::list_judgehosts(state.db()).await?;
    let now = now_utc();

    Ok(Json(JudgehostsListResponse {
        judgehosts: hosts
            .iter()
            .map(|h| {
                JudgehostResponse::from_judgehost(
                    h,
                    now,
                    settings.judgehost_warning,
                    settings.judgehost_critical,
                )
            })
            .collect(),
    }))
}

/// Enable or disable a judgehost
pub async fn set_active(
    State(state): State<AppState>,
    Path(hostname): Path<String>,
    Json(payload): Json<SetActiveRequest>,
) -> AppResult<StatusCode> {
    JudgehostRepository::find_by_hostname(state.db(), &hostname)
        .await?
        .ok_or_else(|| AppError::NotFound("Judgehost not found".to_string()))?;
    JudgehostRepository::set_active(state.db(), &hostname, payload.active).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Long-poll for the next judging assignment. 204 when no work showed
/// up within the window.
pub async fn fetch_work(
    State(state): State<AppState>,
    Path(hostname): Path<String>,
) -> AppResult<axum::response::Response> {
    use axum::response::IntoResponse;

    let dispatch = state.config().dispatch.clone();
    let redis = state.redis();
    match DispatchService::request_work_longpoll(state.db(), &redis, &dispatch, &hostname).await? {
        Some(assignment) => Ok((StatusCode::CREATED, Json(assignment)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Report an internal error; disables the named target
pub async fn report_internal_error(
    State(state): State<AppState>,
    Json(payload): Json<ReportInternalErrorRequest>,
) -> AppResult<(StatusCode, Json<InternalErrorResponse>)> {
    payload.validate()?;

    let judgehost_log = payload
        .judgehost_log
        .as_deref()
        .map(decode_base64)
        .transpose()?;

    let error = CheckService::report_internal_error(
        state.db(),
        payload.judging_id,
        payload.contest_id,
        &payload.description,
        judgehost_log.as_deref(),
        &payload.disabled,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(to_error_response(&error))))
}

/// List open internal errors
pub async fn list_internal_errors(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InternalErrorResponse>>> {
    let errors = CheckService::list_open_errors(state.db()).await?;
    Ok(Json(errors.iter().map(to_error_response).collect()))
}

/// Resolve or ignore an internal error
pub async fn close_internal_error(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CloseInternalErrorRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;
    CheckService::close_internal_error(state.db(), id, &payload.status).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn to_error_response(error: &InternalError) -> InternalErrorResponse {
    InternalErrorResponse {
        id: error.id,
        judging_id: error.judging_id,
        contest_id: error.contest_id,
        description: error.description.clone(),
        time: error.time,
        status: error.status.clone(),
    }
}
