//! Rejudging handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    services::{rejudging_service::FinishAction, RejudgingService},
    state::AppState,
};

use super::{
    request::{FinishRejudgingRequest, StartRejudgingRequest},
    response::{RejudgingResponse, RejudgingsListResponse},
};

/// Start a rejudging
pub async fn start_rejudging(
    State(state): State<AppState>,
    Json(payload): Json<StartRejudgingRequest>,
) -> AppResult<(StatusCode, Json<RejudgingResponse>)> {
    payload.validate()?;

    let rejudging = RejudgingService::start(
        state.db(),
        &payload.started_by,
        &payload.reason,
        &payload.selector,
        payload.repeat,
        None,
    )
    .await?;
    let (finished, total) = RejudgingService::progress(state.db(), rejudging.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RejudgingResponse::from_rejudging(&rejudging, finished, total)),
    ))
}

/// List rejudgings
pub async fn list_rejudgings(
    State(state): State<AppState>,
) -> AppResult<Json<RejudgingsListResponse>> {
    let rejudgings = RejudgingService::list(state.db()).await?;

    let mut responses = Vec::with_capacity(rejudgings.len());
    for rejudging in &rejudgings {
        let (finished, total) = RejudgingService::progress(state.db(), rejudging.id).await?;
        responses.push(RejudgingResponse::from_rejudging(rejudging, finished, total));
    }

    Ok(Json(RejudgingsListResponse {
        rejudgings: responses,
    }))
}

/// Get a rejudging with its progress
pub async fn get_rejudging(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RejudgingResponse>> {
    let rejudging = RejudgingService::get(state.db(), id).await?;
    let (finished, total) = RejudgingService::progress(state.db(), id).await?;

    Ok(Json(RejudgingResponse::from_rejudging(
        &rejudging, finished, total,
    )))
}

/// Apply a rejudging: promote the new judgings
pub async fn apply_rejudging(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<FinishRejudgingRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    let settings = state.settings().await?;
    RejudgingService::finish(
        state.db(),
        &state.redis(),
        &settings,
        id,
        FinishAction::Apply,
        &payload.finished_by,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Cancel a rejudging: the original judgings stay valid
pub async fn cancel_rejudging(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<FinishRejudgingRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    let settings = state.settings().await?;
    RejudgingService::finish(
        state.db(),
        &state.redis(),
        &settings,
        id,
        FinishAction::Cancel,
        &payload.finished_by,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
