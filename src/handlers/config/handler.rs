//! Configuration handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    db::repositories::{AuditRepository, ConfigRepository},
    error::{AppError, AppResult},
    settings::{SettingValue, SCHEMA},
    state::AppState,
    utils::time::now_utc,
};

use super::{request::SetConfigRequest, response::ConfigResponse};

/// The effective judge configuration
pub async fn get_config(State(state): State<AppState>) -> AppResult<Json<ConfigResponse>> {
    let settings = state.settings().await?;
    Ok(Json(ConfigResponse::from(&settings)))
}

/// Set one configuration value; the value is validated against the
/// key's schema type before it is stored
pub async fn set_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<SetConfigRequest>,
) -> AppResult<StatusCode> {
    payload.validate()?;

    let ty = SCHEMA
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, ty)| *ty)
        .ok_or_else(|| AppError::NotFound(format!("Unknown configuration key '{}'", name)))?;

    let raw = payload.value.to_string();
    SettingValue::parse(&raw, ty)
        .map_err(|e| AppError::InvalidInput(format!("key '{}': {}", name, e)))?;

    ConfigRepository::set(state.db(), &name, &raw).await?;

    AuditRepository::log(
        state.db(),
        now_utc(),
        None,
        &payload.username,
        "configuration",
        &name,
        "update",
        Some(&raw),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
