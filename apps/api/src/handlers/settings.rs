use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use scanboard_core::AppError;
use scanboard_domain::SettingKey;
use tracing::info;

use crate::dto::{SettingResponse, UpdateSettingRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_global_settings_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SettingResponse>>> {
    let settings = state
        .settings_service
        .list_visible_settings()
        .await?
        .into_iter()
        .map(SettingResponse::from)
        .collect();

    Ok(Json(settings))
}

pub async fn update_global_setting_handler(
    State(state): State<AppState>,
    Path(setting_id): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> ApiResult<StatusCode> {
    let setting_id = setting_id.trim().parse::<i64>().map_err(|_| {
        AppError::Validation(format!("setting id must be an integer, got '{setting_id}'"))
    })?;
    let key = SettingKey::from_str(payload.key.as_str())?;

    state
        .settings_service
        .update_setting(setting_id, key, &payload.value)
        .await?;

    info!(setting_id, %key, "global setting updated");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
