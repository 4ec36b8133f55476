use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use crate::dto::{AddGitlabRegistryRequest, RegistryResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_registries_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RegistryResponse>>> {
    let registries = state
        .registry_service
        .list_registries()
        .await?
        .into_iter()
        .map(RegistryResponse::from)
        .collect();

    Ok(Json(registries))
}

pub async fn add_gitlab_registry_handler(
    State(state): State<AppState>,
    Json(payload): Json<AddGitlabRegistryRequest>,
) -> ApiResult<(StatusCode, Json<RegistryResponse>)> {
    let registry = state
        .registry_service
        .add_gitlab_registry(payload.into())
        .await?;

    info!(
        registry_id = %registry.registry_id,
        name = %registry.name,
        "container registry added"
    );
    Ok((StatusCode::CREATED, Json(RegistryResponse::from(registry))))
}
