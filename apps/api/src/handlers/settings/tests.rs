use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use scanboard_core::{AppError, AppResult};
use scanboard_domain::{Setting, SettingKey, SettingValue};
use scanboard_infrastructure::InMemorySettingsRepository;
use serde_json::json;

use super::{list_global_settings_handler, update_global_setting_handler};
use crate::dto::UpdateSettingRequest;
use crate::handlers::test_support::{FakeScanService, build_state};
use crate::state::AppState;

fn seeded_repository() -> AppResult<Arc<InMemorySettingsRepository>> {
    seeded_repository_with_retention_visible(true)
}

fn seeded_repository_with_retention_visible(
    retention_visible: bool,
) -> AppResult<Arc<InMemorySettingsRepository>> {
    Ok(Arc::new(InMemorySettingsRepository::new(vec![
        Setting::new(
            1,
            "Console URL",
            SettingValue::ConsoleUrl("https://127.0.0.1".to_owned()),
            "Public console address",
            true,
        )?,
        Setting::new(
            2,
            "Inactive nodes retention",
            SettingValue::InactiveDeleteScanResults(0),
            "Days before scan results of inactive nodes are deleted",
            retention_visible,
        )?,
    ])))
}

fn state_for(repository: Arc<InMemorySettingsRepository>) -> AppResult<AppState> {
    build_state(repository, Arc::new(FakeScanService::default()))
}

fn update_request(key: &str, value: serde_json::Value) -> Json<UpdateSettingRequest> {
    Json(UpdateSettingRequest {
        key: key.to_owned(),
        value,
    })
}

#[tokio::test]
async fn lists_only_visible_settings() -> AppResult<()> {
    let state = state_for(seeded_repository()?)?;

    let response = list_global_settings_handler(State(state)).await;

    let Ok(Json(settings)) = response else {
        panic!("listing settings should succeed");
    };
    assert_eq!(settings.len(), 2);
    assert_eq!(settings[0].key, "console_url");
    assert_eq!(settings[1].value, json!(0));

    let hidden_state = state_for(seeded_repository_with_retention_visible(false)?)?;
    let Ok(Json(settings)) = list_global_settings_handler(State(hidden_state)).await else {
        panic!("listing settings should succeed");
    };
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[0].label, "Console URL");
    Ok(())
}

#[tokio::test]
async fn console_url_is_reduced_to_origin() -> AppResult<()> {
    let repository = seeded_repository()?;
    let state = state_for(repository.clone())?;

    let response = update_global_setting_handler(
        State(state),
        Path("1".to_owned()),
        update_request("console_url", json!("https://console.example.com:8443/path?q=1")),
    )
    .await;

    assert!(matches!(response, Ok(StatusCode::NO_CONTENT)));
    let stored = repository.snapshot().await;
    assert_eq!(
        stored
            .iter()
            .find(|setting| setting.key() == SettingKey::ConsoleUrl)
            .map(|setting| setting.value().clone()),
        Some(SettingValue::ConsoleUrl(
            "https://console.example.com:8443".to_owned()
        ))
    );
    Ok(())
}

#[tokio::test]
async fn retention_rounds_numbers_and_rejects_text() -> AppResult<()> {
    let repository = seeded_repository()?;
    let state = state_for(repository.clone())?;

    let rounded = update_global_setting_handler(
        State(state.clone()),
        Path("2".to_owned()),
        update_request("inactive_delete_scan_results", json!(6.6)),
    )
    .await;
    assert!(matches!(rounded, Ok(StatusCode::NO_CONTENT)));

    let rejected = update_global_setting_handler(
        State(state),
        Path("2".to_owned()),
        update_request("inactive_delete_scan_results", json!("seven")),
    )
    .await;
    assert!(matches!(
        rejected,
        Err(error) if matches!(&error.0, AppError::Validation(message) if message == "value must be integer")
    ));

    let stored = repository.snapshot().await;
    assert!(stored.iter().any(|setting| {
        setting.value() == &SettingValue::InactiveDeleteScanResults(7)
    }));
    Ok(())
}

#[tokio::test]
async fn malformed_ids_and_keys_are_rejected() -> AppResult<()> {
    let state = state_for(seeded_repository()?)?;

    let bad_id = update_global_setting_handler(
        State(state.clone()),
        Path("abc".to_owned()),
        update_request("console_url", json!("https://a.example")),
    )
    .await;
    assert!(matches!(bad_id, Err(error) if matches!(error.0, AppError::Validation(_))));

    let bad_key = update_global_setting_handler(
        State(state.clone()),
        Path("1".to_owned()),
        update_request("smtp_host", json!("mail")),
    )
    .await;
    assert!(matches!(bad_key, Err(error) if matches!(error.0, AppError::Validation(_))));

    let mismatched = update_global_setting_handler(
        State(state),
        Path("2".to_owned()),
        update_request("console_url", json!("https://a.example")),
    )
    .await;
    assert!(matches!(mismatched, Err(error) if matches!(error.0, AppError::Validation(_))));
    Ok(())
}
