//! Global settings ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use scanboard_core::{AppError, AppResult};
use scanboard_domain::{Setting, SettingKey};

/// Repository port for global settings rows.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Lists settings flagged as visible in the console.
    async fn list_visible_settings(&self) -> AppResult<Vec<Setting>>;

    /// Finds the row stored under a key.
    async fn find_setting_by_key(&self, key: SettingKey) -> AppResult<Option<Setting>>;

    /// Persists the value of an existing row.
    async fn update_setting(&self, setting: &Setting) -> AppResult<()>;
}

/// Application service for global settings.
#[derive(Clone)]
pub struct SettingsService {
    repository: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn SettingsRepository>) -> Self {
        Self { repository }
    }

    /// Returns settings visible in the console.
    pub async fn list_visible_settings(&self) -> AppResult<Vec<Setting>> {
        self.repository.list_visible_settings().await
    }

    /// Validates and stores a new value for the row `id`.
    ///
    /// The row stored under `key` must be the row `id`; otherwise nothing is
    /// written. The raw value is parsed with the key's rule.
    pub async fn update_setting(&self, id: i64, key: SettingKey, raw_value: &Value) -> AppResult<()> {
        let current = self
            .repository
            .find_setting_by_key(key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("setting '{key}' does not exist")))?;

        if current.id() != id {
            return Err(AppError::Validation(format!(
                "setting id {id} does not match key '{key}'"
            )));
        }

        let value = key.parse_value(raw_value)?;
        let updated = current.with_value(value)?;
        self.repository.update_setting(&updated).await
    }
}
