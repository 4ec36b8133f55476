//! PostgreSQL-backed global settings using the `global_settings` table.
//!
//! `value` holds `{label, value, description}`; only the inner `value` is
//! typed by the setting key.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use scanboard_application::SettingsRepository;
use scanboard_core::{AppError, AppResult};
use scanboard_domain::{Setting, SettingKey, SettingValue};

/// PostgreSQL implementation of the settings repository port.
#[derive(Clone)]
pub struct PostgresSettingsRepository {
    pool: PgPool,
}

impl PostgresSettingsRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepository {
    async fn list_visible_settings(&self) -> AppResult<Vec<Setting>> {
        let rows = sqlx::query_as::<_, SettingRow>(
            r#"
            SELECT id, key, value, is_visible_on_ui
            FROM global_settings
            WHERE is_visible_on_ui
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list settings: {error}")))?;

        rows.into_iter().map(SettingRow::into_setting).collect()
    }

    async fn find_setting_by_key(&self, key: SettingKey) -> AppResult<Option<Setting>> {
        let row = sqlx::query_as::<_, SettingRow>(
            r#"
            SELECT id, key, value, is_visible_on_ui
            FROM global_settings
            WHERE key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find setting '{key}': {error}"))
        })?;

        row.map(SettingRow::into_setting).transpose()
    }

    async fn update_setting(&self, setting: &Setting) -> AppResult<()> {
        let document = StoredSettingValue {
            label: setting.label().as_str().to_owned(),
            value: setting.value().to_json(),
            description: setting.description().to_owned(),
        };

        let result = sqlx::query(
            r#"
            UPDATE global_settings
            SET value = $2, is_visible_on_ui = $3, updated_at = now()
            WHERE id = $1 AND key = $4
            "#,
        )
        .bind(setting.id())
        .bind(Json(document))
        .bind(setting.is_visible_on_ui())
        .bind(setting.key().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update setting '{}': {error}",
                setting.key()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "setting {} with key '{}' does not exist",
                setting.id(),
                setting.key()
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSettingValue {
    label: String,
    value: Value,
    #[serde(default)]
    description: String,
}

#[derive(Debug, sqlx::FromRow)]
struct SettingRow {
    id: i64,
    key: String,
    value: Json<StoredSettingValue>,
    is_visible_on_ui: bool,
}

impl SettingRow {
    fn into_setting(self) -> AppResult<Setting> {
        let key = SettingKey::from_str(self.key.as_str()).map_err(|_| {
            AppError::Internal(format!("stored setting has unknown key '{}'", self.key))
        })?;
        let Json(document) = self.value;
        let value = SettingValue::from_stored(key, &document.value)?;

        Setting::new(
            self.id,
            document.label,
            value,
            document.description,
            self.is_visible_on_ui,
        )
    }
}
