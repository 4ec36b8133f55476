use async_trait::async_trait;
use scanboard_application::SettingsRepository;
use scanboard_core::{AppError, AppResult};
use scanboard_domain::{Setting, SettingKey};
use tokio::sync::RwLock;

/// In-memory settings repository implementation.
#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<Vec<Setting>>,
}

impl InMemorySettingsRepository {
    /// Creates a repository holding the given rows.
    #[must_use]
    pub fn new(settings: Vec<Setting>) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Returns a snapshot of every stored row.
    pub async fn snapshot(&self) -> Vec<Setting> {
        self.settings.read().await.clone()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn list_visible_settings(&self) -> AppResult<Vec<Setting>> {
        let settings = self.settings.read().await;

        Ok(settings
            .iter()
            .filter(|setting| setting.is_visible_on_ui())
            .cloned()
            .collect())
    }

    async fn find_setting_by_key(&self, key: SettingKey) -> AppResult<Option<Setting>> {
        let settings = self.settings.read().await;

        Ok(settings.iter().find(|setting| setting.key() == key).cloned())
    }

    async fn update_setting(&self, setting: &Setting) -> AppResult<()> {
        let mut settings = self.settings.write().await;

        let stored = settings
            .iter_mut()
            .find(|stored| stored.id() == setting.id() && stored.key() == setting.key())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "setting {} with key '{}' does not exist",
                    setting.id(),
                    setting.key()
                ))
            })?;
        *stored = setting.clone();
        Ok(())
    }
}
