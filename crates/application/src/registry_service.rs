//! Container registry credential ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use scanboard_core::{AppError, AppResult};
use scanboard_domain::{GitlabNonSecret, GitlabRegistry, GitlabSecret};

/// Port for encrypting registry secrets at rest.
pub trait SecretEncryptor: Send + Sync {
    /// Encrypts a secret for database storage.
    fn encrypt(&self, plaintext: &[u8]) -> AppResult<Vec<u8>>;
}

/// Registry row ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistryRecord {
    /// Unique registry name.
    pub name: String,
    /// Registry type tag.
    pub registry_type: String,
    /// Non-secret settings as JSON.
    pub non_secret: Value,
    /// Encrypted secret settings.
    pub encrypted_secret: Vec<u8>,
}

/// Registry as listed to clients. Never carries secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySummary {
    /// Registry identifier.
    pub registry_id: String,
    /// Unique registry name.
    pub name: String,
    /// Registry type tag.
    pub registry_type: String,
    /// Non-secret settings as JSON.
    pub non_secret: Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Repository port for registry persistence.
#[async_trait]
pub trait RegistryRepository: Send + Sync {
    /// Stores a registry. Fails with [`AppError::Conflict`] on a duplicate name.
    async fn create_registry(&self, record: NewRegistryRecord) -> AppResult<RegistrySummary>;

    /// Lists all registries ordered by name.
    async fn list_registries(&self) -> AppResult<Vec<RegistrySummary>>;
}

/// Input for adding a GitLab registry.
#[derive(Debug, Clone)]
pub struct AddGitlabRegistryInput {
    /// Registry name.
    pub name: String,
    /// Registry type tag.
    pub registry_type: String,
    /// Non-secret settings.
    pub non_secret: GitlabNonSecret,
    /// Secret settings.
    pub secret: GitlabSecret,
}

/// Application service for container registries.
#[derive(Clone)]
pub struct RegistryService {
    repository: Arc<dyn RegistryRepository>,
    encryptor: Arc<dyn SecretEncryptor>,
}

impl RegistryService {
    /// Creates a service from repository and encryptor implementations.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RegistryRepository>,
        encryptor: Arc<dyn SecretEncryptor>,
    ) -> Self {
        Self {
            repository,
            encryptor,
        }
    }

    /// Validates, encrypts and stores GitLab registry credentials.
    pub async fn add_gitlab_registry(
        &self,
        input: AddGitlabRegistryInput,
    ) -> AppResult<RegistrySummary> {
        let registry = GitlabRegistry::new(
            input.name,
            input.registry_type.as_str(),
            input.non_secret,
            input.secret,
        )?;

        let non_secret = serde_json::to_value(registry.non_secret()).map_err(|error| {
            AppError::Internal(format!("failed to serialize registry settings: {error}"))
        })?;
        let secret = serde_json::to_vec(registry.secret()).map_err(|error| {
            AppError::Internal(format!("failed to serialize registry secret: {error}"))
        })?;

        self.repository
            .create_registry(NewRegistryRecord {
                name: registry.name().to_owned(),
                registry_type: registry.registry_type().to_owned(),
                non_secret,
                encrypted_secret: self.encryptor.encrypt(&secret)?,
            })
            .await
    }

    /// Lists registries without secrets.
    pub async fn list_registries(&self) -> AppResult<Vec<RegistrySummary>> {
        self.repository.list_registries().await
    }
}
