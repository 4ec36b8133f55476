//! PostgreSQL-backed container registry repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use scanboard_application::{NewRegistryRecord, RegistryRepository, RegistrySummary};
use scanboard_core::{AppError, AppResult};

/// PostgreSQL implementation of the registry repository port.
#[derive(Clone)]
pub struct PostgresRegistryRepository {
    pool: PgPool,
}

impl PostgresRegistryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistryRepository for PostgresRegistryRepository {
    async fn create_registry(&self, record: NewRegistryRecord) -> AppResult<RegistrySummary> {
        let result = sqlx::query_as::<_, RegistryRow>(
            r#"
            INSERT INTO container_registries (
                id,
                name,
                registry_type,
                non_secret,
                encrypted_secret
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, registry_type, non_secret, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.name.as_str())
        .bind(record.registry_type.as_str())
        .bind(&record.non_secret)
        .bind(record.encrypted_secret.as_slice())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "registry '{}' already exists",
                        record.name
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to create registry: {error}"
                )))
            }
        }
    }

    async fn list_registries(&self) -> AppResult<Vec<RegistrySummary>> {
        let rows = sqlx::query_as::<_, RegistryRow>(
            r#"
            SELECT id, name, registry_type, non_secret, created_at
            FROM container_registries
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list registries: {error}")))?;

        Ok(rows.into_iter().map(RegistrySummary::from).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RegistryRow {
    id: Uuid,
    name: String,
    registry_type: String,
    non_secret: Value,
    created_at: DateTime<Utc>,
}

impl From<RegistryRow> for RegistrySummary {
    fn from(row: RegistryRow) -> Self {
        Self {
            registry_id: row.id.to_string(),
            name: row.name,
            registry_type: row.registry_type,
            non_secret: row.non_secret,
            created_at: row.created_at,
        }
    }
}
