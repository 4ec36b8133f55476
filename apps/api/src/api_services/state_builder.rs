use std::sync::Arc;

use scanboard_application::{
    RegistryService, ScanActionService, ScanListingService, SettingsService,
};
use scanboard_core::AppError;
use scanboard_infrastructure::{
    AesSecretEncryptor, HttpScanServiceClient, PostgresRegistryRepository,
    PostgresSettingsRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let scan_service_client = Arc::new(HttpScanServiceClient::new(
        config.scan_service.base_url.as_str(),
        config.scan_service.api_key.clone(),
        config.scan_service.timeout,
    )?);
    let secret_encryptor = Arc::new(AesSecretEncryptor::from_hex(
        config.registry_encryption_key.as_str(),
    )?);

    Ok(AppState {
        settings_service: SettingsService::new(Arc::new(PostgresSettingsRepository::new(
            pool.clone(),
        ))),
        scan_listing_service: ScanListingService::new(
            scan_service_client.clone(),
            config.scan_page_size,
        )?,
        scan_action_service: ScanActionService::new(scan_service_client),
        registry_service: RegistryService::new(
            Arc::new(PostgresRegistryRepository::new(pool.clone())),
            secret_encryptor,
        ),
        postgres_pool: pool,
    })
}
