use scanboard_application::{
    RegistryService, ScanActionService, ScanListingService, SettingsService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub settings_service: SettingsService,
    pub scan_listing_service: ScanListingService,
    pub scan_action_service: ScanActionService,
    pub registry_service: RegistryService,
    pub postgres_pool: PgPool,
}
