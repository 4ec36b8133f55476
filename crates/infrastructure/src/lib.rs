//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod aes_secret_encryptor;
mod http_scan_service_client;
mod in_memory_settings_repository;
mod postgres_registry_repository;
mod postgres_settings_repository;

pub use aes_secret_encryptor::AesSecretEncryptor;
pub use http_scan_service_client::HttpScanServiceClient;
pub use in_memory_settings_repository::InMemorySettingsRepository;
pub use postgres_registry_repository::PostgresRegistryRepository;
pub use postgres_settings_repository::PostgresSettingsRepository;
