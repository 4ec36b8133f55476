use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use scanboard_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_SCAN_PAGE_SIZE: u32 = 15;
const DEFAULT_SCAN_SERVICE_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the external scan service.
#[derive(Debug, Clone)]
pub struct ScanServiceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub scan_service: ScanServiceConfig,
    pub scan_page_size: u32,
    pub registry_encryption_key: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let timeout_secs = optional_env("SCAN_SERVICE_TIMEOUT_SECS")
            .map(|value| {
                value.parse::<u64>().map_err(|error| {
                    AppError::Validation(format!("invalid SCAN_SERVICE_TIMEOUT_SECS: {error}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_SCAN_SERVICE_TIMEOUT_SECS);

        let scan_service = ScanServiceConfig {
            base_url: required_non_empty_env("SCAN_SERVICE_BASE_URL")?,
            api_key: optional_env("SCAN_SERVICE_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        };

        let scan_page_size = optional_env("SCAN_PAGE_SIZE")
            .map(|value| {
                value.parse::<u32>().map_err(|error| {
                    AppError::Validation(format!("invalid SCAN_PAGE_SIZE: {error}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_SCAN_PAGE_SIZE);
        if scan_page_size == 0 {
            return Err(AppError::Validation(
                "SCAN_PAGE_SIZE must be greater than zero".to_owned(),
            ));
        }

        let registry_encryption_key = required_non_empty_env("REGISTRY_ENCRYPTION_KEY")?;

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            api_host,
            api_port,
            scan_service,
            scan_page_size,
            registry_encryption_key,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
