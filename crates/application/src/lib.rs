//! Application services and ports.

#![forbid(unsafe_code)]

mod registry_service;
mod scan_action_service;
mod scan_listing_service;
mod settings_service;

pub use registry_service::{
    AddGitlabRegistryInput, NewRegistryRecord, RegistryRepository, RegistryService,
    RegistrySummary, SecretEncryptor,
};
pub use scan_action_service::{
    SCAN_DELETE_FAILED_MESSAGE, SCAN_DELETED_MESSAGE, ScanActionClient, ScanActionOutcome,
    ScanActionService, ScanDeleteReply, ScanDownload,
};
pub use scan_listing_service::{
    COUNT_OVERSAMPLING_FACTOR, FieldsFilter, NodeFilter, OrderField, OrderFilter, Pagination,
    ScanListingService, ScanResultPage, ScanSearchClient, ScanSearchRequest, SearchWindow,
    estimate_total_rows,
};
pub use settings_service::{SettingsRepository, SettingsService};
