mod common;
mod registries;
mod scans;
mod settings;

pub use common::HealthResponse;
pub use registries::{AddGitlabRegistryRequest, RegistryResponse};
pub use scans::{
    ListingQueryResponse, ListingTransitionRequest, ScanActionResponse, ScanColumnResponse,
    ScanDownloadResponse, ScanPaginationResponse, ScanRowResponse, ScanTableResponse,
};
pub use settings::{SettingResponse, UpdateSettingRequest};
