//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod listing;
mod registry;
mod scan;
mod setting;

pub use listing::{
    FilterParam, ListingQuery, ListingTransition, ScanFilterSelection, ScanListingState,
};
pub use registry::{GITLAB_REGISTRY_TYPE, GitlabNonSecret, GitlabRegistry, GitlabSecret};
pub use scan::{
    NodeType, RawScanRow, ScanResultRow, ScanSort, ScanSortField, ScanStatus, ScanType,
    SeverityCounts, normalize_scan_row,
};
pub use setting::{Setting, SettingKey, SettingValue};
