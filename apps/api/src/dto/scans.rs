use scanboard_application::{ScanActionOutcome, ScanDownload};
use scanboard_domain::{ListingTransition, ScanResultRow};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Column of the scan table.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scan-column-response.ts"
)]
pub struct ScanColumnResponse {
    pub id: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    pub size: u16,
    pub min_size: u16,
    pub max_size: u16,
    /// `asc` or `desc` when the table is ordered by this column.
    pub sort_direction: Option<&'static str>,
    /// Query string a click on the header navigates to.
    pub sort_query: Option<String>,
}

/// One scan row with its available actions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scan-row-response.ts"
)]
pub struct ScanRowResponse {
    pub scan_id: String,
    pub node_id: String,
    pub node_name: String,
    pub node_type: String,
    pub status: String,
    pub updated_at: String,
    #[ts(type = "number")]
    pub critical: u64,
    #[ts(type = "number")]
    pub high: u64,
    #[ts(type = "number")]
    pub medium: u64,
    #[ts(type = "number")]
    pub low: u64,
    #[ts(type = "number")]
    pub unknown: u64,
    #[ts(type = "number")]
    pub total: u64,
    pub actions: Vec<&'static str>,
}

impl ScanRowResponse {
    pub fn from_row(row: ScanResultRow, actions: Vec<&'static str>) -> Self {
        Self {
            scan_id: row.scan_id,
            node_id: row.node_id,
            node_name: row.node_name,
            node_type: row.node_type.as_str().to_owned(),
            status: row.status.as_str().to_owned(),
            updated_at: row.updated_at.to_rfc3339(),
            critical: row.severity.critical,
            high: row.severity.high,
            medium: row.severity.medium,
            low: row.severity.low,
            unknown: row.severity.unknown,
            total: row.total,
            actions,
        }
    }
}

/// Pagination state of the scan table.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scan-pagination-response.ts"
)]
pub struct ScanPaginationResponse {
    pub page: u32,
    pub page_size: u32,
    /// Lower-bound estimate of the total row count.
    #[ts(type = "number")]
    pub total_rows: u64,
    pub previous_query: Option<String>,
    pub next_query: Option<String>,
}

/// Scan table view model.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scan-table-response.ts"
)]
pub struct ScanTableResponse {
    pub scan_type: String,
    pub query: String,
    pub columns: Vec<ScanColumnResponse>,
    pub rows: Vec<ScanRowResponse>,
    pub pagination: ScanPaginationResponse,
}

/// Incoming payload for a listing state transition.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/listing-transition-request.ts"
)]
pub struct ListingTransitionRequest {
    #[serde(default)]
    pub query: String,
    #[ts(type = "Record<string, unknown>")]
    pub transition: ListingTransition,
}

/// Query string produced by a transition.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/listing-query-response.ts"
)]
pub struct ListingQueryResponse {
    pub query: String,
}

/// Result of a row delete action.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scan-action-response.ts"
)]
pub struct ScanActionResponse {
    pub success: bool,
    pub message: String,
}

impl From<ScanActionOutcome> for ScanActionResponse {
    fn from(outcome: ScanActionOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
        }
    }
}

/// Result of a row download action.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scan-download-response.ts"
)]
pub struct ScanDownloadResponse {
    pub file_name: String,
    pub download_url: Option<String>,
}

impl From<ScanDownload> for ScanDownloadResponse {
    fn from(download: ScanDownload) -> Self {
        Self {
            file_name: download.file_name,
            download_url: download.download_url,
        }
    }
}
