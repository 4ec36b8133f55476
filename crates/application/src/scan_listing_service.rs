//! Scan listing: search request assembly, page and count calls, normalization.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use scanboard_core::{AppError, AppResult};
use scanboard_domain::{
    NodeType, RawScanRow, ScanFilterSelection, ScanListingState, ScanResultRow, ScanSort,
    ScanType, normalize_scan_row,
};

/// Window multiplier of the count request.
pub const COUNT_OVERSAMPLING_FACTOR: u64 = 10;

const STATUS_FIELD: &str = "status";
const TRIGGER_ACTION_FIELD: &str = "trigger_action";

/// Port for the external scan search service.
#[async_trait]
pub trait ScanSearchClient: Send + Sync {
    /// Returns the rows inside the request window.
    async fn search_scans(
        &self,
        scan_type: ScanType,
        request: &ScanSearchRequest,
    ) -> AppResult<Vec<RawScanRow>>;

    /// Returns how many rows fall inside the request window.
    async fn count_scans(&self, scan_type: ScanType, request: &ScanSearchRequest)
    -> AppResult<u64>;
}

/// Node-level filters. Identifier facets are merged and lose their origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeFilter {
    /// Union of host, container, image and language identifiers.
    pub node_ids: BTreeSet<String>,
    /// Cluster identifiers.
    pub cluster_ids: BTreeSet<String>,
    /// Node types.
    pub node_types: BTreeSet<NodeType>,
}

/// One ordered field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderField {
    /// Field name.
    pub field_name: String,
    /// Whether the order is descending.
    pub descending: bool,
}

/// Order clause; holds a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderFilter {
    /// Ordered fields.
    pub order_fields: Vec<OrderField>,
}

/// Field-level filters on scan documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldsFilter {
    /// Exact membership filters.
    pub contains_filter: BTreeMap<String, Vec<String>>,
    /// Free-text match filters.
    pub match_filter: BTreeMap<String, Vec<String>>,
    /// Ordering; absent means the service default order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_filter: Option<OrderFilter>,
}

/// Result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchWindow {
    /// First row.
    pub offset: u64,
    /// Row count.
    pub size: u64,
}

/// Page position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
}

/// Structured request sent to the scan search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSearchRequest {
    /// Node filters.
    pub node_filter: NodeFilter,
    /// Field filters and ordering.
    pub fields_filter: FieldsFilter,
    /// Result window.
    pub window: SearchWindow,
}

impl ScanSearchRequest {
    /// Builds the page request for a filter selection.
    #[must_use]
    pub fn build(
        filters: &ScanFilterSelection,
        pagination: Pagination,
        sort: Option<ScanSort>,
    ) -> Self {
        let node_ids = filters
            .hosts
            .iter()
            .chain(&filters.containers)
            .chain(&filters.container_images)
            .chain(&filters.languages)
            .cloned()
            .collect();

        let mut contains_filter = BTreeMap::new();
        if !filters.status.is_empty() {
            let statuses: BTreeSet<String> = filters
                .status
                .iter()
                .map(|status| status.to_uppercase())
                .collect();
            contains_filter.insert(STATUS_FIELD.to_owned(), statuses.into_iter().collect());
        }

        let mut match_filter = BTreeMap::new();
        if !filters.languages.is_empty() {
            match_filter.insert(
                TRIGGER_ACTION_FIELD.to_owned(),
                filters.languages.iter().cloned().collect(),
            );
        }

        let order_filter = sort.map(|sort| OrderFilter {
            order_fields: vec![OrderField {
                field_name: sort.field.as_str().to_owned(),
                descending: sort.descending,
            }],
        });

        let page_size = u64::from(pagination.page_size);
        Self {
            node_filter: NodeFilter {
                node_ids,
                cluster_ids: filters.clusters.clone(),
                node_types: filters.node_types.clone(),
            },
            fields_filter: FieldsFilter {
                contains_filter,
                match_filter,
                order_filter,
            },
            window: SearchWindow {
                offset: u64::from(pagination.page) * page_size,
                size: page_size,
            },
        }
    }

    /// Copy with the window enlarged for the count call.
    #[must_use]
    pub fn oversampled_for_count(&self) -> Self {
        Self {
            window: SearchWindow {
                offset: self.window.offset,
                size: self.window.size.saturating_mul(COUNT_OVERSAMPLING_FACTOR),
            },
            ..self.clone()
        }
    }
}

/// Approximates the total row count from an oversampled count.
///
/// Only rows up to `page*page_size + page_size*COUNT_OVERSAMPLING_FACTOR`
/// are ever seen, so this is a lower bound rather than the true total.
#[must_use]
pub fn estimate_total_rows(page: u32, page_size: u32, oversampled_count: u64) -> u64 {
    (u64::from(page) * u64::from(page_size)).saturating_add(oversampled_count)
}

/// One page of normalized rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResultPage {
    /// Rows of the current page.
    pub rows: Vec<ScanResultRow>,
    /// Estimated total, see [`estimate_total_rows`].
    pub total_rows: u64,
    /// Zero-based page index.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
}

/// Application service for the scan listing.
#[derive(Clone)]
pub struct ScanListingService {
    client: Arc<dyn ScanSearchClient>,
    page_size: u32,
}

impl ScanListingService {
    /// Creates a service with a fixed page size.
    pub fn new(client: Arc<dyn ScanSearchClient>, page_size: u32) -> AppResult<Self> {
        if page_size == 0 {
            return Err(AppError::Validation(
                "scan page size must be greater than zero".to_owned(),
            ));
        }

        Ok(Self { client, page_size })
    }

    /// Returns the configured page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Loads one page and its estimated total for a listing state.
    pub async fn list_scans(
        &self,
        scan_type: ScanType,
        state: &ScanListingState,
    ) -> AppResult<ScanResultPage> {
        let pagination = Pagination {
            page: state.page,
            page_size: self.page_size,
        };
        let page_request = ScanSearchRequest::build(&state.filters, pagination, state.sort);
        let count_request = page_request.oversampled_for_count();

        let (raw_rows, oversampled_count) = tokio::try_join!(
            self.client.search_scans(scan_type, &page_request),
            self.client.count_scans(scan_type, &count_request),
        )?;

        Ok(ScanResultPage {
            rows: raw_rows.into_iter().map(normalize_scan_row).collect(),
            total_rows: estimate_total_rows(state.page, self.page_size, oversampled_count),
            page: state.page,
            page_size: self.page_size,
        })
    }
}
