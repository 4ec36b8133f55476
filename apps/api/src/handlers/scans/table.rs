//! Scan table view model: columns, rows with actions, and the query strings
//! behind header clicks and page navigation.

use scanboard_application::ScanResultPage;
use scanboard_domain::{ListingQuery, ScanListingState, ScanSortField, ScanType};

use crate::dto::{ScanColumnResponse, ScanPaginationResponse, ScanRowResponse, ScanTableResponse};

const DELETE_ACTION: &str = "delete";
const DOWNLOAD_ACTION: &str = "download";

struct ColumnSpec {
    id: &'static str,
    header: &'static str,
    sort_field: Option<ScanSortField>,
    size: u16,
    min_size: u16,
    max_size: u16,
}

const fn sortable(
    field: ScanSortField,
    id: &'static str,
    header: &'static str,
    size: u16,
    min_size: u16,
    max_size: u16,
) -> ColumnSpec {
    ColumnSpec {
        id,
        header,
        sort_field: Some(field),
        size,
        min_size,
        max_size,
    }
}

const COLUMNS: [ColumnSpec; 11] = [
    sortable(ScanSortField::NodeName, "node_name", "Name", 240, 120, 480),
    sortable(ScanSortField::NodeType, "node_type", "Type", 120, 80, 200),
    sortable(ScanSortField::UpdatedAt, "updated_at", "Timestamp", 180, 140, 260),
    sortable(ScanSortField::Status, "status", "Status", 140, 100, 220),
    sortable(ScanSortField::Total, "total", "Total", 80, 60, 140),
    sortable(ScanSortField::Critical, "critical", "Critical", 80, 60, 140),
    sortable(ScanSortField::High, "high", "High", 80, 60, 140),
    sortable(ScanSortField::Medium, "medium", "Medium", 80, 60, 140),
    sortable(ScanSortField::Low, "low", "Low", 80, 60, 140),
    sortable(ScanSortField::Unknown, "unknown", "Unknown", 80, 60, 140),
    ColumnSpec {
        id: "actions",
        header: "",
        sort_field: None,
        size: 60,
        min_size: 60,
        max_size: 60,
    },
];

pub(super) fn build_scan_table(
    scan_type: ScanType,
    query: &ListingQuery,
    state: &ScanListingState,
    page: ScanResultPage,
) -> ScanTableResponse {
    let columns = COLUMNS
        .iter()
        .map(|column| column_response(column, query, state))
        .collect();

    let pagination = pagination_response(query, &page);
    let rows = page
        .rows
        .into_iter()
        .map(|row| ScanRowResponse::from_row(row, vec![DELETE_ACTION, DOWNLOAD_ACTION]))
        .collect();

    ScanTableResponse {
        scan_type: scan_type.as_str().to_owned(),
        query: query.to_query_string(),
        columns,
        rows,
        pagination,
    }
}

fn column_response(
    column: &ColumnSpec,
    query: &ListingQuery,
    state: &ScanListingState,
) -> ScanColumnResponse {
    let sort_direction = column.sort_field.and_then(|field| {
        state
            .sort
            .filter(|sort| sort.field == field)
            .map(|sort| if sort.descending { "desc" } else { "asc" })
    });
    let sort_query = column
        .sort_field
        .map(|field| query.apply(&state.header_click(field)).to_query_string());

    ScanColumnResponse {
        id: column.id,
        header: column.header,
        sortable: column.sort_field.is_some(),
        size: column.size,
        min_size: column.min_size,
        max_size: column.max_size,
        sort_direction,
        sort_query,
    }
}

fn pagination_response(query: &ListingQuery, page: &ScanResultPage) -> ScanPaginationResponse {
    let previous_query = page
        .page
        .checked_sub(1)
        .map(|previous| query.with_page(previous).to_query_string());

    let next_page = page.page.saturating_add(1);
    let next_offset = u64::from(next_page) * u64::from(page.page_size);
    let next_query =
        (next_offset < page.total_rows).then(|| query.with_page(next_page).to_query_string());

    ScanPaginationResponse {
        page: page.page,
        page_size: page.page_size,
        total_rows: page.total_rows,
        previous_query,
        next_query,
    }
}
