use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, RawQuery, State};
use chrono::Utc;
use scanboard_domain::{ListingQuery, ScanListingState, ScanType};
use tracing::{debug, info};

use crate::dto::{
    ListingQueryResponse, ListingTransitionRequest, ScanActionResponse, ScanDownloadResponse,
    ScanTableResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod table;

pub async fn list_scans_handler(
    State(state): State<AppState>,
    Path(scan_type): Path<String>,
    RawQuery(raw_query): RawQuery,
) -> ApiResult<Json<ScanTableResponse>> {
    let scan_type = ScanType::from_str(scan_type.as_str())?;
    let query = ListingQuery::parse(raw_query.as_deref().unwrap_or_default());
    let listing_state = ScanListingState::from_query(&query)?;

    let page = state
        .scan_listing_service
        .list_scans(scan_type, &listing_state)
        .await?;
    debug!(
        %scan_type,
        page = page.page,
        rows = page.rows.len(),
        total_rows = page.total_rows,
        "scan page loaded"
    );

    Ok(Json(table::build_scan_table(
        scan_type,
        &query,
        &listing_state,
        page,
    )))
}

pub async fn apply_listing_transition_handler(
    Path(scan_type): Path<String>,
    Json(payload): Json<ListingTransitionRequest>,
) -> ApiResult<Json<ListingQueryResponse>> {
    ScanType::from_str(scan_type.as_str())?;

    let next = ListingQuery::parse(payload.query.as_str()).apply(&payload.transition);
    ScanListingState::from_query(&next)?;

    Ok(Json(ListingQueryResponse {
        query: next.to_query_string(),
    }))
}

pub async fn delete_scan_handler(
    State(state): State<AppState>,
    Path((scan_type, scan_id)): Path<(String, String)>,
) -> ApiResult<Json<ScanActionResponse>> {
    let scan_type = ScanType::from_str(scan_type.as_str())?;
    let outcome = state
        .scan_action_service
        .delete_scan(scan_type, scan_id.as_str())
        .await?;

    info!(%scan_type, scan_id = %scan_id, success = outcome.success, "scan delete requested");
    Ok(Json(ScanActionResponse::from(outcome)))
}

pub async fn download_scan_handler(
    State(state): State<AppState>,
    Path((scan_type, scan_id)): Path<(String, String)>,
) -> ApiResult<Json<ScanDownloadResponse>> {
    let scan_type = ScanType::from_str(scan_type.as_str())?;
    let download = state
        .scan_action_service
        .download_scan(scan_type, scan_id.as_str(), Utc::now())
        .await?;

    info!(%scan_type, scan_id = %scan_id, file_name = %download.file_name, "scan export started");
    Ok(Json(ScanDownloadResponse::from(download)))
}

#[cfg(test)]
mod tests;
