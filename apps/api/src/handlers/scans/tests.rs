use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, RawQuery, State};
use scanboard_application::SCAN_DELETE_FAILED_MESSAGE;
use scanboard_core::AppError;
use scanboard_domain::{FilterParam, ListingTransition, ScanType};
use scanboard_infrastructure::InMemorySettingsRepository;

use super::{
    apply_listing_transition_handler, delete_scan_handler, download_scan_handler,
    list_scans_handler,
};
use crate::dto::ListingTransitionRequest;
use crate::handlers::test_support::{FakeScanService, build_state, raw_row};
use crate::state::AppState;

fn state_with(scan_service: Arc<FakeScanService>) -> AppState {
    match build_state(Arc::new(InMemorySettingsRepository::default()), scan_service) {
        Ok(state) => state,
        Err(error) => panic!("test state should build: {error}"),
    }
}

#[tokio::test]
async fn listing_builds_table_from_query_state() {
    let scan_service = Arc::new(FakeScanService {
        rows: vec![raw_row("s1", Some(2)), raw_row("s2", None)],
        count: 40,
        ..FakeScanService::default()
    });
    let state = state_with(scan_service.clone());

    let response = list_scans_handler(
        State(state),
        Path("secret".to_owned()),
        RawQuery(Some("status=complete&page=2&sortby=critical&desc=true".to_owned())),
    )
    .await;

    let Ok(Json(table)) = response else {
        panic!("listing should succeed");
    };
    assert_eq!(table.scan_type, "secret");
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].node_name, "host-s1");
    assert_eq!(table.rows[0].total, 3);
    assert_eq!(table.rows[1].total, 1);
    assert_eq!(table.pagination.page, 2);
    assert_eq!(table.pagination.total_rows, 70);

    let requests = scan_service.search_requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].window.offset, 30);
    assert_eq!(requests[0].window.size, 15);
}

#[tokio::test]
async fn listing_rejects_unknown_scan_type_and_bad_page() {
    let state = state_with(Arc::new(FakeScanService::default()));

    let unknown_type = list_scans_handler(
        State(state.clone()),
        Path("posture".to_owned()),
        RawQuery(None),
    )
    .await;
    assert!(matches!(unknown_type, Err(error) if matches!(error.0, AppError::Validation(_))));

    let bad_page = list_scans_handler(
        State(state),
        Path("secret".to_owned()),
        RawQuery(Some("page=-1".to_owned())),
    )
    .await;
    assert!(matches!(bad_page, Err(error) if matches!(error.0, AppError::Validation(_))));
}

#[tokio::test]
async fn transition_returns_next_query() {
    let response = apply_listing_transition_handler(
        Path("malware".to_owned()),
        Json(ListingTransitionRequest {
            query: "hosts=h1&page=3".to_owned(),
            transition: ListingTransition::Toggle {
                param: FilterParam::Hosts,
                value: "h2".to_owned(),
            },
        }),
    )
    .await;

    assert!(matches!(response, Ok(Json(body)) if body.query == "hosts=h1&hosts=h2"));
}

#[tokio::test]
async fn transition_to_invalid_node_type_is_rejected() {
    let response = apply_listing_transition_handler(
        Path("malware".to_owned()),
        Json(ListingTransitionRequest {
            query: String::new(),
            transition: ListingTransition::Append {
                param: FilterParam::NodeType,
                value: "lambda".to_owned(),
            },
        }),
    )
    .await;

    assert!(matches!(response, Err(error) if matches!(error.0, AppError::Validation(_))));
}

#[tokio::test]
async fn delete_reports_success_and_calls_service() {
    let scan_service = Arc::new(FakeScanService::default());
    let state = state_with(scan_service.clone());

    let response = delete_scan_handler(
        State(state),
        Path(("vulnerability".to_owned(), "scan-7".to_owned())),
    )
    .await;

    assert!(matches!(response, Ok(Json(body)) if body.success));
    assert_eq!(
        scan_service.deleted.lock().await.as_slice(),
        &[(ScanType::Vulnerability, "scan-7".to_owned())]
    );
}

#[tokio::test]
async fn delete_failure_is_reported_in_body() {
    let scan_service = Arc::new(FakeScanService {
        delete_failure: Some("connection reset".to_owned()),
        ..FakeScanService::default()
    });
    let state = state_with(scan_service);

    let response = delete_scan_handler(
        State(state),
        Path(("secret".to_owned(), "scan-7".to_owned())),
    )
    .await;

    assert!(matches!(
        response,
        Ok(Json(body)) if !body.success && body.message == SCAN_DELETE_FAILED_MESSAGE
    ));
}

#[tokio::test]
async fn download_returns_file_reference() {
    let scan_service = Arc::new(FakeScanService::default());
    let state = state_with(scan_service.clone());

    let response = download_scan_handler(
        State(state),
        Path(("compliance".to_owned(), "scan-2".to_owned())),
    )
    .await;

    assert!(matches!(
        response,
        Ok(Json(body)) if body.file_name.starts_with("compliance_") && body.download_url.is_none()
    ));
    assert_eq!(scan_service.exported.lock().await.len(), 1);
}
