use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use scanboard_application::{
    ScanActionClient, ScanDeleteReply, ScanSearchClient, ScanSearchRequest,
};
use scanboard_core::{AppError, AppResult};
use scanboard_domain::{RawScanRow, ScanType};

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the external scan search and action service.
#[derive(Clone)]
pub struct HttpScanServiceClient {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpScanServiceClient {
    /// Creates a client with a request timeout.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build scan service client: {error}"))
            })?;

        Self::with_client(http_client, base_url, api_key)
    }

    /// Creates a client around an existing `reqwest` client.
    pub fn with_client(
        http_client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> AppResult<Self> {
        let parsed = Url::parse(base_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid scan service url '{base_url}': {error}"))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "scan service url '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            http_client,
            base_url: parsed,
            api_key: api_key.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Appends each segment percent-encoded, so ids never change the path shape.
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("scan service url cannot carry a path".to_owned()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn post(&self, segments: &[&str]) -> AppResult<reqwest::RequestBuilder> {
        let builder = self.http_client.post(self.endpoint(segments)?);
        Ok(match &self.api_key {
            Some(api_key) => builder.header(API_KEY_HEADER, api_key),
            None => builder,
        })
    }

    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<reqwest::Response> {
        request.send().await.map_err(|error| {
            AppError::Internal(format!("scan service {operation} request failed: {error}"))
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder, operation: &str) -> AppResult<reqwest::Response> {
        let response = self.dispatch(request, operation).await?;
        if response.status().is_success() {
            return Ok(response);
        }

        Err(rejection_error(response, operation).await)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        self.send(request, operation)
            .await?
            .json::<T>()
            .await
            .map_err(|error| {
                AppError::Internal(format!("invalid scan service {operation} response: {error}"))
            })
    }
}

/// Maps a non-success response. Client errors become validation errors,
/// carrying the remote `{message}` when there is one.
async fn rejection_error(response: reqwest::Response, operation: &str) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.is_client_error() {
        return AppError::Validation(remote_message(body.as_str()).unwrap_or_else(|| {
            format!("scan service rejected {operation} request with status {status}")
        }));
    }

    AppError::Internal(format!(
        "scan service {operation} request failed with status {status}: {}",
        body.trim()
    ))
}

fn remote_message(body: &str) -> Option<String> {
    serde_json::from_str::<RemoteErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
}

/// Dot segments would be dropped from the URL instead of encoded.
fn scan_id_segment(scan_id: &str) -> AppResult<&str> {
    if matches!(scan_id, "." | "..") {
        return Err(AppError::Validation(format!("invalid scan id '{scan_id}'")));
    }

    Ok(scan_id)
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Serialize)]
struct DeleteScansRequest<'a> {
    scan_ids: [&'a str; 1],
    scan_type: ScanType,
}

#[async_trait]
impl ScanSearchClient for HttpScanServiceClient {
    async fn search_scans(
        &self,
        scan_type: ScanType,
        request: &ScanSearchRequest,
    ) -> AppResult<Vec<RawScanRow>> {
        debug!(
            %scan_type,
            offset = request.window.offset,
            size = request.window.size,
            "searching scans"
        );
        let builder = self.post(&["search", "scans", scan_type.as_str()])?;
        self.send_json(builder.json(request), "search").await
    }

    async fn count_scans(
        &self,
        scan_type: ScanType,
        request: &ScanSearchRequest,
    ) -> AppResult<u64> {
        let builder = self.post(&["search", "count", "scans", scan_type.as_str()])?;
        let response: CountResponse = self.send_json(builder.json(request), "count").await?;

        Ok(response.count)
    }
}

#[async_trait]
impl ScanActionClient for HttpScanServiceClient {
    async fn delete_scan(&self, scan_type: ScanType, scan_id: &str) -> AppResult<ScanDeleteReply> {
        let body = DeleteScansRequest {
            scan_ids: [scan_id],
            scan_type,
        };
        let builder = self.post(&["scan", "results", "action", "delete"])?;
        let response = self.dispatch(builder.json(&body), "delete").await?;

        let status = response.status();
        if status.is_success() {
            return Ok(ScanDeleteReply::Deleted);
        }
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Ok(ScanDeleteReply::Rejected(remote_message(body.as_str())));
        }

        Err(rejection_error(response, "delete").await)
    }

    async fn export_scan(&self, scan_type: ScanType, scan_id: &str) -> AppResult<()> {
        let scan_id = scan_id_segment(scan_id)?;
        let builder = self.post(&["scan", scan_type.as_str(), scan_id, "export"])?;
        self.send(builder, "export").await?;

        Ok(())
    }
}
