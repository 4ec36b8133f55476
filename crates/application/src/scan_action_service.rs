//! Row-level delete and download actions on scans.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use scanboard_core::{AppError, AppResult};
use scanboard_domain::ScanType;

/// Notification shown after a successful delete.
pub const SCAN_DELETED_MESSAGE: &str = "Scan deleted successfully";
/// Notification shown when the delete failed without a message.
pub const SCAN_DELETE_FAILED_MESSAGE: &str = "Failed to delete scan";

/// Answer of the scanning subsystem to a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDeleteReply {
    /// Scan and results removed.
    Deleted,
    /// Request refused, with the subsystem's message when it sent one.
    Rejected(Option<String>),
}

/// Port for scan actions owned by the scanning subsystem.
///
/// Refused requests are replies, not errors. Errors are reserved for
/// transport and server failures.
#[async_trait]
pub trait ScanActionClient: Send + Sync {
    /// Removes a scan and its results.
    async fn delete_scan(&self, scan_type: ScanType, scan_id: &str) -> AppResult<ScanDeleteReply>;

    /// Starts an out-of-band export of scan results.
    async fn export_scan(&self, scan_type: ScanType, scan_id: &str) -> AppResult<()>;
}

/// Result of a delete action, shown as a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanActionOutcome {
    /// Whether the action succeeded.
    pub success: bool,
    /// Notification text.
    pub message: String,
}

/// Client-side file reference produced by a download action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDownload {
    /// Suggested file name.
    pub file_name: String,
    /// Retrieval link of the exported content, when the export provides one.
    pub download_url: Option<String>,
}

/// Application service for scan row actions.
#[derive(Clone)]
pub struct ScanActionService {
    client: Arc<dyn ScanActionClient>,
}

impl ScanActionService {
    /// Creates a service from a client implementation.
    #[must_use]
    pub fn new(client: Arc<dyn ScanActionClient>) -> Self {
        Self { client }
    }

    /// Deletes a scan and reports the outcome as a notification.
    pub async fn delete_scan(&self, scan_type: ScanType, scan_id: &str) -> AppResult<ScanActionOutcome> {
        let scan_id = require_scan_id(scan_id)?;

        let message = match self.client.delete_scan(scan_type, scan_id).await {
            Ok(ScanDeleteReply::Deleted) => {
                return Ok(ScanActionOutcome {
                    success: true,
                    message: SCAN_DELETED_MESSAGE.to_owned(),
                });
            }
            Ok(ScanDeleteReply::Rejected(Some(message))) => message,
            Ok(ScanDeleteReply::Rejected(None)) => {
                warn!(%scan_type, scan_id, "scan delete rejected without a message");
                SCAN_DELETE_FAILED_MESSAGE.to_owned()
            }
            Err(error) => {
                warn!(%scan_type, scan_id, error = %error, "scan delete failed");
                SCAN_DELETE_FAILED_MESSAGE.to_owned()
            }
        };

        Ok(ScanActionOutcome {
            success: false,
            message,
        })
    }

    /// Starts an export and returns the file reference for it.
    pub async fn download_scan(
        &self,
        scan_type: ScanType,
        scan_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<ScanDownload> {
        let scan_id = require_scan_id(scan_id)?;
        self.client.export_scan(scan_type, scan_id).await?;

        // TODO: fill download_url once the export endpoint returns a retrieval link.
        Ok(ScanDownload {
            file_name: download_file_name(scan_type, now),
            download_url: None,
        })
    }
}

fn require_scan_id(scan_id: &str) -> AppResult<&str> {
    let scan_id = scan_id.trim();
    if scan_id.is_empty() {
        return Err(AppError::Validation("scan id must not be empty".to_owned()));
    }

    Ok(scan_id)
}

fn download_file_name(scan_type: ScanType, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}",
        scan_type.as_str(),
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
