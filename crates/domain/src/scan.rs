use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use scanboard_core::{AppError, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Scan family; selects the search index and tags row actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    /// Vulnerability scan.
    Vulnerability,
    /// Secret scan.
    Secret,
    /// Malware scan.
    Malware,
    /// Posture scan of a host or cluster.
    Compliance,
    /// Posture scan of a cloud account.
    CloudCompliance,
}

impl ScanType {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vulnerability => "vulnerability",
            Self::Secret => "secret",
            Self::Malware => "malware",
            Self::Compliance => "compliance",
            Self::CloudCompliance => "cloud_compliance",
        }
    }
}

impl Display for ScanType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ScanType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "vulnerability" => Ok(Self::Vulnerability),
            "secret" => Ok(Self::Secret),
            "malware" => Ok(Self::Malware),
            "compliance" => Ok(Self::Compliance),
            "cloud_compliance" => Ok(Self::CloudCompliance),
            _ => Err(AppError::Validation(format!("unknown scan type '{value}'"))),
        }
    }
}

/// Lifecycle status reported by the scanning subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    /// Scan accepted but not yet running.
    Starting,
    /// Scan running.
    InProgress,
    /// Scan finished successfully.
    Complete,
    /// Scan failed.
    Error,
    /// Cancellation requested.
    CancelPending,
    /// Cancellation in progress.
    Cancelling,
    /// Scan cancelled.
    Cancelled,
    /// Deletion requested.
    DeletePending,
}

impl ScanStatus {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "STARTING",
            Self::InProgress => "IN_PROGRESS",
            Self::Complete => "COMPLETE",
            Self::Error => "ERROR",
            Self::CancelPending => "CANCEL_PENDING",
            Self::Cancelling => "CANCELLING",
            Self::Cancelled => "CANCELLED",
            Self::DeletePending => "DELETE_PENDING",
        }
    }
}

/// Category of scanned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Host or virtual machine.
    Host,
    /// Running container.
    Container,
    /// Container image.
    ContainerImage,
}

impl NodeType {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Container => "container",
            Self::ContainerImage => "container_image",
        }
    }
}

impl FromStr for NodeType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "host" => Ok(Self::Host),
            "container" => Ok(Self::Container),
            "container_image" => Ok(Self::ContainerImage),
            _ => Err(AppError::Validation(format!("unknown node type '{value}'"))),
        }
    }
}

/// Columns the listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSortField {
    /// Node display name.
    NodeName,
    /// Node type.
    NodeType,
    /// Scan status.
    Status,
    /// Last update time.
    UpdatedAt,
    /// Total of the four counted severity tiers.
    Total,
    /// Critical count.
    Critical,
    /// High count.
    High,
    /// Medium count.
    Medium,
    /// Low count.
    Low,
    /// Unknown count.
    Unknown,
}

impl ScanSortField {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NodeName => "node_name",
            Self::NodeType => "node_type",
            Self::Status => "status",
            Self::UpdatedAt => "updated_at",
            Self::Total => "total",
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for ScanSortField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "node_name" => Ok(Self::NodeName),
            "node_type" => Ok(Self::NodeType),
            "status" => Ok(Self::Status),
            "updated_at" => Ok(Self::UpdatedAt),
            "total" => Ok(Self::Total),
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "unknown" => Ok(Self::Unknown),
            _ => Err(AppError::Validation(format!("unknown sort field '{value}'"))),
        }
    }
}

/// Single-field ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSort {
    /// Ordered column.
    pub field: ScanSortField,
    /// Whether the order is descending.
    pub descending: bool,
}

/// Row as returned by the scan search service. Severity counts may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawScanRow {
    /// Scan identifier.
    pub scan_id: String,
    /// Scanned node identifier.
    pub node_id: String,
    /// Scanned node display name.
    #[serde(default)]
    pub node_name: String,
    /// Scanned node type.
    pub node_type: NodeType,
    /// Scan status.
    pub status: ScanStatus,
    /// Last update in epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    /// Critical count.
    #[serde(default)]
    pub critical: Option<u64>,
    /// High count.
    #[serde(default)]
    pub high: Option<u64>,
    /// Medium count.
    #[serde(default)]
    pub medium: Option<u64>,
    /// Low count.
    #[serde(default)]
    pub low: Option<u64>,
    /// Unknown count.
    #[serde(default)]
    pub unknown: Option<u64>,
}

/// Zero-defaulted severity breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Critical count.
    pub critical: u64,
    /// High count.
    pub high: u64,
    /// Medium count.
    pub medium: u64,
    /// Low count.
    pub low: u64,
    /// Unknown count; never part of the total.
    pub unknown: u64,
}

impl SeverityCounts {
    /// Builds counts treating every missing tier as zero.
    #[must_use]
    pub fn from_optional(
        critical: Option<u64>,
        high: Option<u64>,
        medium: Option<u64>,
        low: Option<u64>,
        unknown: Option<u64>,
    ) -> Self {
        Self {
            critical: critical.unwrap_or_default(),
            high: high.unwrap_or_default(),
            medium: medium.unwrap_or_default(),
            low: low.unwrap_or_default(),
            unknown: unknown.unwrap_or_default(),
        }
    }

    /// Sum of critical, high, medium and low. Unknown is excluded.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.critical
            .saturating_add(self.high)
            .saturating_add(self.medium)
            .saturating_add(self.low)
    }
}

/// Normalized listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResultRow {
    /// Scan identifier.
    pub scan_id: String,
    /// Scanned node identifier.
    pub node_id: String,
    /// Scanned node display name, falling back to the node id.
    pub node_name: String,
    /// Scanned node type.
    pub node_type: NodeType,
    /// Scan status.
    pub status: ScanStatus,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Severity breakdown.
    pub severity: SeverityCounts,
    /// Derived total, see [`SeverityCounts::total`].
    pub total: u64,
}

/// Reshapes a raw search row into a complete listing row.
#[must_use]
pub fn normalize_scan_row(raw: RawScanRow) -> ScanResultRow {
    let severity =
        SeverityCounts::from_optional(raw.critical, raw.high, raw.medium, raw.low, raw.unknown);
    let node_name = NonEmptyString::new(raw.node_name)
        .map(String::from)
        .unwrap_or_else(|_| raw.node_id.clone());

    ScanResultRow {
        scan_id: raw.scan_id,
        node_id: raw.node_id,
        node_name,
        node_type: raw.node_type,
        status: raw.status,
        updated_at: raw.updated_at,
        total: severity.total(),
        severity,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{NodeType, RawScanRow, ScanStatus, SeverityCounts, normalize_scan_row};

    fn raw_row(critical: Option<u64>, high: Option<u64>, low: Option<u64>) -> RawScanRow {
        RawScanRow {
            scan_id: "scan-1".to_owned(),
            node_id: "host-a".to_owned(),
            node_name: String::new(),
            node_type: NodeType::Host,
            status: ScanStatus::Complete,
            updated_at: Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap_or_default(),
            critical,
            high,
            medium: None,
            low,
            unknown: None,
        }
    }

    #[test]
    fn missing_counts_default_to_zero_and_total_excludes_unknown() {
        let row = normalize_scan_row(raw_row(None, Some(2), Some(1)));

        assert_eq!(
            row.severity,
            SeverityCounts {
                critical: 0,
                high: 2,
                medium: 0,
                low: 1,
                unknown: 0,
            }
        );
        assert_eq!(row.total, 3);
    }

    #[test]
    fn unknown_tier_never_counts_towards_total() {
        let mut raw = raw_row(Some(1), Some(1), Some(1));
        raw.unknown = Some(40);

        let row = normalize_scan_row(raw);
        assert_eq!(row.severity.unknown, 40);
        assert_eq!(row.total, 3);
    }

    #[test]
    fn node_name_falls_back_to_node_id() {
        let row = normalize_scan_row(raw_row(None, None, None));
        assert_eq!(row.node_name, "host-a");
        assert_eq!(row.total, 0);
    }

    #[test]
    fn raw_row_deserializes_with_missing_counts() {
        let raw = serde_json::from_value::<RawScanRow>(json!({
            "scan_id": "scan-9",
            "node_id": "image-1",
            "node_name": "nginx:1.25",
            "node_type": "container_image",
            "status": "IN_PROGRESS",
            "updated_at": 1_700_000_000_000_i64,
            "high": 4
        }));

        assert!(raw.is_ok());
        if let Ok(raw) = raw {
            assert_eq!(raw.status, ScanStatus::InProgress);
            assert_eq!(raw.critical, None);
            assert_eq!(normalize_scan_row(raw).total, 4);
        }
    }

    #[test]
    fn status_wire_value_matches_serde_form() {
        for status in [
            ScanStatus::Starting,
            ScanStatus::InProgress,
            ScanStatus::Complete,
            ScanStatus::Error,
            ScanStatus::CancelPending,
            ScanStatus::Cancelling,
            ScanStatus::Cancelled,
            ScanStatus::DeletePending,
        ] {
            assert_eq!(serde_json::to_value(status).ok(), Some(json!(status.as_str())));
        }
    }
}
