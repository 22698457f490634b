//! Shared types used across the codebase

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity minted by the backend during the one-time handshake.
///
/// Serialized with the field names the credential file uses on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "id")]
    pub user_id: String,
    pub secret: String,
    #[serde(default)]
    pub webhook_url: String,
}

impl Credentials {
    /// Both identity fields must be non-empty for the record to count.
    pub fn is_complete(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.secret.trim().is_empty()
    }
}

/// Investigation lifecycle as reported by the backend.
///
/// Unknown values are kept verbatim so newer backends do not break parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportStatus {
    Pending,
    Running,
    Success,
    Failed,
    Other(String),
}

impl ReportStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Running => "running",
            ReportStatus::Success => "success",
            ReportStatus::Failed => "failed",
            ReportStatus::Other(s) => s,
        }
    }
}

impl From<&str> for ReportStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => ReportStatus::Pending,
            "running" => ReportStatus::Running,
            "success" => ReportStatus::Success,
            "failed" => ReportStatus::Failed,
            other => ReportStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ReportStatus::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationReport {
    pub id: i64,
    pub alert_id: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub report: Option<String>,
}

impl InvestigationReport {
    /// A finished investigation with a body gets the full report view.
    pub fn has_final_report(&self) -> bool {
        self.status == ReportStatus::Success && self.report.is_some()
    }
}
