//! JSON output format for audit reports
//!
//! Machine-readable projection of a full report, including the dataset
//! summary, for consumers that are not spreadsheets.

use crate::record::LookupEvent;
use crate::report::AuditReport;
use crate::subject_stats::SubjectProfile;
use crate::summary::DatasetSummary;
use crate::user_stats::UserProfile;
use serde::{Deserialize, Serialize};

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// All parsed events, newest first
    pub events: Vec<LookupEvent>,
    /// User profiles, suspicion-ranked
    pub users: Vec<UserProfile>,
    /// Subject profiles, exposure-ranked
    pub subjects: Vec<SubjectProfile>,
    /// Dataset-level rollups
    pub summary: DatasetSummary,
}

impl JsonReport {
    /// Build the JSON projection of a report.
    pub fn from_report(report: &AuditReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "veedor-json-v1".to_string(),
            events: report.events.clone(),
            users: report.users.clone(),
            subjects: report.subjects.clone(),
            summary: DatasetSummary::from_report(report),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
