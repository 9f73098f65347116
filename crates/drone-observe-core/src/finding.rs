//! Findings: the ordered output of a drift audit.
//!
//! A finding is a value object. It is created once by the phase that
//! detected the discrepancy and only ever compared for sort order.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DRIFT_CHECK_KIND: &str = "drone_observe.drift.v1";

pub const FAILURE_CLASS_CONTRACT_UNREADABLE: &str = "drift.contract.unreadable";
pub const FAILURE_CLASS_METRIC_ABSENT: &str = "drift.metric.absent";
pub const FAILURE_CLASS_BACKEND_UNREACHABLE: &str = "drift.backend.unreachable";
pub const FAILURE_CLASS_METRIC_UNDOCUMENTED: &str = "drift.metric.undocumented";
pub const FAILURE_CLASS_DASHBOARD_UNMAPPED: &str = "drift.dashboard.unmapped";
pub const FAILURE_CLASS_DASHBOARD_DOC_MISSING: &str = "drift.dashboard.doc_missing";
pub const FAILURE_CLASS_DOC_UNDOCUMENTED_REFERENCE: &str = "drift.doc.undocumented_reference";

pub const ITEM_METRIC_ABSENT: &str = "Documented metric absent";
pub const ITEM_BACKEND_METRICS: &str = "Backend /metrics";
pub const ITEM_METRIC_UNDOCUMENTED: &str = "Undocumented metric present";
pub const ITEM_DASHBOARD_UNMAPPED: &str = "Dashboard without doc mapping";
pub const ITEM_DASHBOARD_DOC_MISSING: &str = "Doc missing for dashboard";
pub const ITEM_DOC_UNDOCUMENTED_REFERENCE: &str = "Doc references undocumented metric";

/// Ordinal severity. Declaration order is priority order: `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub severity: Severity,
    pub class: String,
    pub item: String,
    pub detail: String,
}

impl Finding {
    pub fn new(
        severity: Severity,
        class: &str,
        item: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            class: class.to_string(),
            item: item.into(),
            detail: detail.into(),
        }
    }

    pub fn high(class: &str, item: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::High, class, item, detail)
    }

    pub fn medium(class: &str, item: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Medium, class, item, detail)
    }
}

/// Stable sort by severity: High, then Medium, then Low. Within a tier the
/// generation order is kept.
pub fn sort_by_severity(findings: &mut [Finding]) {
    findings.sort_by_key(|finding| finding.severity);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    pub check_kind: String,
    pub result: String,
    pub findings: Vec<Finding>,
    pub summary: DriftSummary,
}

impl DriftReport {
    /// Wraps an already ordered finding list. The order is kept as given.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let mut summary = DriftSummary::default();
        for finding in &findings {
            match finding.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        let result = if findings.is_empty() {
            "accepted"
        } else {
            "rejected"
        };
        Self {
            check_kind: DRIFT_CHECK_KIND.to_string(),
            result: result.to_string(),
            findings,
            summary,
        }
    }

    pub fn accepted(&self) -> bool {
        self.result == "accepted"
    }
}
