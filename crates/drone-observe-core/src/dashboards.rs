//! Dashboard definitions and the documentation each one requires.
//!
//! The dashboard -> doc table is literal. A dashboard is never matched to a
//! doc by naming convention; a file missing from the table is itself drift.

use crate::finding::{
    FAILURE_CLASS_DASHBOARD_DOC_MISSING, FAILURE_CLASS_DASHBOARD_UNMAPPED, Finding,
    ITEM_DASHBOARD_DOC_MISSING, ITEM_DASHBOARD_UNMAPPED,
};
use std::path::Path;

pub const DASHBOARD_DIR: &str = "observability/grafana/dashboards";
pub const DASHBOARD_PATTERN: &str = "*.json";

pub const DASHBOARD_DOCS: [(&str, &str); 2] = [
    (
        "drones-control-plane.json",
        "docs/09-dashboard-control-plane.md",
    ),
    ("drones-data-plane.json", "docs/10-dashboard-data-plane.md"),
];

/// Documentation files scanned for metric-name references.
pub const DOCUMENTATION_FILES: [&str; 2] = [
    "docs/09-dashboard-control-plane.md",
    "docs/10-dashboard-data-plane.md",
];

pub fn required_doc(dashboard: &str) -> Option<&'static str> {
    DASHBOARD_DOCS
        .iter()
        .find(|(name, _)| *name == dashboard)
        .map(|(_, doc)| *doc)
}

/// Dashboard file names under `root`, in glob (sorted) order.
pub fn list_dashboards(root: &Path) -> Vec<String> {
    let dir = root.join(DASHBOARD_DIR);
    let Some(dir_text) = dir.to_str() else {
        tracing::warn!(dir = %dir.display(), "dashboard dir is not valid UTF-8; skipping");
        return Vec::new();
    };
    let pattern = format!("{}/{}", glob::Pattern::escape(dir_text), DASHBOARD_PATTERN);
    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(error) => {
            tracing::warn!(%pattern, %error, "invalid dashboard pattern");
            return Vec::new();
        }
    };
    paths
        .filter_map(|entry| match entry {
            Ok(path) => file_name(&path),
            Err(error) => {
                tracing::warn!(%error, "unreadable dashboard entry");
                None
            }
        })
        .collect()
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
}

/// One finding per dashboard without a table entry (Medium) or whose
/// required doc is absent under `root` (High).
pub fn check_dashboard_docs(root: &Path) -> Vec<Finding> {
    let mut findings = Vec::new();
    for dashboard in list_dashboards(root) {
        match required_doc(&dashboard) {
            None => findings.push(Finding::medium(
                FAILURE_CLASS_DASHBOARD_UNMAPPED,
                ITEM_DASHBOARD_UNMAPPED,
                dashboard,
            )),
            Some(doc) if !root.join(doc).exists() => findings.push(Finding::high(
                FAILURE_CLASS_DASHBOARD_DOC_MISSING,
                ITEM_DASHBOARD_DOC_MISSING,
                dashboard,
            )),
            Some(_) => {}
        }
    }
    findings
}
