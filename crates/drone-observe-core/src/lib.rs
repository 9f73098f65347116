//! # drone-observe-core
//!
//! Read-only audits of a drone telemetry observability pipeline.
//!
//! This crate provides:
//! - the metrics contract reader and the contract-drift audit
//! - dashboard -> documentation mapping and doc token scanning
//! - control-plane checks (health, topology, freshness, limits)
//! - one-shot live snapshots (telemetry, anomaly model)
//!
//! It never talks to the network itself. Every check consumes the
//! [`TimeSeries`] and [`Network`] traits; `drone-observe-http` provides the
//! real implementations.
//!
//! ## Drift audit
//!
//! ```text
//! METRICS.md ──▶ Contract ──┬──▶ probe each name (TimeSeries)
//!                           ├──▶ diff backend scrape (Network)
//!                           └──▶ allowed set for doc tokens
//! dashboards/*.json ──▶ required docs
//!                 ───────────────▶ Vec<Finding>, High first
//! ```

pub mod check;
pub mod contract;
pub mod dashboards;
pub mod drift;
pub mod exposition;
pub mod finding;
pub mod freshness;
pub mod health;
pub mod limits;
pub mod live;
pub mod probe;
pub mod tokens;
pub mod topology;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use check::{CheckItem, CheckReport, CheckStatus, Endpoints, MESSAGE_RATE_QUERY};
pub use contract::{
    Contract, ContractError, DEFAULT_CONTRACT_PATH, IMPLICIT_METRIC_UP, candidate_paths,
    parse_contract, read_contract,
};
pub use dashboards::{
    DASHBOARD_DIR, DASHBOARD_DOCS, DOCUMENTATION_FILES, check_dashboard_docs, list_dashboards,
    required_doc,
};
pub use drift::{
    AuditLayout, DriftAuditor, PROBE_PHASE_TIMEOUT, PhaseBudget, SCRAPE_PHASE_TIMEOUT,
    check_doc_references, read_backend_metrics,
};
pub use exposition::{parse_exposition, unexpected_metrics};
pub use finding::{
    DRIFT_CHECK_KIND, DriftReport, DriftSummary, FAILURE_CLASS_BACKEND_UNREACHABLE,
    FAILURE_CLASS_CONTRACT_UNREADABLE, FAILURE_CLASS_DASHBOARD_DOC_MISSING,
    FAILURE_CLASS_DASHBOARD_UNMAPPED, FAILURE_CLASS_DOC_UNDOCUMENTED_REFERENCE,
    FAILURE_CLASS_METRIC_ABSENT, FAILURE_CLASS_METRIC_UNDOCUMENTED, Finding, Severity,
    sort_by_severity,
};
pub use freshness::{
    FRESHNESS_TIMEOUT, FreshnessThresholds, Signal, age_seconds, check_freshness,
};
pub use health::{HEALTH_TIMEOUT, check_health};
pub use limits::{LIMITS_TIMEOUT, LimitsSnapshot, observe_limits};
pub use live::{
    LIVE_TIMEOUT, LlmView, MlState, Stamped, TelemetryView, llm_snapshot, telemetry_snapshot,
};
pub use probe::{
    DIAL_TIMEOUT, FetchError, HTTP_TIMEOUT, Network, ProbeError, Sample, TimeSeries,
};
pub use tokens::extract_metric_tokens;
pub use topology::{TOPOLOGY_TIMEOUT, check_topology};
pub use validate::validate_contract;
