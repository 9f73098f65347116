//! Contract-drift audit.
//!
//! One linear pass per run, no retries:
//!
//! ```text
//! read contract ──(unreadable)──▶ [single High finding, stop]
//!     │
//! probe every contracted metric      ┐ 6s scope
//!     │                              ┘
//! scrape backend, diff vs contract   ] 3s scope
//!     │
//! dashboards -> required docs
//!     │
//! doc tokens vs contract
//!     │
//! stable sort by severity
//! ```
//!
//! Every phase after the contract read converts its own errors into
//! findings, so a run always yields a list. Runs share no state.

use crate::contract::{Contract, read_contract};
use crate::dashboards::{DOCUMENTATION_FILES, check_dashboard_docs};
use crate::exposition::{parse_exposition, unexpected_metrics};
use crate::finding::{
    DriftReport, FAILURE_CLASS_BACKEND_UNREACHABLE, FAILURE_CLASS_CONTRACT_UNREADABLE,
    FAILURE_CLASS_DOC_UNDOCUMENTED_REFERENCE, FAILURE_CLASS_METRIC_ABSENT,
    FAILURE_CLASS_METRIC_UNDOCUMENTED, Finding, ITEM_BACKEND_METRICS,
    ITEM_DOC_UNDOCUMENTED_REFERENCE, ITEM_METRIC_ABSENT, ITEM_METRIC_UNDOCUMENTED,
    sort_by_severity,
};
use crate::probe::{FetchError, Network, TimeSeries, fetch_within, probe_until};
use crate::tokens::extract_metric_tokens;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Budget for the contract read plus every per-metric probe.
pub const PROBE_PHASE_TIMEOUT: Duration = Duration::from_secs(6);
/// Budget for the single backend scrape.
pub const SCRAPE_PHASE_TIMEOUT: Duration = Duration::from_secs(3);

/// Independent cancellation scopes for the two network phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBudget {
    pub probe_phase: Duration,
    pub scrape_phase: Duration,
}

impl Default for PhaseBudget {
    fn default() -> Self {
        Self {
            probe_phase: PROBE_PHASE_TIMEOUT,
            scrape_phase: SCRAPE_PHASE_TIMEOUT,
        }
    }
}

/// Where the audit looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLayout {
    /// Repository root; dashboards and docs resolve against it.
    pub root: PathBuf,
    /// Contract document, resolved against `root` and up to two parents.
    pub contract_path: PathBuf,
    /// Backend exposition endpoint.
    pub backend_metrics_url: String,
}

pub struct DriftAuditor<'a> {
    series: &'a dyn TimeSeries,
    network: &'a dyn Network,
    layout: AuditLayout,
    budget: PhaseBudget,
}

impl<'a> DriftAuditor<'a> {
    pub fn new(series: &'a dyn TimeSeries, network: &'a dyn Network, layout: AuditLayout) -> Self {
        Self {
            series,
            network,
            layout,
            budget: PhaseBudget::default(),
        }
    }

    #[must_use]
    pub fn with_budget(mut self, budget: PhaseBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn layout(&self) -> &AuditLayout {
        &self.layout
    }

    /// Run the audit and return severity-ordered findings. Empty means no drift.
    pub async fn run(&self) -> Vec<Finding> {
        let probe_deadline = tokio::time::Instant::now() + self.budget.probe_phase;

        tracing::debug!(path = %self.layout.contract_path.display(), "drift: reading contract");
        let contract = match read_contract(&self.layout.root, &self.layout.contract_path) {
            Ok(contract) => contract,
            Err(error) => {
                tracing::error!(%error, "drift: contract unreadable; audit aborted");
                return vec![Finding::high(
                    FAILURE_CLASS_CONTRACT_UNREADABLE,
                    self.layout.contract_path.display().to_string(),
                    error.to_string(),
                )];
            }
        };

        let mut findings = self.probe_contract(&contract, probe_deadline).await;
        findings.extend(self.check_backend(&contract).await);

        tracing::debug!(root = %self.layout.root.display(), "drift: checking dashboards");
        findings.extend(check_dashboard_docs(&self.layout.root));

        tracing::debug!("drift: scanning documentation");
        findings.extend(check_doc_references(&self.layout.root, &contract));

        sort_by_severity(&mut findings);
        findings
    }

    pub async fn report(&self) -> DriftReport {
        DriftReport::from_findings(self.run().await)
    }

    async fn probe_contract(
        &self,
        contract: &Contract,
        deadline: tokio::time::Instant,
    ) -> Vec<Finding> {
        tracing::debug!(metrics = contract.names().len(), "drift: probing contract");
        let mut findings = Vec::new();
        for name in contract.names() {
            match probe_until(deadline, self.series.query(name)).await {
                Ok(Some(_)) => {}
                Ok(None) => findings.push(absent(name)),
                Err(error) => {
                    tracing::warn!(metric = %name, %error, "drift: probe failed");
                    findings.push(absent(name));
                }
            }
        }
        findings
    }

    async fn check_backend(&self, contract: &Contract) -> Vec<Finding> {
        let url = &self.layout.backend_metrics_url;
        tracing::debug!(%url, "drift: scraping backend");
        match read_backend_metrics(self.network, url, self.budget.scrape_phase).await {
            Ok(observed) => unexpected_metrics(contract, &observed)
                .into_iter()
                .map(|name| {
                    Finding::medium(
                        FAILURE_CLASS_METRIC_UNDOCUMENTED,
                        ITEM_METRIC_UNDOCUMENTED,
                        name,
                    )
                })
                .collect(),
            Err(error) => {
                tracing::warn!(%error, "drift: backend scrape failed");
                vec![Finding::high(
                    FAILURE_CLASS_BACKEND_UNREACHABLE,
                    ITEM_BACKEND_METRICS,
                    error.to_string(),
                )]
            }
        }
    }
}

fn absent(name: &str) -> Finding {
    Finding::high(FAILURE_CLASS_METRIC_ABSENT, ITEM_METRIC_ABSENT, name)
}

/// Fetch and parse the backend exposition within `budget`.
pub async fn read_backend_metrics(
    network: &dyn Network,
    url: &str,
    budget: Duration,
) -> Result<Vec<String>, FetchError> {
    let body = fetch_within(budget, url, network.fetch_text(url)).await?;
    Ok(parse_exposition(&body))
}

/// Metric-style tokens in the documentation files that the contract does not
/// cover. Unreadable doc files are skipped; the dashboard check already
/// reports missing docs.
pub fn check_doc_references(root: &Path, contract: &Contract) -> Vec<Finding> {
    let allowed = contract.allowed();
    let mut findings = Vec::new();
    for doc in DOCUMENTATION_FILES {
        let path = root.join(doc);
        let text = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "drift: doc not readable; skipped");
                continue;
            }
        };
        let doc_name = Path::new(doc)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(doc);
        for token in extract_metric_tokens(&text) {
            if !allowed.contains(token.as_str()) {
                findings.push(Finding::medium(
                    FAILURE_CLASS_DOC_UNDOCUMENTED_REFERENCE,
                    ITEM_DOC_UNDOCUMENTED_REFERENCE,
                    format!("{doc_name} -> {token}"),
                ));
            }
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{
        FAILURE_CLASS_DASHBOARD_DOC_MISSING, FAILURE_CLASS_DASHBOARD_UNMAPPED, Severity,
    };
    use crate::testing::{FakeNetwork, FakeSeries, contract_doc, write_fixture as write};
    use tempfile::TempDir;

    fn layout(root: &Path) -> AuditLayout {
        AuditLayout {
            root: root.to_path_buf(),
            contract_path: PathBuf::from("METRICS.md"),
            backend_metrics_url: "http://localhost:8080/metrics".to_string(),
        }
    }

    fn details(findings: &[Finding], severity: Severity) -> Vec<&str> {
        findings
            .iter()
            .filter(|f| f.severity == severity)
            .map(|f| f.detail.as_str())
            .collect()
    }

    #[tokio::test]
    async fn all_contracted_metrics_found_yields_no_high_findings() {
        let root = TempDir::new().expect("temp dir should be created");
        let names = ["drone_battery_last_pct", "mqtt_messages_total"];
        write(root.path(), "METRICS.md", &contract_doc(&names));
        let series = FakeSeries::with(&names);
        let network = FakeNetwork::serving("drone_battery_last_pct 80\nmqtt_messages_total 3\n");

        let findings = DriftAuditor::new(&series, &network, layout(root.path()))
            .run()
            .await;
        assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    }

    #[tokio::test]
    async fn unreadable_contract_is_a_single_high_finding_and_halts() {
        let root = TempDir::new().expect("temp dir should be created");
        let base = root.path().join("a").join("b");
        fs::create_dir_all(&base).expect("nested dirs should be created");
        let series = FakeSeries::default();
        let network = FakeNetwork::serving("ghost_total 1\n");

        let findings = DriftAuditor::new(&series, &network, layout(&base))
            .run()
            .await;

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].item, "METRICS.md");
        assert_eq!(findings[0].class, FAILURE_CLASS_CONTRACT_UNREADABLE);
        assert_eq!(series.calls(), 0);
        assert_eq!(network.fetches(), 0);
    }

    #[tokio::test]
    async fn missing_or_failing_probe_is_high_with_metric_detail() {
        let root = TempDir::new().expect("temp dir should be created");
        write(
            root.path(),
            "METRICS.md",
            &contract_doc(&["a_total", "b_total", "c_total"]),
        );
        let series = FakeSeries::with(&["a_total"]).failing("c_total");
        let network = FakeNetwork::serving("a_total 1\nb_total 0\nc_total 2\n");

        let findings = DriftAuditor::new(&series, &network, layout(root.path()))
            .run()
            .await;
        assert_eq!(details(&findings, Severity::High), vec!["b_total", "c_total"]);
        assert!(
            findings
                .iter()
                .all(|f| f.class == FAILURE_CLASS_METRIC_ABSENT)
        );
    }

    #[tokio::test]
    async fn undocumented_backend_metric_is_medium_and_up_is_allowed() {
        let root = TempDir::new().expect("temp dir should be created");
        write(root.path(), "METRICS.md", &contract_doc(&["mqtt_messages_total"]));
        let series = FakeSeries::with(&["mqtt_messages_total"]);
        let network = FakeNetwork::serving(
            "# TYPE up gauge\nup 1\nmqtt_messages_total{topic=\"t\"} 4\nghost_metric_total 9\n",
        );

        let findings = DriftAuditor::new(&series, &network, layout(root.path()))
            .run()
            .await;
        assert_eq!(
            findings,
            vec![Finding::medium(
                FAILURE_CLASS_METRIC_UNDOCUMENTED,
                ITEM_METRIC_UNDOCUMENTED,
                "ghost_metric_total"
            )]
        );
    }

    #[tokio::test]
    async fn scrape_failure_is_high_and_skips_diff() {
        let root = TempDir::new().expect("temp dir should be created");
        write(root.path(), "METRICS.md", &contract_doc(&["a_total"]));
        let series = FakeSeries::with(&["a_total"]);
        let network = FakeNetwork::scrape_failing("http://localhost:8080/metrics");

        let findings = DriftAuditor::new(&series, &network, layout(root.path()))
            .run()
            .await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].class, FAILURE_CLASS_BACKEND_UNREACHABLE);
        assert_eq!(findings[0].item, ITEM_BACKEND_METRICS);
        assert!(findings[0].detail.contains("connection refused"));
    }

    #[tokio::test]
    async fn probe_phase_deadline_turns_every_probe_into_high() {
        let root = TempDir::new().expect("temp dir should be created");
        write(root.path(), "METRICS.md", &contract_doc(&["a_total", "b_total"]));
        let series = FakeSeries::with(&["a_total", "b_total"]).hanging();
        let network = FakeNetwork::serving("a_total 1\nb_total 1\n");

        let findings = DriftAuditor::new(&series, &network, layout(root.path()))
            .with_budget(PhaseBudget {
                probe_phase: Duration::from_millis(20),
                scrape_phase: SCRAPE_PHASE_TIMEOUT,
            })
            .run()
            .await;
        assert_eq!(details(&findings, Severity::High), vec!["a_total", "b_total"]);
    }

    #[tokio::test]
    async fn findings_are_ordered_by_severity_then_phase() {
        let root = TempDir::new().expect("temp dir should be created");
        write(root.path(), "METRICS.md", &contract_doc(&["a_total", "b_total"]));
        write(
            root.path(),
            "observability/grafana/dashboards/drones-control-plane.json",
            "{}",
        );
        write(
            root.path(),
            "observability/grafana/dashboards/drones-data-plane.json",
            "{}",
        );
        write(root.path(), "observability/grafana/dashboards/zeta.json", "{}");
        write(
            root.path(),
            "docs/10-dashboard-data-plane.md",
            "Panel: rate(a_total[1m]) next to legacy_rate_total and up.",
        );
        let series = FakeSeries::with(&["a_total"]);
        let network = FakeNetwork::serving("a_total 1\nb_total 1\nghost_total 1\n");

        let findings = DriftAuditor::new(&series, &network, layout(root.path()))
            .run()
            .await;
        let classes: Vec<&str> = findings.iter().map(|f| f.class.as_str()).collect();
        assert_eq!(
            classes,
            vec![
                FAILURE_CLASS_METRIC_ABSENT,
                FAILURE_CLASS_DASHBOARD_DOC_MISSING,
                FAILURE_CLASS_METRIC_UNDOCUMENTED,
                FAILURE_CLASS_DASHBOARD_UNMAPPED,
                FAILURE_CLASS_DOC_UNDOCUMENTED_REFERENCE,
            ]
        );
        assert_eq!(findings[0].detail, "b_total");
        assert_eq!(findings[1].detail, "drones-control-plane.json");
        assert_eq!(findings[2].detail, "ghost_total");
        assert_eq!(findings[3].detail, "zeta.json");
        assert_eq!(
            findings[4].detail,
            "10-dashboard-data-plane.md -> legacy_rate_total"
        );
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let root = TempDir::new().expect("temp dir should be created");
        write(root.path(), "METRICS.md", &contract_doc(&["a_total", "b_total"]));
        write(root.path(), "observability/grafana/dashboards/x.json", "{}");
        let series = FakeSeries::with(&["a_total"]);
        let network = FakeNetwork::serving("a_total 1\nz_total 1\n");
        let auditor = DriftAuditor::new(&series, &network, layout(root.path()));

        let first = auditor.run().await;
        let second = auditor.run().await;
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn doc_scan_skips_missing_files_and_allows_contract_names() {
        let root = TempDir::new().expect("temp dir should be created");
        write(
            root.path(),
            "docs/09-dashboard-control-plane.md",
            "uses mqtt_messages_total, up and drone_unknown_pct",
        );
        let contract = Contract::new(vec!["mqtt_messages_total".to_string()], "METRICS.md");

        let findings = check_doc_references(root.path(), &contract);
        assert_eq!(
            findings,
            vec![Finding::medium(
                FAILURE_CLASS_DOC_UNDOCUMENTED_REFERENCE,
                ITEM_DOC_UNDOCUMENTED_REFERENCE,
                "09-dashboard-control-plane.md -> drone_unknown_pct"
            )]
        );
    }

    #[test]
    fn doc_scan_reads_latin1_docs() {
        let root = TempDir::new().expect("temp dir should be created");
        let doc = root.path().join("docs/09-dashboard-control-plane.md");
        fs::create_dir_all(doc.parent().expect("doc has a parent"))
            .expect("docs dir should be created");
        fs::write(&doc, b"descripci\xf3n: ghost_rate_total\n").expect("doc should write");
        let contract = Contract::new(Vec::new(), "METRICS.md");

        let findings = check_doc_references(root.path(), &contract);
        assert_eq!(
            details(&findings, Severity::Medium),
            vec!["09-dashboard-control-plane.md -> ghost_rate_total"]
        );
    }

    #[tokio::test]
    async fn latin1_contract_is_probed_not_fatal() {
        let root = TempDir::new().expect("temp dir should be created");
        fs::write(
            root.path().join("METRICS.md"),
            b"| nombre | descripci\xf3n |\n|---|---|\n| mqtt_messages_total | mensajes |\n",
        )
        .expect("contract should write");
        let series = FakeSeries::with(&["mqtt_messages_total"]);
        let network = FakeNetwork::serving("mqtt_messages_total 1\n");
        let auditor = DriftAuditor::new(&series, &network, layout(root.path()));

        let findings = auditor.run().await;
        assert!(
            findings
                .iter()
                .all(|f| f.class != FAILURE_CLASS_CONTRACT_UNREADABLE),
            "{findings:?}"
        );
        assert_eq!(series.calls(), 1);
        assert!(details(&findings, Severity::High).is_empty(), "{findings:?}");
    }
}
