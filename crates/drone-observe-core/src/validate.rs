//! Contract validation: every contracted metric must be visible in the
//! time-series backend, and the backend must expose nothing else.
//!
//! Uses the same two scopes as the drift audit. Unlike drift, a passing
//! metric is reported too, with its current value.

use crate::check::{CheckItem, CheckReport};
use crate::contract::read_contract;
use crate::drift::{AuditLayout, PhaseBudget, read_backend_metrics};
use crate::exposition::unexpected_metrics;
use crate::probe::{Network, TimeSeries, probe_until};

pub const ITEM_UNEXPECTED_METRICS: &str = "Unexpected backend metrics";

const NOT_VISIBLE_DETAIL: &str = "not visible in Prometheus";

pub fn read_item_name(layout: &AuditLayout) -> String {
    format!("Read {}", layout.contract_path.display())
}

pub fn metric_item_name(metric: &str) -> String {
    format!("Metric {metric}")
}

pub async fn validate_contract(
    series: &dyn TimeSeries,
    network: &dyn Network,
    layout: &AuditLayout,
    budget: PhaseBudget,
) -> CheckReport {
    let deadline = tokio::time::Instant::now() + budget.probe_phase;
    let contract = match read_contract(&layout.root, &layout.contract_path) {
        Ok(contract) => contract,
        Err(error) => {
            tracing::error!(%error, "validate: contract unreadable");
            return CheckReport::from_items(vec![CheckItem::fail(
                read_item_name(layout),
                error.to_string(),
            )]);
        }
    };

    let mut items = Vec::with_capacity(contract.names().len() + 1);
    for name in contract.names() {
        let item = match probe_until(deadline, series.query(name)).await {
            Ok(Some(value)) => CheckItem::ok(metric_item_name(name), format!("value={value:.2}")),
            Ok(None) => CheckItem::fail(metric_item_name(name), NOT_VISIBLE_DETAIL),
            Err(error) => {
                tracing::warn!(metric = %name, %error, "validate: probe failed");
                CheckItem::fail(metric_item_name(name), NOT_VISIBLE_DETAIL)
            }
        };
        items.push(item);
    }

    let url = &layout.backend_metrics_url;
    items.push(
        match read_backend_metrics(network, url, budget.scrape_phase).await {
            Ok(observed) => {
                let extra = unexpected_metrics(&contract, &observed);
                if extra.is_empty() {
                    CheckItem::ok(ITEM_UNEXPECTED_METRICS, "none")
                } else {
                    CheckItem::fail(ITEM_UNEXPECTED_METRICS, extra.join(", "))
                }
            }
            Err(error) => {
                tracing::warn!(%error, "validate: backend scrape failed");
                CheckItem::fail(ITEM_UNEXPECTED_METRICS, error.to_string())
            }
        },
    );

    CheckReport::from_items(items)
}
