//! Control-plane health: four cheap checks, no remediation.

use crate::check::{CheckItem, CheckReport, Endpoints, MESSAGE_RATE_QUERY};
use crate::probe::{Network, TimeSeries, fetch_until, probe_until};
use std::time::Duration;

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

pub const ITEM_MQTT_REACHABLE: &str = "MQTT reachable";
pub const ITEM_BACKEND_METRICS: &str = "Backend /metrics";
pub const ITEM_PROMETHEUS_READY: &str = "Prometheus ready";
pub const ITEM_METRIC_FLOW: &str = "Metric flow";

const NO_FLOW_DETAIL: &str = "rate=0 or no data";

/// Broker dial, backend scrape endpoint, time-series readiness, then a
/// positive ingest rate. All four share one `budget`.
pub async fn check_health(
    series: &dyn TimeSeries,
    network: &dyn Network,
    endpoints: &Endpoints,
    budget: Duration,
) -> CheckReport {
    let deadline = tokio::time::Instant::now() + budget;
    let broker_url = format!("tcp://{}:{}", endpoints.mqtt_host, endpoints.mqtt_port);

    tracing::debug!(%broker_url, "health: dialing broker");
    let broker = fetch_until(
        deadline,
        &broker_url,
        network.dial(&endpoints.mqtt_host, endpoints.mqtt_port),
    )
    .await;

    let backend_url = &endpoints.backend_metrics_url;
    let backend = fetch_until(deadline, backend_url, network.get_ok(backend_url)).await;

    let ready = fetch_until(deadline, "time-series /-/ready", series.check_ready()).await;

    let flow = match probe_until(deadline, series.query(MESSAGE_RATE_QUERY)).await {
        Ok(Some(rate)) if rate > 0.0 => CheckItem::ok(ITEM_METRIC_FLOW, ""),
        Ok(_) => CheckItem::fail(ITEM_METRIC_FLOW, NO_FLOW_DETAIL),
        Err(error) => {
            tracing::warn!(%error, "health: rate query failed");
            CheckItem::fail(ITEM_METRIC_FLOW, error.to_string())
        }
    };

    CheckReport::from_items(vec![
        CheckItem::from_result(ITEM_MQTT_REACHABLE, broker),
        CheckItem::from_result(ITEM_BACKEND_METRICS, backend),
        CheckItem::from_result(ITEM_PROMETHEUS_READY, ready),
        flow,
    ])
}
