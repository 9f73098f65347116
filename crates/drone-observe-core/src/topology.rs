//! Effective topology from explicit checks only; nothing is discovered.

use crate::check::{CheckItem, CheckReport, CheckStatus, Endpoints, MESSAGE_RATE_QUERY};
use crate::probe::{Network, ProbeError, TimeSeries, fetch_until, probe_until};
use std::time::Duration;

pub const TOPOLOGY_TIMEOUT: Duration = Duration::from_secs(5);

pub const COMPONENT_EDGE: &str = "Edge";
pub const COMPONENT_BROKER: &str = "MQTT Broker";
pub const COMPONENT_BACKEND: &str = "Backend";
pub const COMPONENT_PROMETHEUS: &str = "Prometheus";
pub const COMPONENT_GRAFANA: &str = "Grafana";

/// Edge state comes from the ingest rate: unobservable fails, zero is silent.
fn edge_component(rate: Result<Option<f64>, ProbeError>) -> CheckItem {
    match rate {
        Ok(Some(rate)) if rate > 0.0 => CheckItem::ok(COMPONENT_EDGE, ""),
        Ok(Some(_)) => CheckItem {
            name: COMPONENT_EDGE.to_string(),
            status: CheckStatus::Silent,
            detail: "telemetry silent".to_string(),
        },
        Ok(None) => CheckItem::fail(COMPONENT_EDGE, "telemetry not observable"),
        Err(error) => {
            tracing::warn!(%error, "topology: rate query failed");
            CheckItem::fail(COMPONENT_EDGE, "telemetry not observable")
        }
    }
}

pub async fn check_topology(
    series: &dyn TimeSeries,
    network: &dyn Network,
    endpoints: &Endpoints,
    budget: Duration,
) -> CheckReport {
    let deadline = tokio::time::Instant::now() + budget;

    let edge = edge_component(probe_until(deadline, series.query(MESSAGE_RATE_QUERY)).await);

    let broker_url = format!("tcp://{}:{}", endpoints.mqtt_host, endpoints.mqtt_port);
    let broker = fetch_until(
        deadline,
        &broker_url,
        network.dial(&endpoints.mqtt_host, endpoints.mqtt_port),
    )
    .await;

    let backend_url = &endpoints.backend_metrics_url;
    let backend = fetch_until(deadline, backend_url, network.get_ok(backend_url)).await;

    let ready = fetch_until(deadline, "time-series /-/ready", series.check_ready()).await;

    let grafana_url = endpoints.grafana_health_url();
    let grafana = fetch_until(deadline, &grafana_url, network.get_ok(&grafana_url)).await;

    CheckReport::from_items(vec![
        edge,
        CheckItem::from_result(COMPONENT_BROKER, broker),
        CheckItem::from_result(COMPONENT_BACKEND, backend),
        CheckItem::from_result(COMPONENT_PROMETHEUS, ready),
        CheckItem::from_result(COMPONENT_GRAFANA, grafana),
    ])
}
