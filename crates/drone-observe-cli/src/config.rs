use drone_observe_core::{DEFAULT_CONTRACT_PATH, Endpoints, FreshnessThresholds};
use std::str::FromStr;

pub const DEFAULT_MQTT_HOST: &str = "mqtt";
pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_BACKEND_HTTP_PORT: u16 = 8080;
pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090";
pub const DEFAULT_GRAFANA_URL: &str = "http://localhost:3000";

/// Environment-resolved settings. Every key has a fixed default; empty values
/// count as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub backend_metrics_url: String,
    pub prometheus_url: String,
    pub grafana_url: String,
    pub metrics_doc: String,
    pub freshness: FreshnessThresholds,
    /// `NO_COLOR` set to anything non-empty.
    pub no_color: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = FreshnessThresholds::default();
        let backend_port = parse_or(&lookup, "BACKEND_HTTP_PORT", DEFAULT_BACKEND_HTTP_PORT);
        Self {
            mqtt_host: string_or(&lookup, "MQTT_HOST", DEFAULT_MQTT_HOST),
            mqtt_port: parse_or(&lookup, "MQTT_PORT", DEFAULT_MQTT_PORT),
            backend_metrics_url: format!("http://localhost:{backend_port}/metrics"),
            prometheus_url: string_or(&lookup, "PROMETHEUS_URL", DEFAULT_PROMETHEUS_URL),
            grafana_url: string_or(&lookup, "GRAFANA_URL", DEFAULT_GRAFANA_URL),
            metrics_doc: string_or(&lookup, "METRICS_DOC", DEFAULT_CONTRACT_PATH),
            freshness: FreshnessThresholds {
                warn_sec: parse_or(&lookup, "FRESHNESS_WARN_SEC", defaults.warn_sec),
                fail_sec: parse_or(&lookup, "FRESHNESS_FAIL_SEC", defaults.fail_sec),
            },
            no_color: non_empty(&lookup, "NO_COLOR").is_some(),
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            mqtt_host: self.mqtt_host.clone(),
            mqtt_port: self.mqtt_port,
            backend_metrics_url: self.backend_metrics_url.clone(),
            grafana_url: self.grafana_url.clone(),
        }
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.is_empty())
}

fn string_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    non_empty(lookup, key).unwrap_or_else(|| default.to_string())
}

fn parse_or<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    let Some(raw) = non_empty(lookup, key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(%key, value = %raw, "unparseable setting; using default");
            default
        }
    }
}
