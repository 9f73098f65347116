//! Status items shared by the control-plane commands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instant-query expression for the broker's ingest rate.
pub const MESSAGE_RATE_QUERY: &str = "rate(mqtt_messages_total[1m])";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Warn,
    /// Reachable but carrying no traffic.
    Silent,
    Fail,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Silent => "silent",
            Self::Fail => "fail",
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckItem {
    pub name: String,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl CheckItem {
    pub fn ok(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
            detail: detail.into(),
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            detail: detail.into(),
        }
    }

    /// OK with no detail, or Fail carrying the error text.
    pub fn from_result<E: fmt::Display>(name: impl Into<String>, result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(name, ""),
            Err(error) => Self::fail(name, error.to_string()),
        }
    }
}

/// Ordered items plus the overall verdict: OK iff every item is OK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub ok: bool,
    pub items: Vec<CheckItem>,
}

impl CheckReport {
    pub fn from_items(items: Vec<CheckItem>) -> Self {
        let ok = items.iter().all(|item| item.status.is_ok());
        Self { ok, items }
    }
}

/// Hosts and URLs the reachability checks target. The time-series backend is
/// reached through its own client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub backend_metrics_url: String,
    pub grafana_url: String,
}

impl Endpoints {
    pub fn grafana_health_url(&self) -> String {
        format!("{}/api/health", self.grafana_url.trim_end_matches('/'))
    }
}
