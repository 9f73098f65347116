//! Data recency from the sample timestamps the backend reports.

use crate::check::CheckStatus;
use crate::probe::{TimeSeries, probe_until};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const FRESHNESS_TIMEOUT: Duration = Duration::from_secs(5);

/// `(metric, label)` pairs, checked in this order.
pub const FRESHNESS_SIGNALS: [(&str, &str); 2] = [
    ("drone_battery_last_pct", "Battery"),
    ("mqtt_messages_total", "MQTT messages"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessThresholds {
    pub warn_sec: i64,
    pub fail_sec: i64,
}

impl Default for FreshnessThresholds {
    fn default() -> Self {
        Self {
            warn_sec: 30,
            fail_sec: 120,
        }
    }
}

impl FreshnessThresholds {
    pub fn classify(&self, age_seconds: i64) -> CheckStatus {
        if age_seconds >= self.fail_sec {
            CheckStatus::Fail
        } else if age_seconds >= self.warn_sec {
            CheckStatus::Warn
        } else {
            CheckStatus::Ok
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub name: String,
    pub status: CheckStatus,
    /// `None` when the backend holds no sample.
    pub age_seconds: Option<i64>,
    pub detail: String,
}

/// Whole seconds between a backend epoch timestamp and `now`. Fractional
/// timestamps are truncated first.
pub fn age_seconds(now: DateTime<Utc>, timestamp: f64) -> Option<i64> {
    if !timestamp.is_finite() {
        return None;
    }
    let then = DateTime::<Utc>::from_timestamp(timestamp.trunc() as i64, 0)?;
    Some((now - then).num_seconds())
}

pub async fn check_freshness(
    series: &dyn TimeSeries,
    thresholds: FreshnessThresholds,
    now: DateTime<Utc>,
    budget: Duration,
) -> Vec<Signal> {
    let deadline = tokio::time::Instant::now() + budget;
    let mut signals = Vec::with_capacity(FRESHNESS_SIGNALS.len());
    for (metric, label) in FRESHNESS_SIGNALS {
        let sample = match probe_until(deadline, series.query_with_timestamp(metric)).await {
            Ok(sample) => sample,
            Err(error) => {
                tracing::warn!(%metric, %error, "freshness: query failed");
                None
            }
        };
        let age = sample.and_then(|sample| age_seconds(now, sample.timestamp));
        signals.push(match age {
            Some(age) => Signal {
                name: label.to_string(),
                status: thresholds.classify(age),
                age_seconds: Some(age),
                detail: "ok".to_string(),
            },
            None => Signal {
                name: label.to_string(),
                status: CheckStatus::Fail,
                age_seconds: None,
                detail: "no data".to_string(),
            },
        });
    }
    signals
}
