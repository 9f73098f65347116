//! Observed technical limits. A snapshot of current values only; nothing is
//! benchmarked or extrapolated.

use crate::check::MESSAGE_RATE_QUERY;
use crate::freshness::age_seconds;
use crate::probe::{Sample, TimeSeries, probe_until};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LIMITS_TIMEOUT: Duration = Duration::from_secs(5);

pub const SERIES_COUNT_QUERY: &str = r#"count({job="backend"})"#;
pub const METRIC_NAME_COUNT_QUERY: &str = r#"count(count by(__name__) ({job="backend"}))"#;
pub const SCRAPE_UP_QUERY: &str = r#"up{job="backend"}"#;

/// Every field is `None` when the backend had no answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsSnapshot {
    pub message_rate: Option<f64>,
    pub series_count: Option<f64>,
    pub metric_name_count: Option<f64>,
    pub scrape_age_seconds: Option<i64>,
}

async fn observe(
    series: &dyn TimeSeries,
    expr: &str,
    deadline: tokio::time::Instant,
) -> Option<Sample> {
    match probe_until(deadline, series.query_with_timestamp(expr)).await {
        Ok(sample) => sample,
        Err(error) => {
            tracing::warn!(%expr, %error, "limits: query failed");
            None
        }
    }
}

pub async fn observe_limits(
    series: &dyn TimeSeries,
    now: DateTime<Utc>,
    budget: Duration,
) -> LimitsSnapshot {
    let deadline = tokio::time::Instant::now() + budget;
    let rate = observe(series, MESSAGE_RATE_QUERY, deadline).await;
    let count = observe(series, SERIES_COUNT_QUERY, deadline).await;
    let names = observe(series, METRIC_NAME_COUNT_QUERY, deadline).await;
    let up = observe(series, SCRAPE_UP_QUERY, deadline).await;

    LimitsSnapshot {
        message_rate: rate.map(|s| s.value),
        series_count: count.map(|s| s.value),
        metric_name_count: names.map(|s| s.value),
        scrape_age_seconds: up.and_then(|s| age_seconds(now, s.timestamp)),
    }
}
