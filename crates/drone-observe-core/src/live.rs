//! One-shot live views: drone telemetry and the anomaly model's state.

use crate::check::MESSAGE_RATE_QUERY;
use crate::probe::{TimeSeries, probe_until};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LIVE_TIMEOUT: Duration = Duration::from_secs(4);

pub const BATTERY_QUERY: &str = "drone_battery_last_pct";
pub const ANOMALY_SCORE_QUERY: &str = "ml_anomaly_score";
pub const ML_STATE_QUERY: &str = "ml_state";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamped<T> {
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub view: T,
}

/// Either both readings rendered, or the label of the first one missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TelemetryView {
    Ready {
        battery: String,
        message_rate: String,
    },
    Missing {
        label: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MlState {
    Ok,
    Warn,
    Crit,
    Unknown,
}

impl MlState {
    /// Rounds half up toward the nearest code; only 0, 1 and 2 are known.
    pub fn from_value(value: f64) -> Self {
        if !value.is_finite() {
            return Self::Unknown;
        }
        match (value + 0.5).trunc() as i64 {
            0 => Self::Ok,
            1 => Self::Warn,
            2 => Self::Crit,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK (0)",
            Self::Warn => "WARN (1)",
            Self::Crit => "CRIT (2)",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn alert(self) -> &'static str {
        match self {
            Self::Ok => "no alert",
            Self::Warn => "observe and confirm",
            Self::Crit => "critical and active",
            Self::Unknown => "unknown state",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LlmView {
    Ready { score: String, state: MlState },
    Missing { label: String },
}

async fn reading(
    series: &dyn TimeSeries,
    expr: &str,
    deadline: tokio::time::Instant,
) -> Option<f64> {
    match probe_until(deadline, series.query(expr)).await {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%expr, %error, "live: query failed");
            None
        }
    }
}

pub async fn telemetry_snapshot(
    series: &dyn TimeSeries,
    budget: Duration,
) -> Stamped<TelemetryView> {
    let deadline = tokio::time::Instant::now() + budget;
    let view = match reading(series, BATTERY_QUERY, deadline).await {
        None => TelemetryView::Missing {
            label: "no battery".to_string(),
        },
        Some(battery) => match reading(series, MESSAGE_RATE_QUERY, deadline).await {
            None => TelemetryView::Missing {
                label: "no rate".to_string(),
            },
            Some(rate) => TelemetryView::Ready {
                battery: format!("{battery:.0}%"),
                message_rate: format!("{rate:.2} msg/s"),
            },
        },
    };
    Stamped {
        updated_at: Utc::now(),
        view,
    }
}

pub async fn llm_snapshot(series: &dyn TimeSeries, budget: Duration) -> Stamped<LlmView> {
    let deadline = tokio::time::Instant::now() + budget;
    let view = match reading(series, ANOMALY_SCORE_QUERY, deadline).await {
        None => LlmView::Missing {
            label: "no score".to_string(),
        },
        Some(score) => match reading(series, ML_STATE_QUERY, deadline).await {
            None => LlmView::Missing {
                label: "no state".to_string(),
            },
            Some(state) => LlmView::Ready {
                score: format!("{score:.3}"),
                state: MlState::from_value(state),
            },
        },
    };
    Stamped {
        updated_at: Utc::now(),
        view,
    }
}
