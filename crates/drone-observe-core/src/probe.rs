//! Collaborator seams: the time-series backend and raw network access.
//!
//! "No data" is `Ok(None)`, never a zero value. Transport failures, non-2xx
//! statuses and malformed payloads are errors. A deadline elapsing is its own
//! variant but callers report it exactly like a transport failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call HTTP timeout.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(3);
/// TCP dial timeout for broker reachability.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(2);

/// One instant-query sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub value: f64,
    /// Epoch seconds as reported by the backend.
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("query transport failed: {0}")]
    Transport(String),

    #[error("query returned http status {0}")]
    Status(u16),

    #[error("query payload malformed: {0}")]
    Decode(String),

    #[error("query deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{url}: transport failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url}: http status {status}")]
    Status { url: String, status: u16 },

    #[error("{url}: body read failed: {reason}")]
    Body { url: String, reason: String },

    #[error("{url}: deadline exceeded")]
    DeadlineExceeded { url: String },
}

/// Instant queries against the time-series backend.
#[async_trait]
pub trait TimeSeries: Send + Sync {
    /// Most recent sample for `expr`, or `None` when the backend has no data.
    async fn query_with_timestamp(&self, expr: &str) -> Result<Option<Sample>, ProbeError>;

    /// Most recent value for `expr`, or `None` when the backend has no data.
    async fn query(&self, expr: &str) -> Result<Option<f64>, ProbeError> {
        Ok(self
            .query_with_timestamp(expr)
            .await?
            .map(|sample| sample.value))
    }

    /// Readiness endpoint must answer 200.
    async fn check_ready(&self) -> Result<(), FetchError>;
}

/// Plain HTTP GETs and TCP dials.
#[async_trait]
pub trait Network: Send + Sync {
    /// Body of a 2xx response.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Succeeds on any 2xx response; the body is discarded.
    async fn get_ok(&self, url: &str) -> Result<(), FetchError>;

    /// Open and immediately close a TCP connection.
    async fn dial(&self, host: &str, port: u16) -> Result<(), FetchError>;
}

/// Run `fut` until `deadline`, mapping expiry to [`ProbeError::DeadlineExceeded`].
pub async fn probe_until<T>(
    deadline: tokio::time::Instant,
    fut: impl std::future::Future<Output = Result<T, ProbeError>>,
) -> Result<T, ProbeError> {
    tokio::time::timeout_at(deadline, fut)
        .await
        .unwrap_or(Err(ProbeError::DeadlineExceeded))
}

/// Run `fut` for at most `budget`, mapping expiry to [`FetchError::DeadlineExceeded`].
pub async fn fetch_within<T>(
    budget: Duration,
    url: &str,
    fut: impl std::future::Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    tokio::time::timeout(budget, fut)
        .await
        .unwrap_or_else(|_| {
            Err(FetchError::DeadlineExceeded {
                url: url.to_string(),
            })
        })
}

/// Run `fut` until a shared command `deadline`.
pub async fn fetch_until<T>(
    deadline: tokio::time::Instant,
    url: &str,
    fut: impl std::future::Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    tokio::time::timeout_at(deadline, fut)
        .await
        .unwrap_or_else(|_| {
            Err(FetchError::DeadlineExceeded {
                url: url.to_string(),
            })
        })
}
