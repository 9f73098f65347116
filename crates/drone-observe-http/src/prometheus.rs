//! Instant-query client for the Prometheus HTTP API.

use async_trait::async_trait;
use drone_observe_core::probe::{FetchError, HTTP_TIMEOUT, ProbeError, Sample, TimeSeries};
use serde::Deserialize;
use serde_json::Value;

const QUERY_PATH: &str = "/api/v1/query";
const READY_PATH: &str = "/-/ready";
const STATUS_SUCCESS: &str = "success";

#[derive(Debug, thiserror::Error)]
#[error("http client setup failed: {0}")]
pub struct ClientBuildError(#[from] reqwest::Error);

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: QueryData,
}

#[derive(Debug, Default, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    value: Vec<Value>,
}

/// Decode an instant-query body into the first sample, if any.
///
/// A body that is not JSON, or a sample whose timestamp is not a number, is an
/// error. A JSON body without a usable first sample (non-success status, empty
/// vector, non-numeric value) is `None`.
pub fn parse_instant_response(body: &str) -> Result<Option<Sample>, ProbeError> {
    let payload: QueryResponse =
        serde_json::from_str(body).map_err(|error| ProbeError::Decode(error.to_string()))?;
    if payload.status != STATUS_SUCCESS {
        return Ok(None);
    }
    let Some(first) = payload.data.result.first() else {
        return Ok(None);
    };
    let [timestamp, value, ..] = first.value.as_slice() else {
        return Ok(None);
    };
    let Some(value) = value.as_str().and_then(|raw| raw.trim().parse::<f64>().ok()) else {
        return Ok(None);
    };
    let timestamp = match timestamp {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|ts| ts.is_finite())
    .ok_or_else(|| {
        ProbeError::Decode(format!("sample timestamp is not a number: {timestamp}"))
    })?;
    Ok(Some(Sample { value, timestamp }))
}

#[derive(Debug, Clone)]
pub struct PrometheusClient {
    base_url: String,
    http: reqwest::Client,
}

impl PrometheusClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TimeSeries for PrometheusClient {
    async fn query_with_timestamp(&self, expr: &str) -> Result<Option<Sample>, ProbeError> {
        tracing::debug!(%expr, base = %self.base_url, "prometheus: instant query");
        let response = self
            .http
            .get(self.url(QUERY_PATH))
            .query(&[("query", expr)])
            .send()
            .await
            .map_err(|error| ProbeError::Transport(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .await
            .map_err(|error| ProbeError::Transport(error.to_string()))?;
        parse_instant_response(&body)
    }

    async fn check_ready(&self) -> Result<(), FetchError> {
        let url = self.url(READY_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|error| FetchError::Transport {
                url: url.clone(),
                reason: error.to_string(),
            })?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
