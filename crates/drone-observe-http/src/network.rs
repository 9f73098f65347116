//! Plain GETs and TCP dials behind the core `Network` trait.

use crate::prometheus::ClientBuildError;
use async_trait::async_trait;
use drone_observe_core::probe::{DIAL_TIMEOUT, FetchError, HTTP_TIMEOUT, Network};
use std::time::Duration;
use tokio::net::TcpStream;

#[derive(Debug, Clone)]
pub struct HttpNetwork {
    http: reqwest::Client,
    dial_timeout: Duration,
}

impl HttpNetwork {
    pub fn new() -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            dial_timeout: DIAL_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }

    async fn get_success(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|error| FetchError::Transport {
                url: url.to_string(),
                reason: error.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(%url, "network: fetch");
        self.get_success(url)
            .await?
            .text()
            .await
            .map_err(|error| FetchError::Body {
                url: url.to_string(),
                reason: error.to_string(),
            })
    }

    async fn get_ok(&self, url: &str) -> Result<(), FetchError> {
        tracing::debug!(%url, "network: get");
        self.get_success(url).await.map(drop)
    }

    async fn dial(&self, host: &str, port: u16) -> Result<(), FetchError> {
        let url = format!("tcp://{host}:{port}");
        tracing::debug!(%url, "network: dial");
        match tokio::time::timeout(self.dial_timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(error)) => Err(FetchError::Transport {
                url,
                reason: error.to_string(),
            }),
            Err(_) => Err(FetchError::DeadlineExceeded { url }),
        }
    }
}
