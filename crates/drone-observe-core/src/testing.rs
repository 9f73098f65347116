//! In-memory collaborators for unit tests.

use crate::probe::{FetchError, Network, ProbeError, Sample, TimeSeries};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const FIXED_TIMESTAMP: f64 = 1_700_000_000.0;

pub fn refused(url: &str) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        reason: "connection refused".to_string(),
    }
}

#[derive(Default)]
pub struct FakeSeries {
    samples: BTreeMap<String, Sample>,
    failing: BTreeSet<String>,
    hang: bool,
    not_ready: Option<FetchError>,
    calls: AtomicUsize,
}

impl FakeSeries {
    pub fn with(names: &[&str]) -> Self {
        names
            .iter()
            .fold(Self::default(), |series, name| series.value(name, 1.0))
    }

    pub fn value(self, expr: &str, value: f64) -> Self {
        self.sample(expr, value, FIXED_TIMESTAMP)
    }

    pub fn sample(mut self, expr: &str, value: f64, timestamp: f64) -> Self {
        self.samples
            .insert(expr.to_string(), Sample { value, timestamp });
        self
    }

    pub fn failing(mut self, expr: &str) -> Self {
        self.failing.insert(expr.to_string());
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn not_ready(mut self, error: FetchError) -> Self {
        self.not_ready = Some(error);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimeSeries for FakeSeries {
    async fn query_with_timestamp(&self, expr: &str) -> Result<Option<Sample>, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(expr) {
            return Err(ProbeError::Status(500));
        }
        Ok(self.samples.get(expr).copied())
    }

    async fn check_ready(&self) -> Result<(), FetchError> {
        match &self.not_ready {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

pub struct FakeNetwork {
    scrape: Result<String, FetchError>,
    down: BTreeSet<String>,
    broker_down: bool,
    fetches: AtomicUsize,
}

impl FakeNetwork {
    pub fn serving(body: &str) -> Self {
        Self {
            scrape: Ok(body.to_string()),
            down: BTreeSet::new(),
            broker_down: false,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn scrape_failing(url: &str) -> Self {
        Self {
            scrape: Err(refused(url)),
            ..Self::serving("")
        }
    }

    /// `get_ok` against `url` fails with a refused connection.
    pub fn down(mut self, url: &str) -> Self {
        self.down.insert(url.to_string());
        self
    }

    pub fn broker_down(mut self) -> Self {
        self.broker_down = true;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.scrape.clone()
    }

    async fn get_ok(&self, url: &str) -> Result<(), FetchError> {
        if self.down.contains(url) {
            return Err(refused(url));
        }
        Ok(())
    }

    async fn dial(&self, host: &str, port: u16) -> Result<(), FetchError> {
        if self.broker_down {
            return Err(refused(&format!("tcp://{host}:{port}")));
        }
        Ok(())
    }
}

pub fn write_fixture(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dirs should be created");
    }
    fs::write(path, body).expect("fixture should write");
}

/// Minimal contract table with a header and separator row.
pub fn contract_doc(names: &[&str]) -> String {
    let mut doc = String::from("| nombre | tipo |\n|---|---|\n");
    for name in names {
        doc.push_str(&format!("| {name} | gauge |\n"));
    }
    doc
}
