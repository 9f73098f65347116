pub mod drift;
pub mod freshness;
pub mod health;
pub mod limits;
pub mod live;
pub mod topology;
pub mod validate;

use crate::cli::CommandKind;
use crate::config::Config;
use crate::render::Palette;
use drone_observe_core::{AuditLayout, PhaseBudget};
use drone_observe_http::{HttpNetwork, PrometheusClient};
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

pub type Handler = fn(&CommandContext) -> i32;

impl CommandKind {
    pub fn handler(self) -> Handler {
        match self {
            Self::Health => health::run,
            Self::Telemetry => live::run_telemetry,
            Self::Llm => live::run_llm,
            Self::Validate => validate::run,
            Self::Topology => topology::run,
            Self::Freshness => freshness::run,
            Self::Drift => drift::run,
            Self::Limits => limits::run,
        }
    }
}

/// Everything a handler needs: resolved settings, output mode and the runtime
/// the async checks run on.
pub struct CommandContext {
    pub config: Config,
    pub repo_root: PathBuf,
    pub json: bool,
    pub palette: Palette,
    runtime: tokio::runtime::Runtime,
}

impl CommandContext {
    pub fn new(
        config: Config,
        repo_root: PathBuf,
        json: bool,
        palette: Palette,
    ) -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            repo_root,
            json,
            palette,
            runtime,
        })
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn audit_layout(&self) -> AuditLayout {
        AuditLayout {
            root: self.repo_root.clone(),
            contract_path: PathBuf::from(&self.config.metrics_doc),
            backend_metrics_url: self.config.backend_metrics_url.clone(),
        }
    }

    pub fn phase_budget(&self) -> PhaseBudget {
        PhaseBudget::default()
    }

    /// Concrete collaborators, or the exit code to return when the HTTP
    /// stack cannot be set up.
    pub fn collaborators(&self) -> Result<(PrometheusClient, HttpNetwork), i32> {
        let built = PrometheusClient::new(self.config.prometheus_url.clone())
            .and_then(|series| HttpNetwork::new().map(|network| (series, network)));
        built.map_err(|error| {
            eprintln!("error: {error}");
            EXIT_USAGE
        })
    }

    /// Print `payload` as pretty JSON in `--json` mode, or `text` otherwise.
    pub fn emit<T: Serialize>(
        &self,
        command: &str,
        payload: &T,
        text: impl FnOnce() -> String,
    ) -> i32 {
        if !self.json {
            print!("{}", text());
            return EXIT_OK;
        }
        match serde_json::to_string_pretty(payload) {
            Ok(rendered) => {
                println!("{rendered}");
                EXIT_OK
            }
            Err(error) => {
                eprintln!("error: failed to render {command} payload: {error}");
                EXIT_USAGE
            }
        }
    }
}

/// `EXIT_FAILED` when the check failed, unless rendering already failed.
pub fn verdict(rendered: i32, passed: bool) -> i32 {
    match rendered {
        EXIT_OK if passed => EXIT_OK,
        EXIT_OK => EXIT_FAILED,
        other => other,
    }
}
