use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "drone-observe",
    about = "drone-observe: read-only checks of the drone telemetry observability pipeline",
    version
)]
pub struct Cli {
    /// Repository root; the metrics contract, dashboards and docs resolve against it
    #[arg(long, global = true, default_value = ".")]
    pub repo_root: String,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable ANSI colour (also honoured via NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: CommandKind,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Control plane: broker, backend /metrics, Prometheus and metric flow
    Health,

    /// Last battery reading and message rate
    Telemetry,

    /// Anomaly model score and alert state
    Llm,

    /// Contract vs Prometheus: every documented metric visible, nothing extra
    Validate,

    /// Edge, broker, backend, Prometheus and Grafana status
    Topology,

    /// Age of the latest samples against warn/fail thresholds
    Freshness,

    /// Contract, backend, dashboard and doc drift, ordered by severity
    Drift,

    /// Observed throughput and cardinality (no benchmarks)
    Limits,
}

impl CommandKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Telemetry => "telemetry",
            Self::Llm => "llm",
            Self::Validate => "validate",
            Self::Topology => "topology",
            Self::Freshness => "freshness",
            Self::Drift => "drift",
            Self::Limits => "limits",
        }
    }
}
