//! Plain-text rendering. Every renderer returns a `String` so output can be
//! asserted without a terminal.

use drone_observe_core::{
    CheckReport, CheckStatus, DriftReport, FreshnessThresholds, LimitsSnapshot, LlmView, MlState,
    Severity, Signal, Stamped, TelemetryView,
};
use std::fmt::Write as _;

const RULE_WIDTH: usize = 44;

/// ANSI styling, or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn title(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    pub fn ok(&self, text: &str) -> String {
        self.paint("1;32", text)
    }

    pub fn warn(&self, text: &str) -> String {
        self.paint("33", text)
    }

    pub fn fail(&self, text: &str) -> String {
        self.paint("1;31", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn status(&self, status: CheckStatus) -> String {
        match status {
            CheckStatus::Ok => self.ok("OK"),
            CheckStatus::Warn => self.warn("WARN"),
            CheckStatus::Silent => self.warn("SILENT"),
            CheckStatus::Fail => self.fail("FAIL"),
        }
    }

    pub fn severity(&self, severity: Severity) -> String {
        match severity {
            Severity::High => self.fail("HIGH"),
            Severity::Medium => self.warn("MEDIUM"),
            Severity::Low => self.dim("LOW"),
        }
    }
}

fn header(out: &mut String, palette: &Palette, command: &str, subtitle: &str) {
    let _ = writeln!(out, "{}", palette.title(&format!("drone-observe {command}")));
    let _ = writeln!(out, "{}", palette.dim(subtitle));
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
}

fn with_detail(line: String, detail: &str) -> String {
    if detail.is_empty() {
        line
    } else {
        format!("{line} ({detail})")
    }
}

/// Health and validate: a verdict line, then one line per item.
pub fn render_check_report(
    command: &str,
    subtitle: &str,
    report: &CheckReport,
    palette: &Palette,
) -> String {
    let mut out = String::new();
    header(&mut out, palette, command, subtitle);
    let verdict = if report.ok {
        palette.ok("Result: OK")
    } else {
        palette.fail("Result: FAIL")
    };
    let _ = writeln!(out, "{verdict}");
    for item in &report.items {
        let line = format!("{}  {}", palette.status(item.status), item.name);
        let _ = writeln!(out, "{}", with_detail(line, &item.detail));
    }
    out
}

pub fn render_topology(report: &CheckReport, palette: &Palette) -> String {
    let mut out = String::new();
    header(&mut out, palette, "topology", "System topology");
    let last = report.items.len().saturating_sub(1);
    for (index, item) in report.items.iter().enumerate() {
        let branch = if index == last { "`-" } else { "|-" };
        let line = format!(
            "{branch} {:<12} {}",
            item.name,
            palette.status(item.status)
        );
        let _ = writeln!(out, "{}", with_detail(line, &item.detail));
    }
    out
}

pub fn render_drift(report: &DriftReport, palette: &Palette) -> String {
    let mut out = String::new();
    header(&mut out, palette, "drift", "Technical drift");
    if report.accepted() {
        let _ = writeln!(out, "{}", palette.ok("No drift detected"));
        return out;
    }
    for finding in &report.findings {
        let _ = writeln!(
            out,
            "{} {} - {}",
            palette.severity(finding.severity),
            finding.item,
            finding.detail
        );
    }
    let _ = writeln!(
        out,
        "{}",
        palette.dim(&format!(
            "high={} medium={} low={}",
            report.summary.high, report.summary.medium, report.summary.low
        ))
    );
    out
}

pub fn render_freshness(
    signals: &[Signal],
    thresholds: FreshnessThresholds,
    palette: &Palette,
) -> String {
    let mut out = String::new();
    header(
        &mut out,
        palette,
        "freshness",
        &format!(
            "Thresholds: warn={}s, fail={}s",
            thresholds.warn_sec, thresholds.fail_sec
        ),
    );
    let _ = writeln!(out, "{:<15} {:<13} Status", "Signal", "Last sample");
    for signal in signals {
        let age = match signal.age_seconds {
            Some(age) => format!("{age}s ago"),
            None => signal.detail.clone(),
        };
        let _ = writeln!(
            out,
            "{:<15} {:<13} {}",
            signal.name,
            age,
            palette.status(signal.status)
        );
    }
    out
}

fn count_or_na(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.precision$}"))
}

pub fn render_limits(snapshot: &LimitsSnapshot, palette: &Palette) -> String {
    let mut out = String::new();
    header(&mut out, palette, "limits", "Observed limits (no benchmark)");
    let rows = [
        ("Messages per second", count_or_na(snapshot.message_rate, 2)),
        ("Series observed", count_or_na(snapshot.series_count, 0)),
        ("Metric names", count_or_na(snapshot.metric_name_count, 0)),
        (
            "Last scrape (age)",
            snapshot
                .scrape_age_seconds
                .map_or_else(|| "N/A".to_string(), |age| format!("{age}s")),
        ),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<21} {value}");
    }
    out
}

fn stamp_line(updated_at: &chrono::DateTime<chrono::Utc>, palette: &Palette) -> String {
    palette.dim(&format!(
        "Last update: {}",
        updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ))
}

pub fn render_telemetry(snapshot: &Stamped<TelemetryView>, palette: &Palette) -> String {
    let mut out = String::new();
    header(&mut out, palette, "telemetry", "Live telemetry");
    match &snapshot.view {
        TelemetryView::Ready {
            battery,
            message_rate,
        } => {
            let _ = writeln!(out, "Battery       {battery}");
            let _ = writeln!(out, "Message rate  {message_rate}");
        }
        TelemetryView::Missing { label } => {
            let _ = writeln!(out, "{}", palette.fail(label));
        }
    }
    let _ = writeln!(out, "{}", stamp_line(&snapshot.updated_at, palette));
    out
}

fn ml_state(state: MlState, palette: &Palette) -> (String, String) {
    let paint = |text: &str| match state {
        MlState::Ok => palette.ok(text),
        MlState::Crit => palette.fail(text),
        MlState::Warn | MlState::Unknown => palette.warn(text),
    };
    (paint(state.label()), paint(state.alert()))
}

pub fn render_llm(snapshot: &Stamped<LlmView>, palette: &Palette) -> String {
    let mut out = String::new();
    header(&mut out, palette, "llm", "Anomaly model");
    match &snapshot.view {
        LlmView::Ready { score, state } => {
            let (label, alert) = ml_state(*state, palette);
            let _ = writeln!(out, "Score  {score}");
            let _ = writeln!(out, "State  {label}");
            let _ = writeln!(out, "Alert  {alert}");
        }
        LlmView::Missing { label } => {
            let _ = writeln!(out, "{}", palette.fail(label));
        }
    }
    let _ = writeln!(out, "{}", stamp_line(&snapshot.updated_at, palette));
    out
}
