use super::{CommandContext, verdict};
use crate::render::render_drift;
use drone_observe_core::DriftAuditor;

pub fn run(context: &CommandContext) -> i32 {
    let (series, network) = match context.collaborators() {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    let auditor = DriftAuditor::new(&series, &network, context.audit_layout())
        .with_budget(context.phase_budget());
    let report = context.block_on(auditor.report());
    tracing::debug!(findings = report.findings.len(), "drift: audit finished");

    let rendered = context.emit("drift", &report, || render_drift(&report, &context.palette));
    verdict(rendered, report.accepted())
}
