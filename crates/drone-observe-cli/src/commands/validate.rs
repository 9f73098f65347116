use super::{CommandContext, verdict};
use crate::render::render_check_report;
use drone_observe_core::validate_contract;

pub fn run(context: &CommandContext) -> i32 {
    let (series, network) = match context.collaborators() {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    let layout = context.audit_layout();
    let report = context.block_on(validate_contract(
        &series,
        &network,
        &layout,
        context.phase_budget(),
    ));

    let rendered = context.emit("validate", &report, || {
        render_check_report(
            "validate",
            "Metrics contract vs Prometheus",
            &report,
            &context.palette,
        )
    });
    verdict(rendered, report.ok)
}
