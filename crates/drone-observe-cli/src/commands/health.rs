use super::{CommandContext, verdict};
use crate::render::render_check_report;
use drone_observe_core::{HEALTH_TIMEOUT, check_health};

pub fn run(context: &CommandContext) -> i32 {
    let (series, network) = match context.collaborators() {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    let endpoints = context.config.endpoints();
    let report = context.block_on(check_health(&series, &network, &endpoints, HEALTH_TIMEOUT));

    let rendered = context.emit("health", &report, || {
        render_check_report("health", "Control plane", &report, &context.palette)
    });
    verdict(rendered, report.ok)
}
