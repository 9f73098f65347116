use super::{CommandContext, verdict};
use crate::render::render_topology;
use drone_observe_core::{TOPOLOGY_TIMEOUT, check_topology};

pub fn run(context: &CommandContext) -> i32 {
    let (series, network) = match context.collaborators() {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    let endpoints = context.config.endpoints();
    let report = context.block_on(check_topology(
        &series,
        &network,
        &endpoints,
        TOPOLOGY_TIMEOUT,
    ));

    let rendered = context.emit("topology", &report, || {
        render_topology(&report, &context.palette)
    });
    verdict(rendered, report.ok)
}
