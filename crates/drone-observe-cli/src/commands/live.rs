use super::{CommandContext, verdict};
use crate::render::{render_llm, render_telemetry};
use drone_observe_core::{LIVE_TIMEOUT, LlmView, TelemetryView, llm_snapshot, telemetry_snapshot};

pub fn run_telemetry(context: &CommandContext) -> i32 {
    let (series, _) = match context.collaborators() {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    let snapshot = context.block_on(telemetry_snapshot(&series, LIVE_TIMEOUT));
    let complete = matches!(snapshot.view, TelemetryView::Ready { .. });

    let rendered = context.emit("telemetry", &snapshot, || {
        render_telemetry(&snapshot, &context.palette)
    });
    verdict(rendered, complete)
}

pub fn run_llm(context: &CommandContext) -> i32 {
    let (series, _) = match context.collaborators() {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    let snapshot = context.block_on(llm_snapshot(&series, LIVE_TIMEOUT));
    let complete = matches!(snapshot.view, LlmView::Ready { .. });

    let rendered = context.emit("llm", &snapshot, || render_llm(&snapshot, &context.palette));
    verdict(rendered, complete)
}
