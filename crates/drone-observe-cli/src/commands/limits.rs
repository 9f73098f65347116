use super::CommandContext;
use crate::render::render_limits;
use chrono::Utc;
use drone_observe_core::{LIMITS_TIMEOUT, observe_limits};

/// Observation only: the exit code reflects rendering, never the values.
pub fn run(context: &CommandContext) -> i32 {
    let (series, _) = match context.collaborators() {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    let snapshot = context.block_on(observe_limits(&series, Utc::now(), LIMITS_TIMEOUT));
    context.emit("limits", &snapshot, || {
        render_limits(&snapshot, &context.palette)
    })
}
