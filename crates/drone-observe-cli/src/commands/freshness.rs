use super::{CommandContext, verdict};
use crate::render::render_freshness;
use chrono::Utc;
use drone_observe_core::{CheckStatus, FRESHNESS_TIMEOUT, check_freshness};
use serde_json::json;

pub fn run(context: &CommandContext) -> i32 {
    let (series, _) = match context.collaborators() {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    let thresholds = context.config.freshness;
    let signals = context.block_on(check_freshness(
        &series,
        thresholds,
        Utc::now(),
        FRESHNESS_TIMEOUT,
    ));
    let passed = signals
        .iter()
        .all(|signal| signal.status != CheckStatus::Fail);

    let payload = json!({
        "warnSec": thresholds.warn_sec,
        "failSec": thresholds.fail_sec,
        "signals": signals,
    });
    let rendered = context.emit("freshness", &payload, || {
        render_freshness(&signals, thresholds, &context.palette)
    });
    verdict(rendered, passed)
}
