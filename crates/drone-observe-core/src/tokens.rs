//! Metric-name candidates in free documentation text.

use crate::contract::IMPLICIT_METRIC_UP;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn word_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+").expect("word-run regex must compile"))
}

/// A word run is a candidate when it is a lowercase-leading identifier made of
/// lowercase letters, digits and underscores.
fn is_identifier(run: &str) -> bool {
    let mut bytes = run.bytes();
    matches!(bytes.next(), Some(b'a'..=b'z'))
        && bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Kept tokens: `up`, or anything containing an underscore. Prose words fall out.
fn looks_like_metric(token: &str) -> bool {
    token == IMPLICIT_METRIC_UP || token.contains('_')
}

/// De-duplicated, sorted metric-style tokens found in `text`.
///
/// Tokens are whole ASCII word runs: `Drone_total` and `x-ray_total` only
/// contribute `ray_total`, never a fragment of a longer run.
pub fn extract_metric_tokens(text: &str) -> Vec<String> {
    word_run_re()
        .find_iter(text)
        .map(|run| run.as_str())
        .filter(|run| is_identifier(run) && looks_like_metric(run))
        .map(ToOwned::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
