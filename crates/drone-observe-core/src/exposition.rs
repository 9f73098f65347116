//! Metric names in plain-text exposition format.

use crate::contract::Contract;
use std::collections::BTreeSet;

/// Distinct metric names in `body`, sorted.
///
/// Blank lines and `#` lines (HELP/TYPE metadata) are skipped. The name is
/// everything before the first space or `{`, so label variants of one series
/// collapse into a single entry.
pub fn parse_exposition(body: &str) -> Vec<String> {
    let mut names = BTreeSet::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let name = match line.find([' ', '{']) {
            Some(idx) if idx > 0 => &line[..idx],
            _ => line,
        };
        names.insert(name.to_string());
    }
    names.into_iter().collect()
}

/// Names in `observed` that the contract does not allow (`up` is implicit).
/// Keeps the order of `observed`, which is sorted when it comes from
/// [`parse_exposition`].
pub fn unexpected_metrics(contract: &Contract, observed: &[String]) -> Vec<String> {
    let allowed = contract.allowed();
    observed
        .iter()
        .filter(|name| !allowed.contains(name.as_str()))
        .cloned()
        .collect()
}
