//! Metrics contract: the markdown table of metric names a deployment promises
//! to expose.
//!
//! Only pipe-delimited rows matter. The second column is the metric name;
//! header and separator rows are skipped. Document order is preserved and
//! duplicates are kept, so membership tests go through [`Contract::allowed`].

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONTRACT_PATH: &str = "METRICS.md";

/// Name the time-series backend adds to every scrape target. Always allowed.
pub const IMPLICIT_METRIC_UP: &str = "up";

const HEADER_LITERALS: [&str; 2] = ["nombre", "name"];
const SEPARATOR_PREFIX: &str = "---";
const PARENT_ASCENTS: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("contract {path} not found in known locations ({})", display_paths(.tried))]
    Unreadable {
        path: String,
        tried: Vec<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("contract {}: read failed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    names: Vec<String>,
    source: PathBuf,
}

impl Contract {
    pub fn new(names: Vec<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            names,
            source: source.into(),
        }
    }

    /// Contracted names in document order, duplicates included.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Path the contract was actually read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Contracted names plus the implicit `up`.
    pub fn allowed(&self) -> BTreeSet<&str> {
        let mut allowed: BTreeSet<&str> = self.names.iter().map(String::as_str).collect();
        allowed.insert(IMPLICIT_METRIC_UP);
        allowed
    }
}

/// Candidate locations for `path`: as given, then up to two parents of `base`.
pub fn candidate_paths(base: &Path, path: &Path) -> Vec<PathBuf> {
    if path.is_absolute() {
        return vec![path.to_path_buf()];
    }
    let mut out = Vec::with_capacity(PARENT_ASCENTS + 1);
    let mut prefix = base.to_path_buf();
    out.push(prefix.join(path));
    for _ in 0..PARENT_ASCENTS {
        prefix = prefix.join("..");
        out.push(prefix.join(path));
    }
    out
}

/// Extract contracted metric names from table rows in `text`.
pub fn parse_contract(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with('|') {
            continue;
        }
        let Some(column) = line.split('|').nth(1) else {
            continue;
        };
        let name = column.trim();
        if name.is_empty()
            || HEADER_LITERALS.contains(&name)
            || name.starts_with(SEPARATOR_PREFIX)
        {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

/// Read the contract at `path`, resolved against `base` and its parents.
pub fn read_contract(base: &Path, path: &Path) -> Result<Contract, ContractError> {
    let tried = candidate_paths(base, path);
    let mut last_error = None;
    for candidate in &tried {
        match File::open(candidate) {
            Ok(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)
                    .map_err(|source| ContractError::Io {
                        path: candidate.clone(),
                        source,
                    })?;
                let names = parse_contract(&String::from_utf8_lossy(&bytes));
                tracing::debug!(
                    path = %candidate.display(),
                    metrics = names.len(),
                    "metrics contract loaded"
                );
                return Ok(Contract::new(names, candidate.clone()));
            }
            Err(error) => last_error = Some(error),
        }
    }
    Err(ContractError::Unreadable {
        path: path.display().to_string(),
        tried,
        source: last_error
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no candidate paths")),
    })
}
