//! Network adapters for `drone-observe-core`.
//!
//! [`PrometheusClient`] answers instant queries; [`HttpNetwork`] performs
//! scrape fetches, status GETs and broker dials. Both honour the per-call
//! HTTP timeout and leave command-wide deadlines to the caller.

pub mod network;
pub mod prometheus;

pub use network::HttpNetwork;
pub use prometheus::{ClientBuildError, PrometheusClient, parse_instant_response};
