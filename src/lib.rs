//! Endpoint availability monitor
//!
//! Polls a list of HTTP endpoints on a fixed interval, classifies each
//! check as UP or DOWN and aggregates availability per domain.

pub mod availability;
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod monitor;
pub mod probe;
pub mod report;

pub use availability::{Aggregator, DomainStats};
pub use config::Config;
pub use endpoint::{Endpoint, RequestBody};
pub use errors::{MonitorError, Result};
pub use monitor::{CycleSummary, Monitor};
pub use probe::{HttpProber, Probe, ProbeResult, Status};
pub use report::Reporter;
