//! Configuration management and endpoint file loading

use crate::endpoint::Endpoint;
use crate::errors::{MonitorError, Result};
use crate::probe::{DEFAULT_LATENCY_THRESHOLD, DEFAULT_PROBE_TIMEOUT};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Explicit endpoint file; discovered in `search_dir` when unset
    pub endpoints_file: Option<PathBuf>,

    /// Directory scanned for the first YAML file
    pub search_dir: PathBuf,

    /// Delay between polling cycles
    pub check_interval: Duration,

    /// Per-request timeout
    pub probe_timeout: Duration,

    /// Responses at or above this latency count as DOWN
    pub latency_threshold: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints_file: None,
            search_dir: PathBuf::from("."),
            check_interval: Duration::from_secs(15),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            latency_threshold: DEFAULT_LATENCY_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(file) = lookup("ENDPOINTS_FILE") {
            if !file.trim().is_empty() {
                config.endpoints_file = Some(PathBuf::from(file));
            }
        }

        if let Some(dir) = lookup("ENDPOINTS_DIR") {
            config.search_dir = PathBuf::from(dir);
        }

        if let Some(interval) = lookup("CHECK_INTERVAL_SECONDS") {
            if let Ok(seconds) = interval.parse::<u64>() {
                config.check_interval = Duration::from_secs(seconds);
            }
        }

        if let Some(timeout) = lookup("PROBE_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse::<u64>() {
                config.probe_timeout = Duration::from_millis(ms);
            }
        }

        if let Some(threshold) = lookup("LATENCY_THRESHOLD_MS") {
            if let Ok(ms) = threshold.parse::<u64>() {
                config.latency_threshold = Duration::from_millis(ms);
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.check_interval.is_zero() {
            return Err("check_interval must be greater than 0".to_string());
        }

        if self.probe_timeout.is_zero() {
            return Err("probe_timeout must be greater than 0".to_string());
        }

        if self.latency_threshold.is_zero() {
            return Err("latency_threshold must be greater than 0".to_string());
        }

        Ok(())
    }

    /// The endpoint file to load: the explicit one, or the first YAML file
    /// in the search directory
    pub fn resolve_endpoints_file(&self) -> Result<PathBuf> {
        match &self.endpoints_file {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => Err(MonitorError::Config(format!(
                "endpoint file {} does not exist",
                path.display()
            ))),
            None => find_yaml_file(&self.search_dir),
        }
    }
}

/// First `.yaml`/`.yml` file in `dir`, by file name
pub fn find_yaml_file(dir: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
                })
        })
        .collect();

    candidates.sort();

    candidates.into_iter().next().ok_or_else(|| {
        MonitorError::Config(format!("No YAML file found in {}", dir.display()))
    })
}

/// Parse a YAML endpoint list.
///
/// Endpoints are keyed by name: a repeated name replaces the earlier
/// definition in place.
pub fn parse_endpoints(contents: &str) -> Result<Vec<Endpoint>> {
    if contents.trim().is_empty() {
        return Err(MonitorError::Config("endpoint file is empty".to_string()));
    }

    let definitions: Vec<Endpoint> = serde_yaml::from_str(contents)?;

    let mut endpoints: Vec<Endpoint> = Vec::with_capacity(definitions.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for endpoint in definitions {
        endpoint.validate()?;

        match positions.get(&endpoint.name) {
            Some(&index) => {
                warn!(
                    "Endpoint '{}' is defined more than once, using the last definition",
                    endpoint.name
                );
                endpoints[index] = endpoint;
            }
            None => {
                positions.insert(endpoint.name.clone(), endpoints.len());
                endpoints.push(endpoint);
            }
        }
    }

    if endpoints.is_empty() {
        return Err(MonitorError::Config("endpoint list is empty".to_string()));
    }

    Ok(endpoints)
}

/// Read and parse the endpoint file at `path`
pub fn load_endpoints(path: &Path) -> Result<Vec<Endpoint>> {
    let contents = std::fs::read_to_string(path)?;
    let endpoints = parse_endpoints(&contents)?;
    debug!("Loaded {} endpoints from {}", endpoints.len(), path.display());
    Ok(endpoints)
}
