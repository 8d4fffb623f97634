//! Per-domain availability aggregation

use crate::probe::Status;
use std::collections::BTreeMap;

/// Running check counts for one domain
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub domain: String,
    pub successful: u64,
    pub total: u64,
}

impl DomainStats {
    fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Self::default()
        }
    }

    /// Rounded availability percentage, 0 when nothing was recorded
    pub fn percentage(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }

        (100.0 * self.successful as f64 / self.total as f64).round() as u64
    }
}

/// Accumulates probe outcomes per domain for the lifetime of the monitor
#[derive(Debug, Default)]
pub struct Aggregator {
    domains: BTreeMap<String, DomainStats>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one check of `domain`
    pub fn record(&mut self, domain: &str, status: Status) {
        let stats = self
            .domains
            .entry(domain.to_string())
            .or_insert_with(|| DomainStats::new(domain));

        stats.total += 1;
        if status.is_up() {
            stats.successful += 1;
        }
    }

    /// Availability percentage for `domain`, 0 if it was never checked
    pub fn availability(&self, domain: &str) -> u64 {
        self.domains
            .get(domain)
            .map(DomainStats::percentage)
            .unwrap_or(0)
    }

    pub fn stats(&self, domain: &str) -> Option<&DomainStats> {
        self.domains.get(domain)
    }

    /// All observed domains, ordered by name
    pub fn domains(&self) -> impl Iterator<Item = &DomainStats> {
        self.domains.values()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
