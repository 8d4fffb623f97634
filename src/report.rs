//! Line-oriented status report written to the console

use crate::availability::DomainStats;
use crate::probe::ProbeResult;
use std::io::Write;
use tracing::warn;

/// Line for one endpoint check
pub fn format_probe_line(name: &str, result: &ProbeResult) -> String {
    match result.latency_ms {
        Some(latency) => format!("{} - {} (Latency: {} ms)", name, result.status, latency),
        None => format!("{} - {} (No response)", name, result.status),
    }
}

/// Line for one domain's availability
pub fn format_availability_line(stats: &DomainStats) -> String {
    format!(
        "{} has {}% availability percentage",
        stats.domain,
        stats.percentage()
    )
}

/// Writes report lines to an output stream.
///
/// Output failures are logged and otherwise ignored; a broken console must
/// not stop the polling loop.
pub struct Reporter {
    out: Box<dyn Write + Send>,
}

impl Reporter {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn probe(&mut self, name: &str, result: &ProbeResult) {
        self.line(&format_probe_line(name, result));
    }

    pub fn availability(&mut self, stats: &DomainStats) {
        self.line(&format_availability_line(stats));
    }

    pub fn stopped(&mut self) {
        self.line("Monitoring stopped.");
    }

    fn line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!("Failed to write report line: {}", e);
        }
    }
}
