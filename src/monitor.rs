//! Polling loop driving probes, aggregation and reporting

use crate::availability::Aggregator;
use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::probe::Probe;
use crate::report::Reporter;

use std::future::Future;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Sequential endpoint monitor.
///
/// Each cycle probes every endpoint in configuration order, one at a time,
/// records the outcome per domain and reports it. Cycles repeat until the
/// shutdown token is cancelled.
pub struct Monitor<P: Probe> {
    endpoints: Vec<Endpoint>,
    prober: P,
    aggregator: Aggregator,
    reporter: Reporter,
    check_interval: Duration,
    monitor_id: String,
    cycles: u64,
}

/// Counts from a single cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub up: usize,
    pub down: usize,
}

impl<P: Probe> Monitor<P> {
    pub fn new(
        endpoints: Vec<Endpoint>,
        prober: P,
        reporter: Reporter,
        check_interval: Duration,
    ) -> Self {
        Self {
            endpoints,
            prober,
            aggregator: Aggregator::new(),
            reporter,
            check_interval,
            monitor_id: Uuid::new_v4().to_string(),
            cycles: 0,
        }
    }

    pub fn from_config(
        config: &Config,
        endpoints: Vec<Endpoint>,
        prober: P,
        reporter: Reporter,
    ) -> Self {
        Self::new(endpoints, prober, reporter, config.check_interval)
    }

    /// Run cycles until `shutdown` is cancelled.
    ///
    /// The token is checked between cycles only; a cycle that has started
    /// always probes every endpoint.
    #[instrument(skip_all, fields(monitor_id = %self.monitor_id))]
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(
            "Monitoring {} endpoints every {}s",
            self.endpoints.len(),
            self.check_interval.as_secs()
        );

        while !shutdown.is_cancelled() {
            self.run_cycle().await;

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(self.check_interval) => {}
            }
        }

        info!("Shutting down after {} cycles", self.cycles);
        self.reporter.stopped();
    }

    /// Probe every endpoint once, then report availability for all domains
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let mut summary = CycleSummary::default();

        for endpoint in &self.endpoints {
            let result = self.prober.probe(endpoint).await;

            self.aggregator.record(&endpoint.domain(), result.status);
            self.reporter.probe(&endpoint.name, &result);

            if result.status.is_up() {
                summary.up += 1;
            } else {
                summary.down += 1;
            }
        }

        for stats in self.aggregator.domains() {
            self.reporter.availability(stats);
        }

        self.cycles += 1;
        debug!(
            "Cycle {} complete: {} up, {} down",
            self.cycles, summary.up, summary.down
        );

        summary
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }
}

/// Cancel `token` once `signal` fires.
///
/// A signal listener that fails to register leaves the token untouched, so
/// monitoring keeps running and the process falls back to the default
/// interrupt handling.
pub async fn cancel_on_signal<F>(signal: F, token: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Interrupt received, stopping after the current cycle");
            token.cancel();
        }
        Err(e) => error!("Failed to wait for shutdown signal: {}", e),
    }
}
