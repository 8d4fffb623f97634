//! Endpoint monitor binary

use endpoint_monitor::config::load_endpoints;
use endpoint_monitor::monitor::cancel_on_signal;
use endpoint_monitor::{Config, HttpProber, Monitor, Reporter, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    initialize_tracing();

    info!("Starting endpoint monitor v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let endpoints_file = match config.resolve_endpoints_file() {
        Ok(path) => path,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Endpoint file found: {}", endpoints_file.display());

    let endpoints = match load_endpoints(&endpoints_file) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            error!("Failed to load {}: {}", endpoints_file.display(), e);
            std::process::exit(1);
        }
    };

    let prober = HttpProber::new(config.probe_timeout, config.latency_threshold)?;
    let mut monitor = Monitor::from_config(&config, endpoints, prober, Reporter::stdout());

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), shutdown.clone()));

    monitor.run(shutdown).await;

    Ok(())
}

/// Initialize structured logging on stderr; stdout carries the report
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
