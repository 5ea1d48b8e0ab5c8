//! Rollout Health Verifier
//!
//! Watches the 5xx ratio of a freshly rolled-out service and fails the
//! rollout when the ratio stays above threshold for too long.
//!
//! # Architecture Overview
//!
//! ```text
//!   cli + config file ──▶ VerifierConfig (validated, immutable)
//!                               │
//!                               ▼
//!   ┌──────────────────────── Verifier ────────────────────────┐
//!   │                                                          │
//!   │   deadline = now + time_to_monitor                       │
//!   │   while now < deadline:                                  │
//!   │      [now - window, now] ──▶ MetricsSource ──▶ counts    │
//!   │      counts ──▶ threshold ──▶ violation streak           │
//!   │      streak >= trigger_duration ──▶ Failed               │
//!   │      sleep(sampling_period)                              │
//!   │   Passed                                                 │
//!   └──────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!   exit 0 "Done" | exit 1 failure | exit 1 query error | exit 2 bad config
//! ```

use std::process::ExitCode;

use clap::Parser;

use rollout_verifier::cli::Cli;
use rollout_verifier::observability::{logging, metrics};
use rollout_verifier::{PrometheusSource, Verifier};

/// Exit code for unusable configuration.
const EXIT_CONFIG: u8 = 2;

/// Exit code for a failed rollout or a backend failure.
const EXIT_FAILURE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!("rollout-verifier v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let source = match PrometheusSource::new(config.source.clone()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Invalid metrics backend: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    tracing::debug!(source = ?source, "Metrics source ready");

    let verifier = Verifier::new(config.monitor, source);

    match verifier.run().await {
        Ok(verdict) if verdict.is_passed() => {
            println!("{}", verdict);
            ExitCode::SUCCESS
        }
        Ok(verdict) => {
            eprintln!("Rollout failed: {}", verdict);
            ExitCode::from(verdict.exit_code())
        }
        Err(e) => {
            eprintln!("Failed to query metrics: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
