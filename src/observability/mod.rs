//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Verifier loop produces:
//!     → logging.rs (structured log events, one per sample)
//!     → metrics.rs (gauges and counters describing progress)
//!
//! Consumers:
//!     → stderr via the fmt layer
//!     → optional Prometheus scrape endpoint for long runs
//! ```
//!
//! # Design Decisions
//! - RUST_LOG overrides the configured log level
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
