//! Metrics collection and exposition.
//!
//! # Metrics
//! - `verifier_samples_total` (counter): samples evaluated
//! - `verifier_requests_total` (counter): requests seen across windows
//! - `verifier_error_requests_total` (counter): 5xx requests seen across windows
//! - `verifier_error_ratio` (gauge): error ratio of the latest window
//! - `verifier_violation_seconds` (gauge): current streak length, 0 when clear
//! - `verifier_query_failures_total` (counter): failed backend queries
//!
//! Windows overlap when the sampling window exceeds the sampling period, so
//! the request counters are a progress signal, not traffic totals.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::verifier::SampleResult;

/// Serve collected metrics on `addr`. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_sample(sample: &SampleResult) {
    metrics::counter!("verifier_samples_total").increment(1);
    metrics::counter!("verifier_requests_total").increment(sample.total_requests());
    metrics::counter!("verifier_error_requests_total").increment(sample.error_requests());
    metrics::gauge!("verifier_error_ratio").set(sample.error_ratio());
}

pub fn record_violation(violation: Option<Duration>) {
    let secs = violation.map(|d| d.as_secs_f64()).unwrap_or(0.0);
    metrics::gauge!("verifier_violation_seconds").set(secs);
}

pub fn record_query_failure() {
    metrics::counter!("verifier_query_failures_total").increment(1);
}
