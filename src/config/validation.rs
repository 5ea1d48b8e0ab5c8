//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (percentage bounds, positive sampling intervals)
//! - Check the metrics backend URL is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: VerifierConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is handed to the verifier

use std::time::Duration;

use thiserror::Error;

use crate::config::duration::format_duration;
use crate::config::schema::VerifierConfig;

/// Upper bound for every configured duration.
pub const MAX_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("max_error_percentage must be within 0-100, got {0}")]
    PercentageOutOfRange(f64),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{field} of {value} exceeds the maximum of 365 days")]
    TooLong { field: &'static str, value: String },

    #[error("source url '{url}' is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &VerifierConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let monitor = &config.monitor;

    if monitor.project.trim().is_empty() {
        errors.push(ValidationError::Empty("project"));
    }
    if monitor.metric_filter.trim().is_empty() {
        errors.push(ValidationError::Empty("metric_filter"));
    }

    let pct = monitor.max_error_percentage;
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        errors.push(ValidationError::PercentageOutOfRange(pct));
    }

    if monitor.sampling_window.is_zero() {
        errors.push(ValidationError::NotPositive("sampling_window"));
    }
    if monitor.sampling_period.is_zero() {
        errors.push(ValidationError::NotPositive("sampling_period"));
    }
    if config.source.timeout.is_zero() {
        errors.push(ValidationError::NotPositive("source.timeout"));
    }

    for (field, value) in [
        ("trigger_duration", monitor.trigger_duration),
        ("time_to_monitor", monitor.time_to_monitor),
        ("sampling_period", monitor.sampling_period),
        ("sampling_window", monitor.sampling_window),
        ("source.timeout", config.source.timeout),
    ] {
        if value > MAX_DURATION {
            errors.push(ValidationError::TooLong {
                field,
                value: format_duration(value),
            });
        }
    }

    if config.source.metric.trim().is_empty() {
        errors.push(ValidationError::Empty("source.metric"));
    }
    if config.source.status_label.trim().is_empty() {
        errors.push(ValidationError::Empty("source.status_label"));
    }

    match url::Url::parse(&config.source.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            url: config.source.url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            url: config.source.url.clone(),
            reason: e.to_string(),
        }),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
