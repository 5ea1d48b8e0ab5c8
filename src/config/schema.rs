//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the verifier.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a verification run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VerifierConfig {
    /// Threshold and timing policy for the polling loop.
    pub monitor: MonitorConfig,

    /// Metrics backend connection settings.
    pub source: SourceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Monitoring policy. Immutable for the lifetime of a run.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Scope identifier passed to the metrics backend.
    pub project: String,

    /// Opaque filter expression understood by the backend.
    pub metric_filter: String,

    /// Error percentage (0-100) above which a window is unhealthy.
    pub max_error_percentage: f64,

    /// Minimum continuous violation span before the rollout fails.
    #[serde(with = "crate::config::duration")]
    pub trigger_duration: Duration,

    /// Total observation deadline.
    #[serde(with = "crate::config::duration")]
    pub time_to_monitor: Duration,

    /// Delay between samples.
    #[serde(with = "crate::config::duration")]
    pub sampling_period: Duration,

    /// Width of each lookback interval.
    #[serde(with = "crate::config::duration")]
    pub sampling_window: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            metric_filter: String::new(),
            max_error_percentage: 10.0,
            trigger_duration: Duration::from_secs(5 * 60),
            time_to_monitor: Duration::from_secs(20 * 60),
            sampling_period: Duration::from_secs(60),
            sampling_window: Duration::from_secs(5 * 60),
        }
    }
}

/// Prometheus-compatible metrics backend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the query API (e.g., "http://localhost:9090").
    pub url: String,

    /// Per-query HTTP timeout.
    #[serde(with = "crate::config::duration")]
    pub timeout: Duration,

    /// Request counter to aggregate.
    pub metric: String,

    /// Label holding the HTTP status code.
    pub status_label: String,

    /// Label matched against `monitor.project`. Empty disables project scoping.
    pub project_label: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9090".to_string(),
            timeout: Duration::from_secs(30),
            metric: "http_requests_total".to_string(),
            status_label: "code".to_string(),
            project_label: "project".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Expose verifier progress on a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9464".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.max_error_percentage, 10.0);
        assert_eq!(config.trigger_duration, Duration::from_secs(300));
        assert_eq!(config.time_to_monitor, Duration::from_secs(1200));
        assert_eq!(config.sampling_period, Duration::from_secs(60));
        assert_eq!(config.sampling_window, Duration::from_secs(300));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: VerifierConfig = toml::from_str(
            r#"
            [monitor]
            project = "checkout"
            metric_filter = 'job="api"'
            trigger_duration = "90s"
            sampling_period = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.monitor.project, "checkout");
        assert_eq!(config.monitor.metric_filter, r#"job="api""#);
        assert_eq!(config.monitor.trigger_duration, Duration::from_secs(90));
        assert_eq!(config.monitor.sampling_period, Duration::from_secs(15));
        assert_eq!(config.monitor.time_to_monitor, Duration::from_secs(1200));
        assert_eq!(config.source, SourceConfig::default());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_bad_duration_is_parse_error() {
        let result: Result<VerifierConfig, _> = toml::from_str(
            r#"
            [monitor]
            sampling_window = "five minutes"
            "#,
        );
        assert!(result.is_err());
    }
}
