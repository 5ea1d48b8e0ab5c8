//! Command-line surface.
//!
//! Flags override values read from the optional TOML file; everything not
//! given on either falls back to the schema defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::duration::parse_duration;
use crate::config::loader::{read_config, ConfigError};
use crate::config::validation::validate_config;
use crate::config::VerifierConfig;

#[derive(Debug, Parser)]
#[command(name = "rollout-verifier")]
#[command(about = "Watch a rollout's 5xx ratio and fail on sustained violations", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scope identifier passed to the metrics backend.
    #[arg(long)]
    pub project: Option<String>,

    /// Filter expression selecting the rollout's request metrics.
    #[arg(long)]
    pub metric_filter: Option<String>,

    /// Error percentage (0-100) above which a window is unhealthy.
    #[arg(long)]
    pub max_error_percentage: Option<f64>,

    /// Continuous violation span that fails the rollout (e.g. 5m).
    #[arg(long, value_parser = parse_duration)]
    pub trigger_duration: Option<Duration>,

    /// Total time to watch the rollout (e.g. 20m).
    #[arg(long, value_parser = parse_duration)]
    pub time_to_monitor: Option<Duration>,

    /// Delay between samples (e.g. 1m).
    #[arg(long, value_parser = parse_duration)]
    pub sampling_period: Option<Duration>,

    /// Width of each lookback window (e.g. 5m).
    #[arg(long, value_parser = parse_duration)]
    pub sampling_window: Option<Duration>,

    /// Base URL of the Prometheus-compatible query API.
    #[arg(long)]
    pub prometheus_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Read the config file (if any), apply flag overrides, then validate.
    pub fn resolve(&self) -> Result<VerifierConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => VerifierConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overwrite config values with any flags that were given.
    pub fn apply(&self, config: &mut VerifierConfig) {
        let monitor = &mut config.monitor;
        if let Some(project) = &self.project {
            monitor.project = project.clone();
        }
        if let Some(filter) = &self.metric_filter {
            monitor.metric_filter = filter.clone();
        }
        if let Some(pct) = self.max_error_percentage {
            monitor.max_error_percentage = pct;
        }
        if let Some(d) = self.trigger_duration {
            monitor.trigger_duration = d;
        }
        if let Some(d) = self.time_to_monitor {
            monitor.time_to_monitor = d;
        }
        if let Some(d) = self.sampling_period {
            monitor.sampling_period = d;
        }
        if let Some(d) = self.sampling_window {
            monitor.sampling_window = d;
        }
        if let Some(url) = &self.prometheus_url {
            config.source.url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_only() {
        let cli = Cli::try_parse_from([
            "rollout-verifier",
            "--project",
            "checkout",
            "--metric-filter",
            r#"job="api""#,
            "--trigger-duration",
            "90s",
            "--sampling-period",
            "30s",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.monitor.project, "checkout");
        assert_eq!(config.monitor.trigger_duration, Duration::from_secs(90));
        assert_eq!(config.monitor.sampling_period, Duration::from_secs(30));
        assert_eq!(config.monitor.max_error_percentage, 10.0);
        assert_eq!(config.monitor.time_to_monitor, Duration::from_secs(1200));
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut config = crate::config::loader::parse_config(
            r#"
            [monitor]
            project = "from-file"
            metric_filter = 'job="web"'
            max_error_percentage = 5.0
            "#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "rollout-verifier",
            "--max-error-percentage",
            "1.5",
            "--prometheus-url",
            "http://prom:9090",
        ])
        .unwrap();
        cli.apply(&mut config);

        assert_eq!(config.monitor.project, "from-file");
        assert_eq!(config.monitor.max_error_percentage, 1.5);
        assert_eq!(config.source.url, "http://prom:9090");
    }

    #[test]
    fn test_missing_project_fails_validation() {
        let cli = Cli::try_parse_from(["rollout-verifier", "--metric-filter", "x"]).unwrap();
        assert!(matches!(cli.resolve(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_duration_flag_rejected() {
        let result = Cli::try_parse_from(["rollout-verifier", "--sampling-window", "soon"]);
        assert!(result.is_err());
    }
}
