//! The polling loop.
//!
//! # Responsibilities
//! - Sample the metrics source over a trailing window until the deadline
//! - Feed each sample through the threshold predicate and streak state
//! - Stop early on a sustained violation or a query failure

use crate::clock::{rewind, shift, Clock, SystemClock};
use crate::config::duration::format_duration;
use crate::config::MonitorConfig;
use crate::observability::metrics;
use crate::source::{MetricsSource, QueryResult};
use crate::verifier::state::VerificationState;
use crate::verifier::verdict::Verdict;

/// Deployment health verifier.
pub struct Verifier<S, C = SystemClock> {
    config: MonitorConfig,
    source: S,
    clock: C,
}

impl<S: MetricsSource> Verifier<S, SystemClock> {
    /// Create a verifier running on wall-clock time.
    pub fn new(config: MonitorConfig, source: S) -> Self {
        Self::with_clock(config, source, SystemClock)
    }
}

impl<S: MetricsSource, C: Clock> Verifier<S, C> {
    /// Create a verifier with an explicit time source.
    pub fn with_clock(config: MonitorConfig, source: S, clock: C) -> Self {
        Self {
            config,
            source,
            clock,
        }
    }

    /// Run the loop to a verdict.
    ///
    /// Returns `Err` as soon as a query fails. A query already in flight when
    /// the deadline passes is allowed to finish; the deadline is only checked
    /// between samples.
    pub async fn run(&self) -> QueryResult<Verdict> {
        let config = &self.config;
        let deadline = shift(self.clock.now(), config.time_to_monitor);
        let mut state = VerificationState::new();

        tracing::info!(
            project = %config.project,
            filter = %config.metric_filter,
            max_error_percentage = config.max_error_percentage,
            trigger_duration = %format_duration(config.trigger_duration),
            time_to_monitor = %format_duration(config.time_to_monitor),
            sampling_period = %format_duration(config.sampling_period),
            sampling_window = %format_duration(config.sampling_window),
            "Starting rollout verification"
        );

        while self.clock.now() < deadline {
            let end = self.clock.now();
            let start = rewind(end, config.sampling_window);

            let sample = self
                .source
                .query(&config.project, &config.metric_filter, start, end)
                .await
                .inspect_err(|e| {
                    metrics::record_query_failure();
                    tracing::error!(sample = state.sample_index(), error = %e, "Metrics query failed");
                })?;

            metrics::record_sample(&sample);

            let within = sample.is_within(config.max_error_percentage);
            let error_percentage = sample.error_ratio() * 100.0;

            match state.observe(end, within) {
                None => {
                    metrics::record_violation(None);
                    tracing::info!(
                        sample = state.sample_index(),
                        total = sample.total_requests(),
                        errors = sample.error_requests(),
                        error_percentage,
                        "Sample within threshold"
                    );
                }
                Some(violation) => {
                    metrics::record_violation(Some(violation));
                    tracing::warn!(
                        sample = state.sample_index(),
                        total = sample.total_requests(),
                        errors = sample.error_requests(),
                        error_percentage,
                        violation = %format_duration(violation),
                        "Sample above threshold"
                    );

                    if violation >= config.trigger_duration {
                        tracing::error!(
                            violation = %format_duration(violation),
                            trigger_duration = %format_duration(config.trigger_duration),
                            "Error rate above threshold for longer than trigger duration"
                        );
                        return Ok(Verdict::Failed {
                            violation,
                            samples: state.sample_index(),
                        });
                    }
                }
            }

            state.advance();
            self.clock.sleep(config.sampling_period).await;
        }

        let samples = state.sample_index() - 1;
        tracing::info!(samples, "Monitoring deadline reached without sustained violation");
        Ok(Verdict::Passed { samples })
    }
}
