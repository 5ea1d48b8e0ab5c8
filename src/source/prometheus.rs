//! Prometheus HTTP API metrics source.
//!
//! # Responsibilities
//! - Translate (project, filter, window) into PromQL instant queries
//! - Call `/api/v1/query` with the configured timeout
//! - Decode the response envelope into request counts

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::clock::elapsed;
use crate::config::SourceConfig;
use crate::source::types::{QueryError, QueryResult};
use crate::source::MetricsSource;
use crate::verifier::SampleResult;

/// Longest error body kept in a `QueryError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Metrics source backed by a Prometheus-compatible query API.
#[derive(Clone)]
pub struct PrometheusSource {
    client: reqwest::Client,
    endpoint: Url,
    config: SourceConfig,
}

impl PrometheusSource {
    /// Create a source with its own HTTP client.
    pub fn new(config: SourceConfig) -> QueryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("rollout-verifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QueryError::Transport(e.to_string()))?;
        Self::with_client(config, client)
    }

    /// Create a source around an existing client.
    pub fn with_client(config: SourceConfig, client: reqwest::Client) -> QueryResult<Self> {
        let endpoint = query_endpoint(&config.url)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Full URL of the instant query endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the PromQL expression counting requests in the trailing window.
    pub fn build_query(&self, project: &str, filter: &str, window: Duration, errors_only: bool) -> String {
        let mut matchers = Vec::new();

        let filter = filter
            .trim()
            .trim_start_matches('{')
            .trim_end_matches('}')
            .trim();
        if !filter.is_empty() {
            matchers.push(filter.to_string());
        }

        if !self.config.project_label.is_empty() && !project.is_empty() {
            matchers.push(format!(
                "{}=\"{}\"",
                self.config.project_label,
                escape_label_value(project)
            ));
        }

        if errors_only {
            matchers.push(format!("{}=~\"5..\"", self.config.status_label));
        }

        format!(
            "sum(increase({}{{{}}}[{}]))",
            self.config.metric,
            matchers.join(","),
            promql_range(window)
        )
    }

    /// Evaluate an instant query at `at` and sum the resulting samples.
    async fn instant(&self, promql: &str, at: DateTime<Utc>) -> QueryResult<f64> {
        let time = format!("{:.3}", at.timestamp_millis() as f64 / 1000.0);

        tracing::debug!(query = %promql, time = %time, "Querying metrics backend");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("query", promql), ("time", time.as_str())])
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            // Prometheus reports bad queries as 4xx with an error envelope.
            if let Ok(envelope) = serde_json::from_str::<Envelope>(&body) {
                if envelope.status == "error" {
                    return Err(QueryError::Backend {
                        kind: envelope.error_type.unwrap_or_else(|| "unknown".to_string()),
                        message: envelope.error.unwrap_or_default(),
                    });
                }
            }
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        decode_value(&body)
    }

    fn map_transport(&self, e: reqwest::Error) -> QueryError {
        if e.is_timeout() {
            QueryError::Timeout(self.config.timeout)
        } else {
            QueryError::Transport(e.to_string())
        }
    }
}

impl std::fmt::Debug for PrometheusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusSource")
            .field("endpoint", &self.endpoint.as_str())
            .field("metric", &self.config.metric)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[async_trait]
impl MetricsSource for PrometheusSource {
    async fn query(
        &self,
        project: &str,
        filter: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> QueryResult<SampleResult> {
        let window = elapsed(start, end);

        let total = to_count(self.instant(&self.build_query(project, filter, window, false), end).await?)?;
        let mut errors = to_count(self.instant(&self.build_query(project, filter, window, true), end).await?)?;

        // The two queries extrapolate independently and can disagree slightly.
        if errors > total {
            tracing::warn!(total, errors, "Error count above total, clamping");
            errors = total;
        }

        SampleResult::new(total, errors)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    data: Option<Data>,
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(rename = "resultType")]
    result_type: String,
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct VectorSample {
    value: (f64, String),
}

fn query_endpoint(base: &str) -> QueryResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| QueryError::Transport(format!("invalid backend url '{}': {}", base, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.join("api/v1/query")
        .map_err(|e| QueryError::Transport(format!("invalid backend url '{}': {}", base, e)))
}

/// Parse a successful `/api/v1/query` body into a single number.
fn decode_value(body: &str) -> QueryResult<f64> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| QueryError::Decode(e.to_string()))?;

    if envelope.status != "success" {
        return Err(QueryError::Backend {
            kind: envelope.error_type.unwrap_or_else(|| "unknown".to_string()),
            message: envelope.error.unwrap_or_default(),
        });
    }

    let data = envelope
        .data
        .ok_or_else(|| QueryError::Decode("missing data".to_string()))?;

    match data.result_type.as_str() {
        "vector" => {
            let samples: Vec<VectorSample> = serde_json::from_value(data.result)
                .map_err(|e| QueryError::Decode(e.to_string()))?;
            samples
                .iter()
                .map(|s| parse_number(&s.value.1))
                .sum()
        }
        "scalar" => {
            let (_, value): (f64, String) = serde_json::from_value(data.result)
                .map_err(|e| QueryError::Decode(e.to_string()))?;
            parse_number(&value)
        }
        other => Err(QueryError::Decode(format!(
            "unexpected result type '{}'",
            other
        ))),
    }
}

fn parse_number(raw: &str) -> QueryResult<f64> {
    raw.parse::<f64>()
        .map_err(|_| QueryError::Decode(format!("invalid sample value '{}'", raw)))
}

fn to_count(value: f64) -> QueryResult<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(QueryError::Decode(format!("invalid request count {}", value)));
    }
    Ok(value.round() as u64)
}

/// Range selector for `window`: whole seconds as `90s`, otherwise
/// milliseconds as `90500ms`. Never shorter than 1ms.
fn promql_range(window: Duration) -> String {
    let millis = window.as_millis().max(1);
    if millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{}ms", millis)
    }
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
