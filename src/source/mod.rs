//! Metrics backend subsystem.
//!
//! # Data Flow
//! ```text
//! Verifier loop
//!     → MetricsSource::query(project, filter, [start, end])
//!     → prometheus.rs (two instant queries: all requests, 5xx requests)
//!     → SampleResult { total_requests, error_requests }
//! ```
//!
//! # Design Decisions
//! - The verifier depends on the trait only; backends are swappable
//! - One query outstanding at a time; no retries at this layer
//! - The backend enforces its own request timeout

pub mod prometheus;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::verifier::SampleResult;

pub use prometheus::PrometheusSource;
pub use types::{QueryError, QueryResult};

/// Answers "how many requests, and how many of them 5xx, matched `filter`
/// in `project` between `start` and `end`".
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn query(
        &self,
        project: &str,
        filter: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> QueryResult<SampleResult>;
}

#[async_trait]
impl<S: MetricsSource + ?Sized> MetricsSource for Arc<S> {
    async fn query(
        &self,
        project: &str,
        filter: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> QueryResult<SampleResult> {
        (**self).query(project, filter, start, end).await
    }
}
