//! Rollout Health Verifier Library

pub mod cli;
pub mod clock;
pub mod config;
pub mod observability;
pub mod source;
pub mod verifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MonitorConfig, VerifierConfig};
pub use source::{MetricsSource, PrometheusSource, QueryError};
pub use verifier::{SampleResult, Verdict, Verifier};
