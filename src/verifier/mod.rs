//! Rollout verification subsystem.
//!
//! # Data Flow
//! ```text
//! MonitorConfig (immutable)
//!     → engine.rs (polling loop, deadline)
//!     → MetricsSource query for [now - window, now]
//!     → sample.rs (threshold predicate)
//!     → state.rs (violation streak bookkeeping)
//!     → verdict.rs (Passed / Failed), or QueryError
//! ```
//!
//! # Design Decisions
//! - Streaks are anchored to the window end time, not post-query wall time
//! - One healthy sample clears the streak; there is no decay
//! - Zero-traffic windows are healthy
//! - Query failures abort the run without retry

pub mod engine;
pub mod sample;
pub mod state;
pub mod verdict;

pub use engine::Verifier;
pub use sample::SampleResult;
pub use state::VerificationState;
pub use verdict::Verdict;
