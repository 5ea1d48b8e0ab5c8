//! Violation streak state machine.
//!
//! # States
//! - Clear: last sample was within threshold (`violation_start == None`)
//! - Violating: every sample since `violation_start` exceeded the threshold
//!
//! # State Transitions
//! ```text
//! Clear → Violating: unhealthy sample, streak anchored at its window end
//! Violating → Violating: unhealthy sample, span = end - violation_start
//! any → Clear: one healthy sample (hard reset, no decay)
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::elapsed;

/// Loop-owned bookkeeping for a single verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationState {
    sample_index: u64,
    violation_start: Option<DateTime<Utc>>,
}

impl VerificationState {
    pub fn new() -> Self {
        Self {
            sample_index: 1,
            violation_start: None,
        }
    }

    /// 1-based index of the sample about to be taken.
    pub fn sample_index(&self) -> u64 {
        self.sample_index
    }

    /// End time of the first sample in the current streak.
    pub fn violation_start(&self) -> Option<DateTime<Utc>> {
        self.violation_start
    }

    /// Record the outcome of the sample whose window ended at `end`.
    ///
    /// Returns the current violation span when the sample was unhealthy.
    pub fn observe(&mut self, end: DateTime<Utc>, within: bool) -> Option<Duration> {
        if within {
            if self.violation_start.take().is_some() {
                tracing::info!(sample = self.sample_index, "Violation streak cleared");
            }
            return None;
        }

        let start = *self.violation_start.get_or_insert(end);
        Some(elapsed(start, end))
    }

    /// Move on to the next sample.
    pub fn advance(&mut self) {
        self.sample_index += 1;
    }
}

impl Default for VerificationState {
    fn default() -> Self {
        Self::new()
    }
}
