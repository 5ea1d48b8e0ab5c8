//! Outcome of a verification run.

use std::time::Duration;

use crate::config::duration::format_duration;

/// Final decision about a rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The deadline passed without a sustained violation.
    Passed { samples: u64 },

    /// The error ratio stayed above threshold for at least the trigger duration.
    Failed { violation: Duration, samples: u64 },
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Verdict::Passed { .. })
    }

    /// Number of samples evaluated before the decision.
    pub fn samples(&self) -> u64 {
        match self {
            Verdict::Passed { samples } | Verdict::Failed { samples, .. } => *samples,
        }
    }

    /// Process exit code for this verdict.
    pub fn exit_code(&self) -> u8 {
        match self {
            Verdict::Passed { .. } => 0,
            Verdict::Failed { .. } => 1,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Passed { .. } => write!(f, "Done"),
            Verdict::Failed { violation, .. } => write!(
                f,
                "error rate above threshold for {}",
                format_duration(*violation)
            ),
        }
    }
}
