//! Per-window request counts and the threshold predicate.

use crate::source::types::{QueryError, QueryResult};

/// Resolution of the threshold: millionths of a percent.
const PERCENT_SCALE: u128 = 1_000_000;

/// Aggregated request counts for one sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleResult {
    total_requests: u64,
    error_requests: u64,
}

impl SampleResult {
    /// Build a sample, rejecting more errors than requests.
    pub fn new(total_requests: u64, error_requests: u64) -> QueryResult<Self> {
        if error_requests > total_requests {
            return Err(QueryError::InconsistentCounts {
                total: total_requests,
                errors: error_requests,
            });
        }
        Ok(Self {
            total_requests,
            error_requests,
        })
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn error_requests(&self) -> u64 {
        self.error_requests
    }

    /// Fraction of 5xx responses, 0 for an empty window.
    pub fn error_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.error_requests as f64 / self.total_requests as f64
    }

    /// Whether this window is healthy under `max_error_percentage`.
    ///
    /// Empty windows are always healthy. A ratio exactly at the threshold is
    /// healthy. The threshold is quantized to millionths of a percent and the
    /// comparison is done in integers, so decimal thresholds such as 0.57
    /// do not round below their true value.
    pub fn is_within(&self, max_error_percentage: f64) -> bool {
        if self.total_requests == 0 {
            return true;
        }
        let scaled_max = (max_error_percentage * PERCENT_SCALE as f64).round() as u128;
        self.error_requests as u128 * 100 * PERCENT_SCALE <= scaled_max * self.total_requests as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(total: u64, errors: u64) -> SampleResult {
        SampleResult::new(total, errors).unwrap()
    }

    #[test]
    fn test_rejects_more_errors_than_total() {
        assert!(matches!(
            SampleResult::new(5, 6),
            Err(QueryError::InconsistentCounts { total: 5, errors: 6 })
        ));
    }

    #[test]
    fn test_error_ratio() {
        assert_eq!(sample(200, 30).error_ratio(), 0.15);
        assert_eq!(sample(0, 0).error_ratio(), 0.0);
    }

    #[test]
    fn test_zero_traffic_is_always_within() {
        for max in [0.0, 0.5, 10.0, 100.0] {
            assert!(sample(0, 0).is_within(max));
        }
    }

    #[test]
    fn test_threshold_predicate() {
        assert!(sample(100, 5).is_within(10.0));
        assert!(!sample(100, 15).is_within(10.0));
        assert!(!sample(1000, 101).is_within(10.0));
        assert!(sample(1000, 99).is_within(10.0));
    }

    #[test]
    fn test_exactly_at_threshold_is_within() {
        assert!(sample(100, 10).is_within(10.0));
        assert!(sample(8, 2).is_within(25.0));
        assert!(!sample(8, 3).is_within(25.0));
    }

    #[test]
    fn test_decimal_threshold_at_boundary_is_within() {
        assert!(sample(10_000, 57).is_within(0.57));
        assert!(!sample(10_000, 58).is_within(0.57));
        for max in [0.07, 0.29, 1.1, 2.3, 4.35] {
            let errors = (max * 100.0_f64).round() as u64;
            assert!(sample(10_000, errors).is_within(max), "max={}", max);
            assert!(!sample(10_000, errors + 1).is_within(max), "max={}", max);
        }
    }

    #[test]
    fn test_zero_max_percentage() {
        assert!(sample(100, 0).is_within(0.0));
        assert!(!sample(100, 1).is_within(0.0));
    }

    #[test]
    fn test_all_errors_at_full_percentage() {
        assert!(sample(10, 10).is_within(100.0));
    }
}
