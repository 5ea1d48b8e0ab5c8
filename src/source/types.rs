//! Query error definitions.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while querying the metrics backend.
///
/// Every variant is fatal to a verification run.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Connection or request failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend did not answer within the configured timeout.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered but reported a query failure.
    #[error("backend error ({kind}): {message}")]
    Backend { kind: String, message: String },

    /// The response could not be interpreted.
    #[error("could not decode backend response: {0}")]
    Decode(String),

    /// More error requests than total requests.
    #[error("inconsistent counts: {errors} errors out of {total} requests")]
    InconsistentCounts { total: u64, errors: u64 },
}

/// Result type for metrics queries.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "query timed out after 30s");

        let err = QueryError::Status {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 503: unavailable");

        let err = QueryError::InconsistentCounts { total: 3, errors: 4 };
        assert!(err.to_string().contains("4 errors out of 3"));
    }
}
