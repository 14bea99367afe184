//! Default configuration constants for evaluation runs.
//!
//! These values seed [`EvalOptions::default`](crate::eval::EvalOptions) and
//! are referenced from tests to keep expectations consistent.

use std::time::Duration;

// =============================================================================
// Execution Configuration
// =============================================================================

/// Default number of query intents executed concurrently.
///
/// Query execution is network-bound against the search backend, so a small
/// amount of parallelism hides latency without flooding the backend. Runs
/// with few intents simply use fewer workers.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Default per-intent query timeout.
///
/// A query that has not produced a ranked list within this window is
/// recorded as a failed intent; the run continues with the remaining
/// intents.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_concurrency_is_usable() {
        // Zero workers would deadlock the execution stream
        let concurrency = DEFAULT_MAX_CONCURRENCY;
        assert!(concurrency >= 1, "concurrency must allow progress");
    }

    #[test]
    fn test_default_timeout_nonzero() {
        assert!(DEFAULT_QUERY_TIMEOUT > Duration::ZERO);
    }
}
