//! Error types for lodestone-core.
//!
//! Two families of errors exist: [`EvalError`] covers construction-time and
//! run-level failures that abort before or escalate out of an evaluation
//! run, while [`QueryExecutionError`] covers per-intent query failures that
//! are recorded in the report and never abort the run on their own.

use crate::judgments::Rating;
use std::time::Duration;
use thiserror::Error;

/// Errors that abort building evaluation inputs or the run as a whole.
///
/// Construction-time variants (`MalformedJudgment`, `InvalidConfiguration`,
/// `MalformedSpecification`, `DuplicateSpecId`, `NoIntentsConfigured`) fire
/// before any query is executed. `AllIntentsFailed` is the only variant
/// raised after execution, when no intent produced a ranked list.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    /// The same (intent, document) pair was judged with two different ratings
    #[error("conflicting ratings for document '{doc_id}' in intent {intent_id}: {existing:?} vs {conflicting:?}")]
    MalformedJudgment {
        /// Intent the conflicting judgments belong to
        intent_id: u64,
        /// Document judged twice with different labels
        doc_id: String,
        /// Rating seen first
        existing: Rating,
        /// Rating that contradicts it
        conflicting: Rating,
    },
    /// Metric or run parameters are invalid (e.g. Precision@N with n = 0)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A query specification is missing required parts
    #[error("malformed specification: {0}")]
    MalformedSpecification(String),
    /// Two rated requests in one run share a specification id
    #[error("duplicate spec id {0} in evaluation run")]
    DuplicateSpecId(u64),
    /// The evaluation run was started with no query intents
    #[error("no query intents configured")]
    NoIntentsConfigured,
    /// Every configured intent failed query execution
    #[error("all {0} query intents failed execution")]
    AllIntentsFailed(usize),
}

/// Per-intent query execution failures.
///
/// These are recovered locally: the failing intent is recorded in the
/// report's failure list and the run continues with the remaining intents.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryExecutionError {
    /// The search backend rejected or failed the query
    #[error("backend error: {0}")]
    Backend(String),
    /// The query did not complete within the configured per-intent timeout
    #[error("query timed out after {timeout:?}")]
    TimedOut {
        /// The timeout that was exceeded
        timeout: Duration,
    },
    /// The run was cancelled before this intent's query was dispatched
    #[error("evaluation run cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_judgment_names_both_ratings() {
        let err = EvalError::MalformedJudgment {
            intent_id: 7,
            doc_id: "doc-1".to_string(),
            existing: Rating::Relevant,
            conflicting: Rating::Irrelevant,
        };
        let msg = err.to_string();
        assert!(msg.contains("doc-1"));
        assert!(msg.contains("Relevant"));
        assert!(msg.contains("Irrelevant"));
    }

    #[test]
    fn test_timeout_message_includes_window() {
        let err = QueryExecutionError::TimedOut {
            timeout: Duration::from_secs(5),
        };
        assert!(err.to_string().contains("5s"));
    }
}
