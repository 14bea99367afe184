//! Ranked-list quality metrics.
//!
//! A metric scores one ranked result list against the judgments for one
//! query intent. Metrics are pure functions of their two inputs: no side
//! effects, no state shared across calls, safe to invoke concurrently for
//! different intents. The orchestrator holds the configured metric behind
//! `Arc<dyn RankedListMetric>` and shares it across worker tasks.
//!
//! Implemented metrics:
//! - [`PrecisionAtN`] - fraction of judged-relevant documents among the
//!   judged documents in the top N results
//!
//! The trait leaves room for further metrics (mean average precision, NDCG)
//! without changes to the orchestrator.

mod precision;

pub use precision::PrecisionAtN;

use crate::judgments::IntentJudgments;
use serde::{Deserialize, Serialize};

/// A metric score that is either a defined value or explicitly undefined.
///
/// `Undefined` is a distinguished "no signal" outcome - for Precision@N it
/// means every considered result was unjudged. It is deliberately not
/// represented as NaN so it can never leak into aggregate arithmetic.
///
/// Serializes as a nullable number: `0.5` when defined, `null` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricScore {
    /// A defined score in the metric's range
    Value(f64),
    /// No judged documents contributed; the score carries no signal
    Undefined,
}

impl MetricScore {
    /// Returns the score if defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricScore::Value(v) => Some(*v),
            MetricScore::Undefined => None,
        }
    }

    /// Returns true unless the score is the undefined sentinel.
    pub fn is_defined(&self) -> bool {
        matches!(self, MetricScore::Value(_))
    }
}

/// Outcome of scoring one ranked list against one intent's judgments.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    /// The computed score, or `Undefined` when no judged document was seen
    pub score: MetricScore,
    /// Document ids from the ranked list that carry no judgment, in order
    /// of first occurrence; duplicates returned by the backend are kept
    pub unknown_docs: Vec<String>,
}

/// Capability every ranked-list scoring algorithm satisfies.
///
/// Implementations must be stateless with respect to evaluation:
/// `evaluate` is a pure function of the ranked list and the judgments, and
/// calling it twice with the same inputs yields the same result.
pub trait RankedListMetric: Send + Sync {
    /// Short metric name used in logs and reports (e.g. `"precision@10"`).
    fn name(&self) -> String;

    /// Scores a ranked result list against one intent's judgments.
    ///
    /// # Arguments
    ///
    /// * `ranked` - Document ids exactly as returned by the backend; order
    ///   is significant and must not be re-sorted
    /// * `judgments` - The judged documents for the intent being scored
    fn evaluate(&self, ranked: &[String], judgments: &IntentJudgments) -> MetricResult;
}
