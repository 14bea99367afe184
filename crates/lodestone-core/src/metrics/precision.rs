//! Precision@N: precision over the judged documents in the top N results.

use super::{MetricResult, MetricScore, RankedListMetric};
use crate::error::EvalError;
use crate::judgments::IntentJudgments;
use tracing::trace;

/// Precision at N, N being the number of top results to examine.
///
/// Walks the first `min(n, len)` entries of the ranked list and counts how
/// many are judged relevant (`good`) versus judged irrelevant (`bad`);
/// documents without a judgment are excluded from the ratio and reported
/// back by id. The score is `good / (good + bad)`.
///
/// When every considered result is unjudged there is no signal to score,
/// and the result is [`MetricScore::Undefined`] - the caller decides
/// whether to exclude the intent from aggregation or report it as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionAtN {
    /// Number of top ranked results to check against the judgments
    n: usize,
}

impl PrecisionAtN {
    /// Creates a Precision@N metric.
    ///
    /// # Errors
    ///
    /// [`EvalError::InvalidConfiguration`] if `n` is zero; a cutoff of zero
    /// results can never produce a meaningful precision.
    pub fn new(n: usize) -> Result<Self, EvalError> {
        if n == 0 {
            return Err(EvalError::InvalidConfiguration(
                "precision cutoff n must be positive".to_string(),
            ));
        }
        Ok(Self { n })
    }

    /// Returns the configured cutoff.
    pub fn n(&self) -> usize {
        self.n
    }
}

impl RankedListMetric for PrecisionAtN {
    fn name(&self) -> String {
        format!("precision@{}", self.n)
    }

    fn evaluate(&self, ranked: &[String], judgments: &IntentJudgments) -> MetricResult {
        let relevant = judgments.relevant_ids();
        let irrelevant = judgments.irrelevant_ids();

        let mut good = 0usize;
        let mut bad = 0usize;
        let mut unknown_docs = Vec::new();

        // Duplicate ids returned by the backend count once per occurrence.
        for doc_id in ranked.iter().take(self.n) {
            if relevant.contains(doc_id) {
                good += 1;
            } else if irrelevant.contains(doc_id) {
                bad += 1;
            } else {
                unknown_docs.push(doc_id.clone());
            }
        }

        let score = if good + bad == 0 {
            MetricScore::Undefined
        } else {
            MetricScore::Value(good as f64 / (good + bad) as f64)
        };
        trace!(good, bad, unknown = unknown_docs.len(), ?score, "precision computed");

        MetricResult {
            score,
            unknown_docs,
        }
    }
}
