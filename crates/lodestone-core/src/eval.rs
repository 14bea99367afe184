//! Evaluation orchestrator: runs every configured query intent, scores the
//! ranked lists, and aggregates the per-intent scores into a quality report.
//!
//! A run moves through `Pending -> Executing -> Aggregating -> Completed`,
//! with `Failed` reachable from the two middle states. Per-intent query
//! failures (backend errors, timeouts, cancellation) are recorded in the
//! report and never abort the run; only an empty intent set or a run where
//! every intent failed is escalated to the caller.

use crate::backend::SearchBackend;
use crate::config::{DEFAULT_MAX_CONCURRENCY, DEFAULT_QUERY_TIMEOUT};
use crate::error::{EvalError, QueryExecutionError};
use crate::judgments::{JudgmentSet, RatedRequest};
use crate::metrics::{MetricScore, RankedListMetric};
use futures::stream::{self, StreamExt};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Tunable parameters for an evaluation run.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Maximum number of query intents executed concurrently
    pub max_concurrency: usize,
    /// Per-intent query timeout; a timed-out intent is recorded as failed
    pub query_timeout: Duration,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl EvalOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// [`EvalError::InvalidConfiguration`] for zero concurrency or a zero
    /// timeout, both of which would stall every run.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.max_concurrency == 0 {
            return Err(EvalError::InvalidConfiguration(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.query_timeout.is_zero() {
            return Err(EvalError::InvalidConfiguration(
                "query_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cooperative cancellation handle for an in-flight run.
///
/// Cancelling stops the orchestrator from dispatching further queries;
/// already-dispatched queries complete (or time out) normally and their
/// results are still aggregated. Intents that were never dispatched are
/// recorded as failed with [`QueryExecutionError::Cancelled`].
///
/// Clones share the same flag, so a token can be handed to another task
/// and triggered from there.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the run holding this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Lifecycle of one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Pending,
    Executing,
    Aggregating,
    Completed,
    Failed,
}

/// Advances the run state machine, tracing the transition.
fn transition(state: &mut RunState, next: RunState) {
    debug!(from = ?state, to = ?next, "run state transition");
    *state = next;
}

/// Score and unknown-document tracking for one successfully executed intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalResult {
    /// Intent this result belongs to
    pub intent_id: u64,
    /// Specification whose query produced the ranked list
    pub spec_id: u64,
    /// Metric score, or `null` in serialized form when undefined
    pub score: MetricScore,
    /// Ranked documents that carry no judgment, in rank order
    pub unknown_docs: Vec<String>,
}

/// Record of an intent whose query execution did not produce a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentFailure {
    /// Intent whose query failed
    pub intent_id: u64,
    /// Specification that was being executed
    pub spec_id: u64,
    /// Why execution failed
    #[serde(serialize_with = "serialize_error")]
    pub error: QueryExecutionError,
}

fn serialize_error<S: Serializer>(
    error: &QueryExecutionError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Final, immutable outcome of one evaluation run.
///
/// Scored results and failures each preserve the ordering of the supplied
/// request sequence regardless of execution completion order. Serializes
/// to a structured record for downstream reporting tools.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    metric: String,
    results: Vec<EvalResult>,
    failures: Vec<IntentFailure>,
    aggregate: MetricScore,
}

impl QualityReport {
    /// Name of the metric that produced the scores.
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Per-intent results for successfully executed queries, in input order.
    pub fn results(&self) -> &[EvalResult] {
        &self.results
    }

    /// Intents whose query execution failed, in input order.
    pub fn failures(&self) -> &[IntentFailure] {
        &self.failures
    }

    /// Mean of the defined per-intent scores, or `Undefined` if every
    /// scored intent was undefined.
    pub fn aggregate(&self) -> MetricScore {
        self.aggregate
    }
}

/// Drives evaluation runs: executes queries, scores ranked lists, and
/// aggregates per-intent results.
///
/// The backend and metric are shared read-only across worker tasks; an
/// `Evaluator` can run any number of evaluations sequentially or hand out
/// references for concurrent use.
pub struct Evaluator {
    backend: Arc<dyn SearchBackend>,
    metric: Arc<dyn RankedListMetric>,
    options: EvalOptions,
}

impl Evaluator {
    /// Creates an evaluator from a backend, a metric, and run options.
    ///
    /// # Errors
    ///
    /// [`EvalError::InvalidConfiguration`] if the options fail validation.
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        metric: Arc<dyn RankedListMetric>,
        options: EvalOptions,
    ) -> Result<Self, EvalError> {
        options.validate()?;
        Ok(Self {
            backend,
            metric,
            options,
        })
    }

    /// Runs one full evaluation across all supplied query intents.
    ///
    /// Equivalent to [`evaluate_with_cancel`](Self::evaluate_with_cancel)
    /// with a token that is never cancelled.
    pub async fn evaluate(&self, requests: &[RatedRequest]) -> Result<QualityReport, EvalError> {
        self.evaluate_with_cancel(requests, &CancelToken::new())
            .await
    }

    /// Runs one full evaluation, honoring a cancellation token.
    ///
    /// # Errors
    ///
    /// - [`EvalError::NoIntentsConfigured`] for an empty request sequence
    /// - [`EvalError::DuplicateSpecId`] if two requests share a spec id
    /// - [`EvalError::MalformedJudgment`] for conflicting judgments
    /// - [`EvalError::AllIntentsFailed`] if no intent produced a ranked list
    ///
    /// Per-intent execution failures are not errors; they appear in the
    /// report's failure list.
    #[instrument(skip_all, fields(intents = requests.len(), metric = %self.metric.name()))]
    pub async fn evaluate_with_cancel(
        &self,
        requests: &[RatedRequest],
        cancel: &CancelToken,
    ) -> Result<QualityReport, EvalError> {
        let mut state = RunState::Pending;

        // Pending: validate inputs before any query is dispatched
        if requests.is_empty() {
            transition(&mut state, RunState::Failed);
            return Err(EvalError::NoIntentsConfigured);
        }
        let mut seen_specs = HashSet::new();
        for request in requests {
            if !seen_specs.insert(request.spec.spec_id()) {
                transition(&mut state, RunState::Failed);
                return Err(EvalError::DuplicateSpecId(request.spec.spec_id()));
            }
        }
        let judgments = JudgmentSet::from_requests(requests)?;

        // Executing: fan out query execution with bounded concurrency.
        // Each task carries its input index so results can be re-placed in
        // request order no matter when they complete.
        transition(&mut state, RunState::Executing);
        let timeout = self.options.query_timeout;
        let outcomes = stream::iter(requests.iter().enumerate())
            .map(|(index, request)| {
                let backend = Arc::clone(&self.backend);
                let cancel = cancel.clone();
                async move {
                    let outcome = if cancel.is_cancelled() {
                        Err(QueryExecutionError::Cancelled)
                    } else {
                        execute_one(backend.as_ref(), request, timeout).await
                    };
                    (index, outcome)
                }
            })
            .buffer_unordered(self.options.max_concurrency)
            .collect::<Vec<_>>()
            .await;

        // Re-place by original index
        let mut ranked_lists: Vec<Option<Result<Vec<String>, QueryExecutionError>>> =
            vec![None; requests.len()];
        for (index, outcome) in outcomes {
            ranked_lists[index] = Some(outcome);
        }

        let failed = ranked_lists
            .iter()
            .filter(|o| matches!(o, Some(Err(_))))
            .count();
        if failed == requests.len() {
            transition(&mut state, RunState::Failed);
            warn!(intents = failed, "every query intent failed execution");
            return Err(EvalError::AllIntentsFailed(failed));
        }

        // Aggregating: score each ranked list against its intent's judgments
        transition(&mut state, RunState::Aggregating);
        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (request, outcome) in requests.iter().zip(ranked_lists) {
            // Every slot was filled above; the stream yields each index once
            let outcome = outcome.unwrap_or(Err(QueryExecutionError::Cancelled));
            match outcome {
                Ok(ranked) => {
                    let scored = self
                        .metric
                        .evaluate(&ranked, judgments.for_intent(request.intent_id));
                    debug!(
                        intent = request.intent_id,
                        spec = request.spec.spec_id(),
                        score = ?scored.score,
                        unknown = scored.unknown_docs.len(),
                        "intent scored"
                    );
                    results.push(EvalResult {
                        intent_id: request.intent_id,
                        spec_id: request.spec.spec_id(),
                        score: scored.score,
                        unknown_docs: scored.unknown_docs,
                    });
                }
                Err(error) => {
                    warn!(
                        intent = request.intent_id,
                        spec = request.spec.spec_id(),
                        %error,
                        "intent failed execution"
                    );
                    failures.push(IntentFailure {
                        intent_id: request.intent_id,
                        spec_id: request.spec.spec_id(),
                        error,
                    });
                }
            }
        }
        let aggregate = mean_of_defined(results.iter().map(|r| r.score));

        transition(&mut state, RunState::Completed);
        info!(
            scored = results.len(),
            failed = failures.len(),
            aggregate = ?aggregate,
            "evaluation run completed"
        );
        Ok(QualityReport {
            metric: self.metric.name(),
            results,
            failures,
            aggregate,
        })
    }
}

/// Executes one intent's query with the per-intent timeout applied.
async fn execute_one(
    backend: &dyn SearchBackend,
    request: &RatedRequest,
    timeout: Duration,
) -> Result<Vec<String>, QueryExecutionError> {
    match tokio::time::timeout(timeout, backend.execute_query(&request.spec)).await {
        Ok(result) => result,
        Err(_) => Err(QueryExecutionError::TimedOut { timeout }),
    }
}

/// Arithmetic mean of the defined scores; `Undefined` when none are defined.
fn mean_of_defined(scores: impl Iterator<Item = MetricScore>) -> MetricScore {
    let mut sum = 0.0;
    let mut count = 0usize;
    for score in scores {
        if let Some(value) = score.value() {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        MetricScore::Undefined
    } else {
        MetricScore::Value(sum / count as f64)
    }
}
