//! Relevance judgments and per-intent judgment storage.
//!
//! A judgment is a human-assigned [`Rating`] for a (query intent, document)
//! pair. Judgments arrive bundled per intent inside [`RatedRequest`]s and
//! are merged into a [`JudgmentSet`] for the duration of an evaluation run.
//!
//! Absence of a judgment means *unknown*: a document that was never judged
//! is neither relevant nor irrelevant, and lookups return `None` rather
//! than defaulting to either label.

use crate::error::EvalError;
use crate::spec::QuerySpec;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Human-assigned relevance label for a (query intent, document) pair.
///
/// This is a closed set with no "unknown" member. A document without a
/// judgment is unknown by absence, which the judgment store expresses as
/// `Option<Rating>`.
///
/// Serializes as a lowercase string (`"relevant"` / `"irrelevant"`), the
/// form used by judgment files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Document is expected in result sets for this search intent
    Relevant,
    /// Document is unrelated to this search intent
    Irrelevant,
}

/// One query intent to evaluate: an id, the specification describing how to
/// execute its query, and the relevance judgments collected for it.
///
/// The ratings map covers only documents that were actually judged for this
/// intent. Several requests may share an `intent_id` (multiple
/// specifications probing the same information need), but their judgments
/// must agree and their specification ids must be unique within a run.
#[derive(Debug, Clone)]
pub struct RatedRequest {
    /// Identifier of the information need this request evaluates
    pub intent_id: u64,
    /// How to execute this intent's query against the backend
    pub spec: QuerySpec,
    /// Judged documents for this intent; absent keys are unknown
    pub ratings: HashMap<String, Rating>,
}

impl RatedRequest {
    /// Creates a rated request for one query intent.
    pub fn new(intent_id: u64, spec: QuerySpec, ratings: HashMap<String, Rating>) -> Self {
        Self {
            intent_id,
            spec,
            ratings,
        }
    }
}

/// Judgments for a single query intent, with precomputed set views.
///
/// The relevant/irrelevant sets are materialized once at construction so
/// metrics can do set-membership tests without re-filtering the rating map
/// per evaluation. The views partition the judged documents: a document id
/// appears in exactly one of the two sets, or in neither (unknown).
#[derive(Debug, Clone, Default)]
pub struct IntentJudgments {
    ratings: HashMap<String, Rating>,
    relevant: HashSet<String>,
    irrelevant: HashSet<String>,
}

impl IntentJudgments {
    /// Returns the rating for a document, or `None` if it was never judged.
    pub fn lookup(&self, doc_id: &str) -> Option<Rating> {
        self.ratings.get(doc_id).copied()
    }

    /// Documents judged relevant for this intent.
    pub fn relevant_ids(&self) -> &HashSet<String> {
        &self.relevant
    }

    /// Documents judged irrelevant for this intent.
    pub fn irrelevant_ids(&self) -> &HashSet<String> {
        &self.irrelevant
    }

    /// Number of judged documents.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Returns true if no documents were judged for this intent.
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Records one judgment, failing on a conflicting duplicate.
    ///
    /// Re-supplying an identical (document, rating) pair is tolerated;
    /// the same document with a different rating is a
    /// [`EvalError::MalformedJudgment`].
    fn insert(&mut self, intent_id: u64, doc_id: String, rating: Rating) -> Result<(), EvalError> {
        if let Some(existing) = self.ratings.get(&doc_id).copied() {
            if existing != rating {
                return Err(EvalError::MalformedJudgment {
                    intent_id,
                    doc_id,
                    existing,
                    conflicting: rating,
                });
            }
            return Ok(());
        }
        match rating {
            Rating::Relevant => self.relevant.insert(doc_id.clone()),
            Rating::Irrelevant => self.irrelevant.insert(doc_id.clone()),
        };
        self.ratings.insert(doc_id, rating);
        Ok(())
    }
}

/// All relevance judgments for one evaluation run, keyed by intent id.
///
/// Built once from the run's [`RatedRequest`]s and read-only afterwards, so
/// it can be shared across worker tasks without synchronization.
#[derive(Debug, Clone, Default)]
pub struct JudgmentSet {
    intents: HashMap<u64, IntentJudgments>,
    /// Returned for intents with no judgments, keeping lookups allocation-free
    empty: IntentJudgments,
}

impl JudgmentSet {
    /// Merges the judgments of all requests into one set.
    ///
    /// Requests sharing an intent id contribute to the same per-intent
    /// store. Construction fails with [`EvalError::MalformedJudgment`] if
    /// the same (intent, document) pair carries two different ratings.
    pub fn from_requests(requests: &[RatedRequest]) -> Result<Self, EvalError> {
        let mut intents: HashMap<u64, IntentJudgments> = HashMap::new();
        for request in requests {
            let intent = intents.entry(request.intent_id).or_default();
            for (doc_id, rating) in &request.ratings {
                intent.insert(request.intent_id, doc_id.clone(), *rating)?;
            }
        }
        let total: usize = intents.values().map(IntentJudgments::len).sum();
        debug!(
            intents = intents.len(),
            judgments = total,
            "judgment set built"
        );
        Ok(Self {
            intents,
            empty: IntentJudgments::default(),
        })
    }

    /// Returns the rating for a (intent, document) pair, or `None` if the
    /// pair was never judged.
    pub fn lookup(&self, intent_id: u64, doc_id: &str) -> Option<Rating> {
        self.intents
            .get(&intent_id)
            .and_then(|intent| intent.lookup(doc_id))
    }

    /// Judgments for one intent; an empty view for unjudged intents.
    pub fn for_intent(&self, intent_id: u64) -> &IntentJudgments {
        self.intents.get(&intent_id).unwrap_or(&self.empty)
    }

    /// Documents judged relevant for an intent.
    pub fn relevant_ids(&self, intent_id: u64) -> &HashSet<String> {
        self.for_intent(intent_id).relevant_ids()
    }

    /// Documents judged irrelevant for an intent.
    pub fn irrelevant_ids(&self, intent_id: u64) -> &HashSet<String> {
        self.for_intent(intent_id).irrelevant_ids()
    }

    /// Number of intents with at least one judgment.
    pub fn intent_count(&self) -> usize {
        self.intents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::QuerySpec;
    use serde_json::json;

    fn spec(id: u64) -> QuerySpec {
        QuerySpec::new(id, "articles", json!({"match": {"body": "test"}}), None)
            .expect("valid spec")
    }

    fn ratings(pairs: &[(&str, Rating)]) -> HashMap<String, Rating> {
        pairs
            .iter()
            .map(|(id, rating)| (id.to_string(), *rating))
            .collect()
    }

    #[test]
    fn test_lookup_distinguishes_unknown_from_irrelevant() {
        let requests = vec![RatedRequest::new(
            1,
            spec(1),
            ratings(&[("d1", Rating::Relevant), ("d2", Rating::Irrelevant)]),
        )];
        let set = JudgmentSet::from_requests(&requests).unwrap();

        assert_eq!(set.lookup(1, "d1"), Some(Rating::Relevant));
        assert_eq!(set.lookup(1, "d2"), Some(Rating::Irrelevant));
        assert_eq!(set.lookup(1, "d3"), None);
        // Unknown intent behaves like an unjudged document
        assert_eq!(set.lookup(99, "d1"), None);
    }

    #[test]
    fn test_set_views_partition_judged_documents() {
        let requests = vec![RatedRequest::new(
            1,
            spec(1),
            ratings(&[
                ("d1", Rating::Relevant),
                ("d2", Rating::Relevant),
                ("d3", Rating::Irrelevant),
            ]),
        )];
        let set = JudgmentSet::from_requests(&requests).unwrap();

        let relevant = set.relevant_ids(1);
        let irrelevant = set.irrelevant_ids(1);
        assert_eq!(relevant.len(), 2);
        assert_eq!(irrelevant.len(), 1);
        assert!(relevant.is_disjoint(irrelevant));

        // View membership agrees with lookup for every judged id
        for id in relevant {
            assert_eq!(set.lookup(1, id), Some(Rating::Relevant));
        }
        for id in irrelevant {
            assert_eq!(set.lookup(1, id), Some(Rating::Irrelevant));
        }
    }

    #[test]
    fn test_conflicting_rating_fails_construction() {
        let requests = vec![
            RatedRequest::new(1, spec(1), ratings(&[("d1", Rating::Relevant)])),
            RatedRequest::new(1, spec(2), ratings(&[("d1", Rating::Irrelevant)])),
        ];
        let err = JudgmentSet::from_requests(&requests).unwrap_err();
        assert!(matches!(
            err,
            EvalError::MalformedJudgment { intent_id: 1, .. }
        ));
    }

    #[test]
    fn test_identical_duplicate_judgment_is_tolerated() {
        let requests = vec![
            RatedRequest::new(1, spec(1), ratings(&[("d1", Rating::Relevant)])),
            RatedRequest::new(1, spec(2), ratings(&[("d1", Rating::Relevant)])),
        ];
        let set = JudgmentSet::from_requests(&requests).unwrap();
        assert_eq!(set.lookup(1, "d1"), Some(Rating::Relevant));
        assert_eq!(set.relevant_ids(1).len(), 1);
    }

    #[test]
    fn test_intents_are_isolated() {
        let requests = vec![
            RatedRequest::new(1, spec(1), ratings(&[("d1", Rating::Relevant)])),
            RatedRequest::new(2, spec(2), ratings(&[("d1", Rating::Irrelevant)])),
        ];
        let set = JudgmentSet::from_requests(&requests).unwrap();
        // Same document, different intents, no conflict
        assert_eq!(set.lookup(1, "d1"), Some(Rating::Relevant));
        assert_eq!(set.lookup(2, "d1"), Some(Rating::Irrelevant));
        assert_eq!(set.intent_count(), 2);
    }

    #[test]
    fn test_rating_serde_lowercase_strings() {
        assert_eq!(serde_json::to_string(&Rating::Relevant).unwrap(), "\"relevant\"");
        let parsed: Rating = serde_json::from_str("\"irrelevant\"").unwrap();
        assert_eq!(parsed, Rating::Irrelevant);
    }
}
