//! Search backend boundary.
//!
//! The engine obtains ranked result lists through [`SearchBackend`], the
//! only interface it consumes from the outside world. Adapters for real
//! search engines implement this trait and own all wire-format concerns;
//! the engine only sees ordered document ids.
//!
//! [`StaticBackend`] is an in-memory implementation backed by pre-fetched
//! ranked lists, used by the CLI frontend and the test suite.

use crate::error::QueryExecutionError;
use crate::spec::QuerySpec;
use async_trait::async_trait;
use std::collections::HashMap;

/// Executes query specifications against a search system.
///
/// Implementations must be `Send + Sync`: the orchestrator shares one
/// backend across concurrent per-intent worker tasks. Execution may block
/// or suspend on network I/O; the orchestrator wraps each call in its own
/// timeout, so implementations do not need to enforce one.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Executes one query spec and returns the ranked document ids.
    ///
    /// The returned order is the backend's ranking and must be preserved
    /// exactly; the engine never re-sorts it.
    async fn execute_query(&self, spec: &QuerySpec) -> Result<Vec<String>, QueryExecutionError>;
}

/// Backend serving pre-fetched ranked lists keyed by spec id.
///
/// Useful for evaluating rankings captured earlier (the CLI's fixture
/// files) and for tests that need deterministic backend behavior. Specs
/// without a stored list fail with a backend error, exercising the same
/// per-intent failure path a real backend would.
#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    rankings: HashMap<u64, Vec<String>>,
}

impl StaticBackend {
    /// Creates an empty backend with no stored rankings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the ranked list served for a spec id.
    pub fn insert(&mut self, spec_id: u64, ranked: Vec<String>) {
        self.rankings.insert(spec_id, ranked);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_ranking(mut self, spec_id: u64, ranked: Vec<String>) -> Self {
        self.insert(spec_id, ranked);
        self
    }

    /// Number of spec ids with stored rankings.
    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    /// Returns true if no rankings are stored.
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}

#[async_trait]
impl SearchBackend for StaticBackend {
    async fn execute_query(&self, spec: &QuerySpec) -> Result<Vec<String>, QueryExecutionError> {
        self.rankings
            .get(&spec.spec_id())
            .cloned()
            .ok_or_else(|| {
                QueryExecutionError::Backend(format!(
                    "no ranked list recorded for spec {}",
                    spec.spec_id()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(id: u64) -> QuerySpec {
        QuerySpec::new(id, "articles", json!({"match_all": {}}), None).unwrap()
    }

    #[tokio::test]
    async fn test_static_backend_serves_stored_ranking() {
        let backend = StaticBackend::new()
            .with_ranking(1, vec!["d1".to_string(), "d2".to_string()]);

        let ranked = backend.execute_query(&spec(1)).await.unwrap();
        assert_eq!(ranked, vec!["d1".to_string(), "d2".to_string()]);
    }

    #[tokio::test]
    async fn test_static_backend_fails_unknown_spec() {
        let backend = StaticBackend::new();
        let err = backend.execute_query(&spec(42)).await.unwrap_err();
        assert!(matches!(err, QueryExecutionError::Backend(_)));
    }
}
