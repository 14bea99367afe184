//! Query specifications binding query intents to executable queries.
//!
//! A [`QuerySpec`] tells the search backend how to execute one query
//! intent: which collection to query, the query template to run, and an
//! optional filter. The engine never interprets the template or filter;
//! both are opaque JSON payloads forwarded verbatim to the backend adapter.

use crate::error::EvalError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Immutable specification for executing one query intent.
///
/// Construction validates the specification; afterwards the fields are
/// read-only. Two specifications are considered the same iff their ids are
/// equal, and one evaluation run must not contain two requests with the
/// same spec id. Deserialization is deliberately not derived: specs enter
/// the system through [`QuerySpec::new`] so validation cannot be bypassed.
#[derive(Debug, Clone, Serialize)]
pub struct QuerySpec {
    spec_id: u64,
    target_collection: String,
    query_template: Value,
    filter: Option<Value>,
}

impl QuerySpec {
    /// Creates a validated query specification.
    ///
    /// # Arguments
    ///
    /// * `spec_id` - User-supplied id for referencing this specification
    /// * `target_collection` - Collection/index the query runs against
    /// * `query_template` - Opaque query definition for the backend
    /// * `filter` - Optional opaque filter; `None` applies no filtering
    ///
    /// # Errors
    ///
    /// [`EvalError::MalformedSpecification`] if the target collection is
    /// empty or the query template is null (a specification without a
    /// template is meaningless).
    pub fn new(
        spec_id: u64,
        target_collection: impl Into<String>,
        query_template: Value,
        filter: Option<Value>,
    ) -> Result<Self, EvalError> {
        let target_collection = target_collection.into();
        if target_collection.trim().is_empty() {
            return Err(EvalError::MalformedSpecification(format!(
                "spec {} has an empty target collection",
                spec_id
            )));
        }
        if query_template.is_null() {
            return Err(EvalError::MalformedSpecification(format!(
                "spec {} has no query template",
                spec_id
            )));
        }
        Ok(Self {
            spec_id,
            target_collection,
            query_template,
            filter,
        })
    }

    /// Returns the user-supplied spec id.
    pub fn spec_id(&self) -> u64 {
        self.spec_id
    }

    /// Returns the collection the query is sent to.
    pub fn target_collection(&self) -> &str {
        &self.target_collection
    }

    /// Returns the query template to execute for this spec.
    pub fn query_template(&self) -> &Value {
        &self.query_template
    }

    /// Returns the filter applied to queries under this spec, if any.
    pub fn filter(&self) -> Option<&Value> {
        self.filter.as_ref()
    }
}

impl PartialEq for QuerySpec {
    /// Identity is the spec id, not structural equality of the payloads.
    fn eq(&self, other: &Self) -> bool {
        self.spec_id == other.spec_id
    }
}

impl Eq for QuerySpec {}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spec {} -> {} (template: {}, filter: {})",
            self.spec_id,
            self.target_collection,
            self.query_template,
            self.filter
                .as_ref()
                .map_or_else(|| "none".to_string(), Value::to_string),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_spec_construction() {
        let spec = QuerySpec::new(
            3,
            "articles",
            json!({"template": {"match": {"title": "{{query}}"}}}),
            Some(json!({"term": {"lang": "en"}})),
        )
        .unwrap();

        assert_eq!(spec.spec_id(), 3);
        assert_eq!(spec.target_collection(), "articles");
        assert!(spec.filter().is_some());
    }

    #[test]
    fn test_empty_collection_rejected() {
        let err = QuerySpec::new(1, "  ", json!({"match_all": {}}), None).unwrap_err();
        assert!(matches!(err, EvalError::MalformedSpecification(_)));
    }

    #[test]
    fn test_null_template_rejected() {
        let err = QuerySpec::new(1, "articles", Value::Null, None).unwrap_err();
        assert!(matches!(err, EvalError::MalformedSpecification(_)));
    }

    #[test]
    fn test_equality_is_by_id() {
        let a = QuerySpec::new(1, "articles", json!({"q": "a"}), None).unwrap();
        let b = QuerySpec::new(1, "reports", json!({"q": "b"}), None).unwrap();
        let c = QuerySpec::new(2, "articles", json!({"q": "a"}), None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_summarises_fields() {
        let spec = QuerySpec::new(5, "articles", json!({"match_all": {}}), None).unwrap();
        let text = spec.to_string();
        assert!(text.contains("spec 5"));
        assert!(text.contains("articles"));
        assert!(text.contains("none"));
    }
}
