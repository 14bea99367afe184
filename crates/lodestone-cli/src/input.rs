//! File formats for rated requests and pre-fetched ranked lists.
//!
//! The CLI evaluates rankings captured earlier: one JSON file describes the
//! rated requests (intents, query specs, judgments), another maps spec ids
//! to the ranked document lists the backend returned for them. Parsing goes
//! through the core constructors so file contents cannot bypass validation.

use anyhow::{Context, Result};
use lodestone_core::backend::StaticBackend;
use lodestone_core::judgments::{RatedRequest, Rating};
use lodestone_core::spec::QuerySpec;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Top-level structure of the requests file.
#[derive(Debug, Deserialize)]
struct RequestsFile {
    requests: Vec<RequestEntry>,
}

/// One rated request as written in the requests file.
#[derive(Debug, Deserialize)]
struct RequestEntry {
    intent_id: u64,
    spec: SpecEntry,
    /// Document id -> "relevant" | "irrelevant"
    #[serde(default)]
    ratings: HashMap<String, Rating>,
}

/// Query specification as written in the requests file.
#[derive(Debug, Deserialize)]
struct SpecEntry {
    spec_id: u64,
    target_collection: String,
    query_template: Value,
    #[serde(default)]
    filter: Option<Value>,
}

/// Top-level structure of the rankings fixture file.
#[derive(Debug, Deserialize)]
struct RankingsFile {
    /// Spec id -> ranked document ids, best first
    rankings: HashMap<u64, Vec<String>>,
}

/// Parses the requests file content into core rated requests.
pub fn parse_requests(content: &str) -> Result<Vec<RatedRequest>> {
    let file: RequestsFile =
        serde_json::from_str(content).context("requests file is not valid JSON")?;

    let mut requests = Vec::with_capacity(file.requests.len());
    for entry in file.requests {
        let spec = QuerySpec::new(
            entry.spec.spec_id,
            entry.spec.target_collection,
            entry.spec.query_template,
            entry.spec.filter,
        )
        .with_context(|| format!("invalid spec for intent {}", entry.intent_id))?;
        requests.push(RatedRequest::new(entry.intent_id, spec, entry.ratings));
    }
    debug!(requests = requests.len(), "parsed rated requests");
    Ok(requests)
}

/// Parses the rankings fixture content into a fixture backend.
pub fn parse_rankings(content: &str) -> Result<StaticBackend> {
    let file: RankingsFile =
        serde_json::from_str(content).context("rankings file is not valid JSON")?;

    let mut backend = StaticBackend::new();
    for (spec_id, ranked) in file.rankings {
        backend.insert(spec_id, ranked);
    }
    debug!(rankings = backend.len(), "parsed ranked-list fixtures");
    Ok(backend)
}

/// Loads and parses the requests file at `path`.
pub fn load_requests(path: &Path) -> Result<Vec<RatedRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read requests file {}", path.display()))?;
    parse_requests(&content)
}

/// Loads and parses the rankings fixture file at `path`.
pub fn load_rankings(path: &Path) -> Result<StaticBackend> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rankings file {}", path.display()))?;
    parse_rankings(&content)
}
