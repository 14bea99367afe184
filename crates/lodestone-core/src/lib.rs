//! # Lodestone Core
//!
//! Engine for evaluating the quality of search ranking algorithms.
//!
//! Lodestone compares the ranked result lists a search backend returns
//! against human relevance judgments and produces quantitative quality
//! scores (currently Precision@N), per query intent and aggregated across a
//! whole evaluation run.
//!
//! The engine is backend-agnostic: it talks to the search system through the
//! [`backend::SearchBackend`] trait and never inspects queries itself. Query
//! templates and filters are carried as opaque JSON payloads.
//!
//! ## Modules
//!
//! - [`judgments`] - Relevance ratings and per-intent judgment storage
//! - [`spec`] - Query specifications binding intents to executable queries
//! - [`metrics`] - The metric trait and the Precision@N implementation
//! - [`backend`] - Search backend boundary trait and an in-memory adapter
//! - [`eval`] - The evaluation orchestrator and quality report
//! - [`config`] - Default configuration constants
//! - [`error`] - Error types for construction and run-level failures
//!
//! ## Example
//!
//! ```ignore
//! use lodestone_core::backend::StaticBackend;
//! use lodestone_core::eval::{EvalOptions, Evaluator};
//! use lodestone_core::metrics::PrecisionAtN;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(StaticBackend::new());
//! let metric = Arc::new(PrecisionAtN::new(10)?);
//! let evaluator = Evaluator::new(backend, metric, EvalOptions::default())?;
//!
//! let report = evaluator.evaluate(&requests).await?;
//! println!("aggregate: {:?}", report.aggregate());
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod eval;
pub mod judgments;
pub mod metrics;
pub mod spec;

pub use backend::{SearchBackend, StaticBackend};
pub use error::{EvalError, QueryExecutionError};
pub use eval::{CancelToken, EvalOptions, EvalResult, Evaluator, IntentFailure, QualityReport};
pub use judgments::{IntentJudgments, JudgmentSet, RatedRequest, Rating};
pub use metrics::{MetricResult, MetricScore, PrecisionAtN, RankedListMetric};
pub use spec::QuerySpec;
