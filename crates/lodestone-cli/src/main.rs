//! Lodestone CLI - evaluate search ranking quality from captured rankings.
//!
//! # Usage
//!
//! ```bash
//! # Score captured rankings against judged requests
//! lodestone requests.json rankings.json
//! lodestone requests.json rankings.json -n 5
//! lodestone requests.json rankings.json --json
//! ```
//!
//! The requests file holds the rated requests (intents, query specs,
//! relevance judgments); the rankings file maps spec ids to the ranked
//! document lists a search backend returned for them.

mod input;
mod output;

use anyhow::Result;
use clap::Parser;
use lodestone_core::eval::{EvalOptions, Evaluator};
use lodestone_core::metrics::PrecisionAtN;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Lodestone ranking quality evaluator.
///
/// Compares captured ranked result lists against human relevance judgments
/// and reports Precision@N per query intent plus an aggregate score.
#[derive(Parser)]
#[command(name = "lodestone", version, about)]
struct Cli {
    /// Path to the rated requests file (JSON)
    requests: PathBuf,

    /// Path to the captured rankings file (JSON)
    rankings: PathBuf,

    /// Number of top results to consider for precision
    #[arg(short = 'n', long, default_value = "10")]
    precision_at: usize,

    /// Maximum number of intents evaluated concurrently
    #[arg(long, default_value = "4")]
    concurrency: usize,

    /// Per-intent query timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let requests = input::load_requests(&cli.requests)?;
    let backend = input::load_rankings(&cli.rankings)?;

    let metric = Arc::new(PrecisionAtN::new(cli.precision_at)?);
    let options = EvalOptions {
        max_concurrency: cli.concurrency,
        query_timeout: Duration::from_secs(cli.timeout_secs),
    };
    let evaluator = Evaluator::new(Arc::new(backend), metric, options)?;

    let report = evaluator.evaluate(&requests).await?;

    let rendered = if cli.json {
        output::format_json(&report)
    } else {
        output::format_human(&report)
    };
    println!("{}", rendered);

    Ok(())
}
