//! Output formatting for quality reports.
//!
//! Supports human-readable terminal output and JSON for scripting. The JSON
//! form is the report's own serialization, so downstream tools see the same
//! structure the library produces.

use lodestone_core::eval::QualityReport;
use lodestone_core::metrics::MetricScore;

/// Maximum unknown document ids listed per intent in human output
const MAX_UNKNOWN_SHOWN: usize = 5;

/// Formats a quality report as JSON.
pub fn format_json(report: &QualityReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a quality report for human-readable terminal output.
pub fn format_human(report: &QualityReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{}: {} intent{} scored, {} failed\n\n",
        report.metric(),
        report.results().len(),
        if report.results().len() == 1 { "" } else { "s" },
        report.failures().len(),
    ));

    for result in report.results() {
        output.push_str(&format!(
            "  intent {} (spec {}): {}\n",
            result.intent_id,
            result.spec_id,
            format_score(result.score),
        ));
        if !result.unknown_docs.is_empty() {
            output.push_str(&format!(
                "    {} unjudged: {}\n",
                result.unknown_docs.len(),
                preview_ids(&result.unknown_docs),
            ));
        }
    }

    if !report.failures().is_empty() {
        output.push_str("\nFailed intents:\n");
        for failure in report.failures() {
            output.push_str(&format!(
                "  intent {} (spec {}): {}\n",
                failure.intent_id, failure.spec_id, failure.error,
            ));
        }
    }

    output.push_str(&format!("\nAggregate: {}\n", format_score(report.aggregate())));
    output.trim_end().to_string()
}

/// Renders a score as a fixed-precision number or the undefined marker.
fn format_score(score: MetricScore) -> String {
    match score.value() {
        Some(value) => format!("{:.3}", value),
        None => "undefined (no judged results)".to_string(),
    }
}

/// Shows the first few ids, eliding the rest.
fn preview_ids(ids: &[String]) -> String {
    if ids.len() <= MAX_UNKNOWN_SHOWN {
        ids.join(", ")
    } else {
        format!(
            "{}, ... ({} more)",
            ids[..MAX_UNKNOWN_SHOWN].join(", "),
            ids.len() - MAX_UNKNOWN_SHOWN
        )
    }
}
