//! Report formatting for simulation results.
//!
//! Pure functions — (SimulationReport, OutputFormat) → String.
//! No I/O, no side effects.

use crate::types::{OutputFormat, SimulationReport};

/// Widest histogram bar, in characters.
const BAR_WIDTH: usize = 40;

/// Format a simulation report for output.
pub fn format_report(report: &SimulationReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(report),
        OutputFormat::Json => format_json(report),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human(report: &SimulationReport) -> String {
    let mut out = String::new();

    if !report.histogram.is_empty() {
        out.push_str("=== Rounds Needed ===\n");
        let peak = report.histogram.values().copied().max().unwrap_or(1).max(1);
        for (rounds, count) in &report.histogram {
            let width = (count * BAR_WIDTH).div_ceil(peak);
            out.push_str(&format!(
                "{:>3} │{} {}\n",
                rounds,
                "█".repeat(width),
                count
            ));
        }
        out.push('\n');
    }

    if !report.failures.is_empty() {
        out.push_str("=== Failed Games ===\n");
        for (index, error) in &report.failures {
            out.push_str(&format!("  #{} - {}\n", index, error));
        }
        out.push('\n');
    }

    out.push_str(&format_summary(report));
    out
}

fn format_summary(report: &SimulationReport) -> String {
    let mut out = String::new();
    out.push_str("=== Summary ===\n");
    out.push_str(&format!("Games finished: {}\n", report.games_played));
    if !report.failures.is_empty() {
        out.push_str(&format!("Games failed:   {}\n", report.failures.len()));
    }

    match (report.min_rounds, report.max_rounds) {
        (Some(min), Some(max)) => {
            out.push_str(&format!("Fewest rounds:  {}\n", min));
            out.push_str(&format!("Most rounds:    {}\n", max));
            out.push_str(&format!("Mean rounds:    {:.2}\n", report.mean_rounds));
        }
        _ => out.push_str("No game finished.\n"),
    }

    out
}

// ============================================================================
// JSON FORMAT
// ============================================================================

fn format_json(report: &SimulationReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        // Plain numbers, strings and maps: serialization cannot fail
        panic!("Failed to serialize report to JSON: {}", e)
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_report() -> SimulationReport {
        let mut histogram = BTreeMap::new();
        histogram.insert(4, 2);
        histogram.insert(6, 1);
        SimulationReport {
            games_played: 3,
            failures: vec![(7, "No candidate left in [4, 5) excluding 4".to_string())],
            min_rounds: Some(4),
            max_rounds: Some(6),
            mean_rounds: 14.0 / 3.0,
            histogram,
        }
    }

    // --- Human format tests ---

    #[test]
    fn human_format_includes_histogram() {
        let output = format_report(&sample_report(), OutputFormat::Human);

        assert!(output.contains("=== Rounds Needed ==="));
        assert!(output.contains("  4 │"));
        assert!(output.contains("  6 │"));
        // The most frequent bucket gets the full-width bar
        assert!(output.contains(&"█".repeat(BAR_WIDTH)));
    }

    #[test]
    fn human_format_includes_failures() {
        let output = format_report(&sample_report(), OutputFormat::Human);

        assert!(output.contains("=== Failed Games ==="));
        assert!(output.contains("#7 - No candidate left"));
        assert!(output.contains("Games failed:   1"));
    }

    #[test]
    fn human_format_includes_summary() {
        let output = format_report(&sample_report(), OutputFormat::Human);

        assert!(output.contains("=== Summary ==="));
        assert!(output.contains("Games finished: 3"));
        assert!(output.contains("Fewest rounds:  4"));
        assert!(output.contains("Most rounds:    6"));
        assert!(output.contains("Mean rounds:    4.67"));
    }

    #[test]
    fn human_format_empty_report() {
        let output = format_report(&SimulationReport::default(), OutputFormat::Human);

        assert!(!output.contains("=== Rounds Needed"));
        assert!(!output.contains("=== Failed Games"));
        assert!(output.contains("Games finished: 0"));
        assert!(output.contains("No game finished."));
    }

    // --- JSON format tests ---

    #[test]
    fn json_format_has_expected_fields() {
        let output = format_report(&sample_report(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("Invalid JSON");

        assert_eq!(parsed["games_played"], 3);
        assert_eq!(parsed["min_rounds"], 4);
        assert_eq!(parsed["max_rounds"], 6);
        assert!(parsed["mean_rounds"].is_number());
        assert_eq!(parsed["histogram"]["4"], 2);
        assert_eq!(parsed["failures"][0][0], 7);
    }

    #[test]
    fn json_format_empty_report() {
        let output = format_report(&SimulationReport::default(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["games_played"], 0);
        assert!(parsed["min_rounds"].is_null());
        assert_eq!(parsed["histogram"].as_object().unwrap().len(), 0);
    }
}
