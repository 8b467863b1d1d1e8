//! Terminal listings of the intermediate results.

use super::format_threshold;
use crate::analysis::ranked_flags;
use crate::models::{AnomalyTable, BaselineSummary, ChangeSeries};

/// Short baseline summary.
pub fn format_baseline(baseline: &BaselineSummary) -> String {
    let lines = [
        format!(
            "Years covered: {}–{}",
            baseline.start_year, baseline.end_year
        ),
        format!("Average per year: {:.2}", baseline.mean),
        format!("Median per year: {:.2}", baseline.median),
        format!("Std dev: {:.2}", baseline.stddev),
        format!(
            "Lowest year: {} ({} incidents)",
            baseline.min_year, baseline.min_count
        ),
        format!(
            "Highest year: {} ({} incidents)",
            baseline.max_year, baseline.max_count
        ),
    ];
    lines.join("\n")
}

/// Year-over-year change, one year per line.
pub fn format_changes(changes: &ChangeSeries) -> String {
    if changes.is_empty() {
        return "(no year-to-year changes)".to_string();
    }

    changes
        .iter()
        .map(|(year, percent)| format!("{}    {:>8.2}%", year, percent))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flagged years, most extreme first.
pub fn format_flags(table: &AnomalyTable) -> String {
    let mut lines = vec![format!(
        "Rule: |z| >= {} counts as unusual",
        format_threshold(table.threshold)
    )];
    lines.push(String::new());

    let ranked = ranked_flags(table);
    if ranked.is_empty() {
        lines.push("No unusual years flagged at this threshold.".to_string());
        return lines.join("\n");
    }

    lines.push("Flagged years:".to_string());
    for (year, row) in ranked {
        lines.push(format!(
            "- {}: {} incidents (z = {:.2})",
            year,
            row.count,
            row.rounded_z()
        ));
    }
    lines.join("\n")
}
