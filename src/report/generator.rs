//! Markdown and JSON report generation.
//!
//! This module renders a [`TrendReport`] as a markdown document with six
//! numbered sections, or as pretty-printed JSON.

use super::{format_threshold, FlaggedYear, TrendReport, YearChange};
use crate::error::Result;
use crate::models::BaselineSummary;

/// Generate the complete markdown report.
pub fn generate_markdown_report(report: &TrendReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Incident Trend Report\n\n");
    output.push_str("This report was generated automatically by the analysis pipeline.\n\n");

    output.push_str(&generate_baseline_section(&report.baseline));
    output.push_str(&generate_increases_section(&report.top_increases));
    output.push_str(&generate_flags_section(&report.flagged, report.threshold));
    output.push_str(&generate_breakdown_section(&report.flagged));
    output.push_str(&generate_conclusions_section(&report.conclusions));
    output.push_str(&generate_artifacts_section(&report.artifacts));

    output
}

/// Generate the baseline section.
fn generate_baseline_section(baseline: &BaselineSummary) -> String {
    let mut section = String::new();

    section.push_str("## 1) Baseline (Yearly Counts)\n\n");
    section.push_str(&format!(
        "- Years covered: **{}–{}**\n",
        baseline.start_year, baseline.end_year
    ));
    section.push_str(&format!("- Mean incidents/year: **{:.2}**\n", baseline.mean));
    section.push_str(&format!(
        "- Median incidents/year: **{:.2}**\n",
        baseline.median
    ));
    section.push_str(&format!("- Standard deviation: **{:.2}**\n", baseline.stddev));
    section.push_str(&format!(
        "- Lowest year: **{}** ({} incidents)\n",
        baseline.min_year, baseline.min_count
    ));
    section.push_str(&format!(
        "- Highest year: **{}** ({} incidents)\n",
        baseline.max_year, baseline.max_count
    ));
    section.push('\n');

    section
}

/// Generate the year-over-year increases section.
fn generate_increases_section(increases: &[YearChange]) -> String {
    let mut section = String::new();

    section.push_str("## 2) Biggest Year-to-Year Increases\n\n");
    if increases.is_empty() {
        section.push_str("- (No year-to-year changes available)\n");
    } else {
        for change in increases {
            section.push_str(&format!(
                "- **{}**: **{:.2}%**\n",
                change.year, change.percent
            ));
        }
    }
    section.push('\n');

    section
}

/// Generate the flagged years section.
fn generate_flags_section(flagged: &[FlaggedYear], threshold: f64) -> String {
    let mut section = String::new();

    section.push_str("## 3) Unusual Years (Z-Score Flags)\n\n");
    section.push_str(&format!(
        "Rule used: **|z| ≥ {}**\n\n",
        format_threshold(threshold)
    ));
    if flagged.is_empty() {
        section.push_str("- No years were flagged as unusual.\n");
    } else {
        for year in flagged {
            section.push_str(&format!(
                "- **{}**: {} incidents (z = {:.2})\n",
                year.year, year.count, year.z_score
            ));
        }
    }
    section.push('\n');

    section
}

/// Generate the per-year incident type breakdown.
fn generate_breakdown_section(flagged: &[FlaggedYear]) -> String {
    let mut section = String::new();

    section.push_str("## 4) What Drove the Spike? (Top Incident Types in Flagged Years)\n\n");
    if flagged.is_empty() {
        section.push_str("- No flagged years → skipping breakdown.\n\n");
        return section;
    }

    for year in flagged {
        section.push_str(&format!("### {}\n\n", year.year));
        if year.top_types.is_empty() {
            section.push_str("- (No incident types found for this year)\n");
        } else {
            for t in &year.top_types {
                section.push_str(&format!("- {}: {}\n", t.incident_type, t.count));
            }
        }
        section.push('\n');
    }

    section
}

/// Generate the conclusions section.
fn generate_conclusions_section(conclusions: &[String]) -> String {
    let mut section = String::new();

    section.push_str("## 5) Conclusions (Auto-Summary)\n\n");
    for conclusion in conclusions {
        section.push_str(&format!("- {}\n", conclusion));
    }
    section.push('\n');

    section
}

/// Generate the list of generated files.
fn generate_artifacts_section(artifacts: &[String]) -> String {
    let mut section = String::new();

    section.push_str("## 6) Generated Files\n\n");
    for name in artifacts {
        section.push_str(&format!("- `{}`\n", name));
    }

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &TrendReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
