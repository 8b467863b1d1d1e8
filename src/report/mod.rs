//! Report assembly.
//!
//! [`build_report`] gathers every section of the trend report into a
//! [`TrendReport`] value. Rendering to markdown or JSON lives in
//! [`generator`], terminal listings in [`console`].

pub mod console;
pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{baseline, largest_changes, top_types_for_year};
use crate::error::Result;
use crate::models::{
    AnomalyTable, BaselineSummary, ChangeSeries, Incident, TypeCount, YearlyCounts,
};
use serde::{Deserialize, Serialize};

/// Upper bound on auto-generated conclusions.
const MAX_CONCLUSIONS: usize = 5;

/// A year and its percent change from the preceding year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearChange {
    pub year: i32,
    pub percent: f64,
}

/// A flagged year with the incident types that drove it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedYear {
    pub year: i32,
    pub count: u64,
    /// Rounded to two decimals.
    pub z_score: f64,
    pub top_types: Vec<TypeCount>,
}

/// Parameters of report assembly.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub threshold: f64,
    pub top_n_increases: usize,
    pub top_n_types: usize,
    /// File names listed in the generated files section.
    pub artifacts: Vec<String>,
}

/// The complete trend report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub baseline: BaselineSummary,
    pub threshold: f64,
    /// Largest changes first.
    pub top_increases: Vec<YearChange>,
    /// Ascending year order.
    pub flagged: Vec<FlaggedYear>,
    pub conclusions: Vec<String>,
    pub artifacts: Vec<String>,
    pub yearly_counts: YearlyCounts,
    pub year_over_year: ChangeSeries,
    pub anomalies: AnomalyTable,
}

/// Assemble the report from the pipeline results.
///
/// Pure: identical inputs always give an identical report.
pub fn build_report(
    incidents: &[Incident],
    counts: &YearlyCounts,
    changes: &ChangeSeries,
    anomalies: &AnomalyTable,
    settings: &ReportSettings,
) -> Result<TrendReport> {
    let baseline = baseline(counts)?;

    let top_increases: Vec<YearChange> = largest_changes(changes, settings.top_n_increases)
        .into_iter()
        .map(|(year, percent)| YearChange { year, percent })
        .collect();

    let flagged: Vec<FlaggedYear> = anomalies
        .flagged()
        .map(|(year, row)| FlaggedYear {
            year,
            count: row.count,
            z_score: row.rounded_z(),
            top_types: top_types_for_year(incidents, year, settings.top_n_types),
        })
        .collect();

    let conclusions = conclusions(counts, changes, &top_increases, &flagged, settings.threshold);

    Ok(TrendReport {
        baseline,
        threshold: settings.threshold,
        top_increases,
        flagged,
        conclusions,
        artifacts: settings.artifacts.clone(),
        yearly_counts: counts.clone(),
        year_over_year: changes.clone(),
        anomalies: anomalies.clone(),
    })
}

/// Plain-language conclusions, in a fixed order.
fn conclusions(
    counts: &YearlyCounts,
    changes: &ChangeSeries,
    top_increases: &[YearChange],
    flagged: &[FlaggedYear],
    threshold: f64,
) -> Vec<String> {
    let mut out = Vec::new();
    let rule = format!("|z| ≥ {}", format_threshold(threshold));

    if flagged.is_empty() {
        out.push(format!(
            "No years crossed the unusual threshold ({}) based on the yearly baseline.",
            rule
        ));
    } else {
        let years: Vec<String> = flagged.iter().map(|f| f.year.to_string()).collect();
        out.push(format!(
            "Unusual spike years were detected using z-scores ({}). Flagged: {}.",
            rule,
            years.join(", ")
        ));
    }

    if counts.len() >= 5 {
        if let Some(last) = counts.last_year() {
            let prev = last - 1;
            if counts.get(prev).is_some() {
                if let Some(change) = changes.get(last) {
                    out.push(format!(
                        "Most recent change: {} → {} was {:.2}%.",
                        prev, last, change
                    ));
                }
            }
        }
    }

    if let Some(biggest) = top_increases.first().filter(|c| c.percent > 0.0) {
        out.push(format!(
            "Largest year-to-year increase was in {}: {:.2}%.",
            biggest.year, biggest.percent
        ));
    }

    out.truncate(MAX_CONCLUSIONS);
    out
}

/// Render a threshold with at least one decimal (`2.0`, `1.75`).
pub fn format_threshold(threshold: f64) -> String {
    if threshold.fract() == 0.0 {
        format!("{:.1}", threshold)
    } else {
        threshold.to_string()
    }
}
