//! Z-score anomaly detection on yearly counts.

use super::stats::{mean, sample_std_dev};
use crate::models::{AnomalyRow, AnomalyTable, YearlyCounts};
use std::collections::BTreeMap;
use tracing::debug;

/// Default |z| at or above which a year is flagged.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Compute the z-score of every year and flag those with |z| >= threshold.
///
/// A series with zero spread (identical counts, or a single year) gives
/// every year a z-score of 0 and flags nothing.
pub fn zscore_flags(counts: &YearlyCounts, threshold: f64) -> AnomalyTable {
    let values = counts.values();
    let mean_val = mean(&values).unwrap_or(0.0);
    let stddev = sample_std_dev(&values);

    let rows: BTreeMap<i32, AnomalyRow> = counts
        .iter()
        .map(|(year, count)| {
            let row = if stddev == 0.0 {
                AnomalyRow {
                    count,
                    z_score: 0.0,
                    flagged: false,
                }
            } else {
                let z = (count as f64 - mean_val) / stddev;
                AnomalyRow {
                    count,
                    z_score: z,
                    flagged: z.abs() >= threshold,
                }
            };
            (year, row)
        })
        .collect();

    debug!(
        "z-scores: mean={:.2} stddev={:.2} flagged={}",
        mean_val,
        stddev,
        rows.values().filter(|r| r.flagged).count()
    );

    AnomalyTable {
        threshold,
        mean: mean_val,
        stddev,
        rows,
    }
}

/// Flagged years ordered by descending |z|; ties keep year order.
pub fn ranked_flags(table: &AnomalyTable) -> Vec<(i32, AnomalyRow)> {
    let mut flagged: Vec<(i32, AnomalyRow)> = table.flagged().map(|(y, r)| (y, *r)).collect();
    flagged.sort_by(|a, b| b.1.z_score.abs().total_cmp(&a.1.z_score.abs()));
    flagged
}
