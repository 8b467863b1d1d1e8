//! Year-over-year percent change.

use crate::models::{ChangeSeries, YearlyCounts};
use tracing::warn;

/// Percent change of each year relative to the preceding year of the series.
///
/// The first year has no entry. A year whose predecessor has a zero count
/// is omitted, since its change is undefined.
pub fn year_over_year(counts: &YearlyCounts) -> ChangeSeries {
    let mut series = ChangeSeries::default();
    let mut previous: Option<(i32, f64)> = None;

    for (year, count) in counts.iter() {
        let current = count as f64;
        if let Some((prev_year, prev)) = previous {
            if prev == 0.0 {
                warn!(
                    "Skipping change for {}: {} has zero incidents",
                    year, prev_year
                );
            } else {
                series.insert(year, (current - prev) / prev * 100.0);
            }
        }
        previous = Some((year, current));
    }

    series
}

/// Up to `n` changes, largest first; ties go to the earlier year.
pub fn largest_changes(series: &ChangeSeries, n: usize) -> Vec<(i32, f64)> {
    let mut changes: Vec<(i32, f64)> = series.iter().collect();
    changes.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    changes.truncate(n);
    changes
}
