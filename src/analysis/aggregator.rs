//! Yearly aggregation and incident-type frequencies.
//!
//! This module builds the yearly count series from loaded incidents,
//! computes its baseline statistics and tallies incident types.

use super::stats::{mean, median, sample_std_dev};
use crate::error::{PipelineError, Result};
use crate::models::{BaselineSummary, Incident, TypeCount, YearlyCounts};
use std::collections::HashMap;
use tracing::debug;

/// Build the yearly count series.
///
/// Fails with [`PipelineError::EmptyDataset`] when no incident has a year.
pub fn yearly_counts(incidents: &[Incident]) -> Result<YearlyCounts> {
    let counts = YearlyCounts::from_incidents(incidents);
    if counts.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    debug!(
        "Counted {} dated incidents over {} years",
        counts.total(),
        counts.len()
    );
    Ok(counts)
}

/// Compute the baseline statistics of a yearly count series.
///
/// When several years share the minimum or maximum count, the earliest
/// of them is reported.
pub fn baseline(counts: &YearlyCounts) -> Result<BaselineSummary> {
    let (Some(start_year), Some(end_year)) = (counts.first_year(), counts.last_year()) else {
        return Err(PipelineError::EmptyDataset);
    };

    let values = counts.values();
    let mean_val = mean(&values).ok_or(PipelineError::EmptyDataset)?;
    let median_val = median(&values).ok_or(PipelineError::EmptyDataset)?;

    let mut min = (start_year, u64::MAX);
    let mut max = (start_year, 0);
    for (year, count) in counts.iter() {
        if count < min.1 {
            min = (year, count);
        }
        if count > max.1 {
            max = (year, count);
        }
    }

    Ok(BaselineSummary {
        start_year,
        end_year,
        mean: mean_val,
        median: median_val,
        stddev: sample_std_dev(&values),
        min_year: min.0,
        min_count: min.1,
        max_year: max.0,
        max_count: max.1,
    })
}

/// Count incident types, most frequent first.
///
/// Ties keep the order in which the types were first encountered.
/// Incidents without a type are ignored.
pub fn type_frequencies<'a>(incidents: impl IntoIterator<Item = &'a Incident>) -> Vec<TypeCount> {
    let mut order: Vec<TypeCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for incident in incidents {
        let Some(label) = incident.incident_type.as_deref() else {
            continue;
        };
        match index.get(label) {
            Some(&i) => order[i].count += 1,
            None => {
                index.insert(label, order.len());
                order.push(TypeCount {
                    incident_type: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-encountered order among equal counts
    order.sort_by_key(|t| std::cmp::Reverse(t.count));
    order
}

/// Top N incident types across the whole dataset.
pub fn top_types(incidents: &[Incident], n: usize) -> Vec<TypeCount> {
    let mut freq = type_frequencies(incidents);
    freq.truncate(n);
    freq
}

/// Top N incident types among the incidents of a single year.
pub fn top_types_for_year(incidents: &[Incident], year: i32, n: usize) -> Vec<TypeCount> {
    let mut freq = type_frequencies(incidents.iter().filter(|i| i.year == Some(year)));
    freq.truncate(n);
    freq
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn incident(kind: &str, year: Option<i32>) -> Incident {
        Incident::new(
            Some(kind.to_string()),
            year.and_then(|y| NaiveDate::from_ymd_opt(y, 5, 1)),
        )
    }

    fn series(pairs: &[(i32, u64)]) -> YearlyCounts {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_yearly_counts_sum_matches_dated_records() {
        let incidents = vec![
            incident("A", Some(2018)),
            incident("B", Some(2018)),
            incident("C", None),
            incident("D", Some(2020)),
        ];

        let counts = yearly_counts(&incidents).unwrap();
        let dated = incidents.iter().filter(|i| i.year.is_some()).count() as u64;
        assert_eq!(counts.total(), dated);
        assert_eq!(counts.iter().map(|(y, _)| y).collect::<Vec<_>>(), vec![2018, 2020]);
    }

    #[test]
    fn test_yearly_counts_empty_is_error() {
        let incidents = vec![incident("A", None), incident("B", None)];
        assert!(matches!(
            yearly_counts(&incidents),
            Err(PipelineError::EmptyDataset)
        ));
        assert!(matches!(
            yearly_counts(&[]),
            Err(PipelineError::EmptyDataset)
        ));
    }

    #[test]
    fn test_baseline_statistics() {
        let counts = series(&[(2018, 100), (2019, 105), (2020, 500)]);
        let summary = baseline(&counts).unwrap();

        assert_eq!(summary.start_year, 2018);
        assert_eq!(summary.end_year, 2020);
        assert!((summary.mean - 235.0).abs() < 1e-9);
        assert!((summary.median - 105.0).abs() < 1e-9);
        assert!((summary.stddev - 52675.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!((summary.min_year, summary.min_count), (2018, 100));
        assert_eq!((summary.max_year, summary.max_count), (2020, 500));
    }

    #[test]
    fn test_baseline_ties_pick_earliest_year() {
        let counts = series(&[(2015, 7), (2016, 3), (2017, 7), (2018, 3)]);
        let summary = baseline(&counts).unwrap();
        assert_eq!((summary.min_year, summary.min_count), (2016, 3));
        assert_eq!((summary.max_year, summary.max_count), (2015, 7));
    }

    #[test]
    fn test_baseline_constant_series() {
        let counts = series(&[(2018, 10), (2019, 10), (2020, 10)]);
        let summary = baseline(&counts).unwrap();
        assert_eq!(summary.mean, 10.0);
        assert_eq!(summary.stddev, 0.0);
    }

    #[test]
    fn test_baseline_empty_is_error() {
        assert!(matches!(
            baseline(&YearlyCounts::default()),
            Err(PipelineError::EmptyDataset)
        ));
    }

    #[test]
    fn test_top_types_for_year() {
        let incidents: Vec<Incident> = ["A", "A", "B", "C", "C", "C"]
            .iter()
            .map(|k| incident(k, Some(2020)))
            .collect();

        let top = top_types_for_year(&incidents, 2020, 2);
        assert_eq!(
            top,
            vec![
                TypeCount {
                    incident_type: "C".to_string(),
                    count: 3
                },
                TypeCount {
                    incident_type: "A".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_type_ties_keep_first_seen_order() {
        let incidents: Vec<Incident> = ["B", "A", "A", "B", "C"]
            .iter()
            .map(|k| incident(k, Some(2020)))
            .collect();

        let labels: Vec<String> = top_types_for_year(&incidents, 2020, 5)
            .into_iter()
            .map(|t| t.incident_type)
            .collect();
        assert_eq!(labels, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_undated_records_excluded_from_year_breakdown() {
        let incidents = vec![
            incident("Espionage", None),
            incident("Espionage", None),
            incident("Ransomware", Some(2021)),
        ];

        let top = top_types_for_year(&incidents, 2021, 5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].incident_type, "Ransomware");
    }

    #[test]
    fn test_untyped_records_ignored() {
        let incidents = vec![
            Incident::new(None, NaiveDate::from_ymd_opt(2020, 1, 1)),
            incident("DDoS", Some(2020)),
        ];

        let top = top_types(&incidents, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 1);
    }
}
