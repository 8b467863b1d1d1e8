//! Data models for the incident trend analysis.
//!
//! This module contains the core data structures shared by the pipeline
//! stages: loaded incidents, the yearly count series and the derived
//! baseline, change and anomaly results.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single incident record as loaded from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Free-text category label, `None` when the cell was empty.
    pub incident_type: Option<String>,
    /// Parsed start date, `None` when the value could not be parsed.
    pub start_date: Option<NaiveDate>,
    /// Calendar year of `start_date`.
    pub year: Option<i32>,
}

impl Incident {
    /// Creates an incident, deriving the year from the start date.
    pub fn new(incident_type: Option<String>, start_date: Option<NaiveDate>) -> Self {
        Self {
            incident_type,
            year: start_date.map(|d| d.year()),
            start_date,
        }
    }
}

/// Number of incidents per calendar year, sorted by year ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyCounts(BTreeMap<i32, u64>);

impl YearlyCounts {
    /// Tallies incidents by year, skipping those without a year.
    pub fn from_incidents(incidents: &[Incident]) -> Self {
        let mut counts = BTreeMap::new();
        for year in incidents.iter().filter_map(|i| i.year) {
            *counts.entry(year).or_insert(0) += 1;
        }
        Self(counts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, year: i32) -> Option<u64> {
        self.0.get(&year).copied()
    }

    /// Iterates `(year, count)` pairs in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.0.iter().map(|(y, c)| (*y, *c))
    }

    /// Counts as real numbers, in ascending year order.
    pub fn values(&self) -> Vec<f64> {
        self.0.values().map(|c| *c as f64).collect()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.0.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.0.keys().next_back().copied()
    }
}

impl FromIterator<(i32, u64)> for YearlyCounts {
    fn from_iter<T: IntoIterator<Item = (i32, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Descriptive statistics of the yearly count series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub start_year: i32,
    pub end_year: i32,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; 0 for a single year.
    pub stddev: f64,
    pub min_year: i32,
    pub min_count: u64,
    pub max_year: i32,
    pub max_count: u64,
}

/// Percent change of each year relative to the preceding year in the series.
///
/// The earliest year never has an entry, and neither does a year whose
/// predecessor has a zero count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSeries(BTreeMap<i32, f64>);

impl ChangeSeries {
    pub(crate) fn insert(&mut self, year: i32, percent: f64) {
        self.0.insert(year, percent);
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.0.get(&year).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(year, percent)` pairs in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.0.iter().map(|(y, p)| (*y, *p))
    }
}

/// Z-score result for a single year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRow {
    pub count: u64,
    /// Unrounded z-score; drives the flag decision.
    pub z_score: f64,
    pub flagged: bool,
}

impl AnomalyRow {
    /// Z-score rounded to two decimals for display.
    pub fn rounded_z(&self) -> f64 {
        (self.z_score * 100.0).round() / 100.0
    }
}

/// Per-year z-scores and flags over the whole yearly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyTable {
    pub threshold: f64,
    pub mean: f64,
    pub stddev: f64,
    pub rows: BTreeMap<i32, AnomalyRow>,
}

impl AnomalyTable {
    /// Flagged years in ascending year order.
    pub fn flagged(&self) -> impl Iterator<Item = (i32, &AnomalyRow)> + '_ {
        self.rows
            .iter()
            .filter(|(_, row)| row.flagged)
            .map(|(y, row)| (*y, row))
    }

    pub fn flagged_years(&self) -> Vec<i32> {
        self.flagged().map(|(y, _)| y).collect()
    }
}

/// Frequency of a single incident type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub incident_type: String,
    pub count: usize,
}
