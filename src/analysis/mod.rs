//! Statistical analysis of the yearly incident series.

pub mod aggregator;
pub mod anomaly;
pub mod change;
pub mod stats;

pub use aggregator::{baseline, top_types, top_types_for_year, yearly_counts};
pub use anomaly::{ranked_flags, zscore_flags, DEFAULT_THRESHOLD};
pub use change::{largest_changes, year_over_year};
