//! Error types for the analysis pipeline.
//!
//! Every variant is fatal: the pipeline stops at the stage that raised it.
//! Degenerate statistics (zero spread, zero previous-year count) are not
//! errors and never reach this type.

use std::path::PathBuf;

/// Errors raised by the pipeline stages.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input dataset does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input dataset could not be read or parsed as delimited text.
    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required column is absent from the header row.
    #[error("required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    /// No record carries a parseable date, so no yearly statistic is defined.
    #[error("no incidents with a parseable date; yearly statistics are undefined")]
    EmptyDataset,

    /// An output artifact could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report model could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
