//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Options left unset fall back to the
//! configuration file, then to built-in defaults.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Incident Trends - yearly incident statistics and anomaly report
///
/// Counts incidents per year, computes year-over-year change and
/// z-score anomaly flags, then writes a report and two charts.
///
/// Examples:
///   incident-trends --input incidents.csv
///   incident-trends --input incidents.csv --output-dir out --threshold 1.5
///   incident-trends --input incidents.csv --format json --no-charts
///   incident-trends --input incidents.csv --dry-run
///   incident-trends --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Incident dataset (delimited text with a header row)
    ///
    /// Must contain the start date and incident type columns.
    #[arg(short, long, value_name = "FILE", env = "INCIDENT_TRENDS_INPUT")]
    pub input: Option<PathBuf>,

    /// Directory receiving the report and charts
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .incident-trends.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// |z| at or above which a year is flagged as unusual
    #[arg(short, long, value_name = "Z")]
    pub threshold: Option<f64>,

    /// Number of year-over-year increases listed in the report
    #[arg(long, value_name = "COUNT")]
    pub top_n_increases: Option<usize>,

    /// Number of incident types listed for each flagged year
    #[arg(long, value_name = "COUNT")]
    pub top_n_types: Option<usize>,

    /// Field delimiter of the input file
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<String>,

    /// Report format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Analyse and print the summary without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .incident-trends.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(threshold) = self.threshold {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err("Threshold must be a positive number".to_string());
            }
        }

        if self.top_n_increases == Some(0) {
            return Err("--top-n-increases must be at least 1".to_string());
        }

        if self.top_n_types == Some(0) {
            return Err("--top-n-types must be at least 1".to_string());
        }

        if let Some(ref delimiter) = self.delimiter {
            if delimiter.len() != 1 || !delimiter.is_ascii() {
                return Err("Delimiter must be a single ASCII character".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
