//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.incident-trends.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::error::PipelineError;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".incident-trends.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input dataset settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Output artifact settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Statistical analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// Input dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the incident dataset.
    #[serde(default = "default_input_path")]
    pub path: PathBuf,

    /// Field delimiter (a single ASCII character).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Column holding the incident start date.
    #[serde(default = "default_date_column")]
    pub date_column: String,

    /// Column holding the incident type label.
    #[serde(default = "default_type_column")]
    pub type_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            delimiter: default_delimiter(),
            date_column: default_date_column(),
            type_column: default_type_column(),
        }
    }
}

impl InputConfig {
    /// The delimiter as a byte; anything but one ASCII character is rejected.
    pub fn delimiter_byte(&self) -> crate::error::Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(PipelineError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("eurepoc_global_dataset_1_3.csv")
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_date_column() -> String {
    "start_date".to_string()
}

fn default_type_column() -> String {
    "incident_type".to_string()
}

/// Output artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving all artifacts.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Report file name.
    #[serde(default = "default_report_file")]
    pub report_file: String,

    /// Yearly trend chart file name.
    #[serde(default = "default_trend_chart_file")]
    pub trend_chart_file: String,

    /// Incident type chart file name.
    #[serde(default = "default_types_chart_file")]
    pub types_chart_file: String,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            report_file: default_report_file(),
            trend_chart_file: default_trend_chart_file(),
            types_chart_file: default_types_chart_file(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_file() -> String {
    "report.md".to_string()
}

fn default_trend_chart_file() -> String {
    "incidents_per_year.svg".to_string()
}

fn default_types_chart_file() -> String {
    "top_incident_types.svg".to_string()
}

/// Statistical analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// |z| at or above which a year is flagged.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Number of year-over-year increases listed in the report.
    #[serde(default = "default_top_n")]
    pub top_n_increases: usize,

    /// Number of incident types listed per flagged year.
    #[serde(default = "default_top_n")]
    pub top_n_types_per_flagged_year: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            top_n_increases: default_top_n(),
            top_n_types_per_flagged_year: default_top_n(),
        }
    }
}

fn default_threshold() -> f64 {
    crate::analysis::DEFAULT_THRESHOLD
}

fn default_top_n() -> usize {
    5
}

/// Chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Render charts at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of incident types in the type frequency chart.
    #[serde(default = "default_chart_top_n")]
    pub top_n_types: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_n_types: default_chart_top_n(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_chart_top_n() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref input) = args.input {
            self.input.path = input.clone();
        }
        if let Some(ref delimiter) = args.delimiter {
            self.input.delimiter = delimiter.clone();
        }

        if let Some(ref dir) = args.output_dir {
            self.output.dir = dir.clone();
        }
        if let Some(format) = args.format {
            self.output.format = format;
            // Keep the extension in step with the format unless renamed
            if format == OutputFormat::Json && self.output.report_file == default_report_file() {
                self.output.report_file = "report.json".to_string();
            }
        }

        if let Some(threshold) = args.threshold {
            self.analysis.threshold = threshold;
        }
        if let Some(n) = args.top_n_increases {
            self.analysis.top_n_increases = n;
        }
        if let Some(n) = args.top_n_types {
            self.analysis.top_n_types_per_flagged_year = n;
        }

        if args.no_charts {
            self.charts.enabled = false;
        }
    }

    /// Check the merged values; file settings bypass `Args::validate`.
    pub fn validate(&self) -> Result<()> {
        self.input.delimiter_byte()?;

        let threshold = self.analysis.threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            bail!("analysis.threshold must be a positive number, got {}", threshold);
        }

        let top_n = [
            ("analysis.top_n_increases", self.analysis.top_n_increases),
            (
                "analysis.top_n_types_per_flagged_year",
                self.analysis.top_n_types_per_flagged_year,
            ),
            ("charts.top_n_types", self.charts.top_n_types),
        ];
        for (key, value) in top_n {
            if value == 0 {
                bail!("{} must be at least 1", key);
            }
        }

        Ok(())
    }

    /// Full path of the report artifact.
    pub fn report_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.report_file)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
