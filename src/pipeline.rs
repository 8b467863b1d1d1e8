//! Pipeline orchestration.
//!
//! Load → aggregate → change / anomaly → charts → report. Each stage
//! consumes the immutable output of the previous one; the first error
//! stops the run.

use crate::analysis::{self, top_types};
use crate::charts;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::loader::{self, Dataset, LoadOptions};
use crate::models::{AnomalyTable, BaselineSummary, ChangeSeries, Incident, YearlyCounts};
use crate::output::ArtifactSink;
use crate::report::{self, ReportSettings, TrendReport};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Statistical results over the yearly series.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub counts: YearlyCounts,
    pub baseline: BaselineSummary,
    pub changes: ChangeSeries,
    pub anomalies: AnomalyTable,
}

/// Load the configured dataset.
pub fn load(config: &Config) -> Result<Dataset> {
    let options = LoadOptions::try_from(&config.input)?;
    let dataset = loader::load_incidents(&config.input.path, &options)?;
    if dataset.is_empty() {
        warn!("{} contains no records", config.input.path.display());
    }
    Ok(dataset)
}

/// Run the statistical stages over loaded incidents.
pub fn analyse(incidents: &[Incident], config: &Config) -> Result<Analysis> {
    let counts = analysis::yearly_counts(incidents)?;
    let baseline = analysis::baseline(&counts)?;
    info!(
        "Baseline {}–{}: mean {:.2}, stddev {:.2}",
        baseline.start_year, baseline.end_year, baseline.mean, baseline.stddev
    );

    let changes = analysis::year_over_year(&counts);
    debug!("{} year-over-year changes", changes.len());

    let anomalies = analysis::zscore_flags(&counts, config.analysis.threshold);
    info!(
        "Flagged years at |z| >= {}: {:?}",
        config.analysis.threshold,
        anomalies.flagged_years()
    );

    Ok(Analysis {
        counts,
        baseline,
        changes,
        anomalies,
    })
}

/// Names of the artifacts a run produces, in the order they are written.
pub fn artifact_names(config: &Config) -> Vec<String> {
    let mut names = Vec::new();
    if config.charts.enabled {
        names.push(config.output.trend_chart_file.clone());
        names.push(config.output.types_chart_file.clone());
    }
    names.push(config.output.report_file.clone());
    names
}

/// Assemble the report for an analysed dataset.
pub fn build_report(
    incidents: &[Incident],
    analysis: &Analysis,
    config: &Config,
) -> Result<TrendReport> {
    let settings = ReportSettings {
        threshold: config.analysis.threshold,
        top_n_increases: config.analysis.top_n_increases,
        top_n_types: config.analysis.top_n_types_per_flagged_year,
        artifacts: artifact_names(config),
    };

    report::build_report(
        incidents,
        &analysis.counts,
        &analysis.changes,
        &analysis.anomalies,
        &settings,
    )
}

/// Render charts and the report into the sink.
pub fn write_artifacts(
    incidents: &[Incident],
    analysis: &Analysis,
    report: &TrendReport,
    config: &Config,
    sink: &mut dyn ArtifactSink,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if config.charts.enabled {
        let trend = charts::year_trend_svg(&analysis.counts);
        written.push(sink.write(&config.output.trend_chart_file, &trend)?);

        let top_n = config.charts.top_n_types;
        let types = charts::top_types_svg(&top_types(incidents, top_n), top_n);
        written.push(sink.write(&config.output.types_chart_file, &types)?);
    }

    let content = match config.output.format {
        OutputFormat::Markdown => report::generate_markdown_report(report),
        OutputFormat::Json => report::generate_json_report(report)?,
    };
    written.push(sink.write(&config.output.report_file, &content)?);

    for path in &written {
        info!("Produced {}", path.display());
    }
    Ok(written)
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub analysis: Analysis,
    pub report: TrendReport,
    /// Artifact locations as reported by the sink.
    pub written: Vec<PathBuf>,
}

/// Run every stage end to end.
pub fn run(config: &Config, sink: &mut dyn ArtifactSink) -> Result<RunOutput> {
    let dataset = load(config)?;
    let analysis = analyse(&dataset.incidents, config)?;
    let report = build_report(&dataset.incidents, &analysis, config)?;
    let written = write_artifacts(&dataset.incidents, &analysis, &report, config, sink)?;

    Ok(RunOutput {
        analysis,
        report,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::output::{FsSink, MemorySink};
    use std::io::Write;

    fn write_dataset(rows: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "incident_id,incident_type,start_date").unwrap();
        for (i, (kind, date)) in rows.iter().enumerate() {
            writeln!(file, "{},{},{}", i, kind, date).unwrap();
        }
        file
    }

    fn config_for(path: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.input.path = path.to_path_buf();
        config
    }

    fn spike_rows() -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        for (year, n) in [(2014, 4), (2015, 5), (2016, 4), (2017, 5), (2018, 4), (2019, 5)] {
            for day in 0..n {
                rows.push(("Espionage", format!("{:02}/03/{}", day + 1, year)));
            }
        }
        for day in 0..20 {
            let kind = if day % 4 == 0 { "Data theft" } else { "Ransomware" };
            rows.push((kind, format!("{:02}/06/2020", day + 1)));
        }
        rows.push(("Espionage", "unknown".to_string()));
        rows
    }

    #[test]
    fn test_run_writes_all_artifacts() {
        let rows = spike_rows();
        let borrowed: Vec<(&str, &str)> = rows.iter().map(|(k, d)| (*k, d.as_str())).collect();
        let file = write_dataset(&borrowed);
        let config = config_for(file.path());

        let mut sink = MemorySink::default();
        let report = run(&config, &mut sink).unwrap().report;

        assert_eq!(report.yearly_counts.total(), 47);
        assert_eq!(report.flagged.len(), 1);
        assert_eq!(report.flagged[0].year, 2020);
        assert_eq!(report.flagged[0].top_types[0].incident_type, "Ransomware");
        assert_eq!(report.flagged[0].top_types[0].count, 15);

        assert!(sink.get("incidents_per_year.svg").unwrap().contains("<svg"));
        assert!(sink
            .get("top_incident_types.svg")
            .unwrap()
            .contains("Espionage"));
        let markdown = sink.get("report.md").unwrap();
        assert!(markdown.contains("## 4) What Drove the Spike?"));
        assert!(markdown.contains("- Ransomware: 15"));
    }

    #[test]
    fn test_run_is_deterministic() {
        let rows = spike_rows();
        let borrowed: Vec<(&str, &str)> = rows.iter().map(|(k, d)| (*k, d.as_str())).collect();
        let file = write_dataset(&borrowed);
        let config = config_for(file.path());

        let mut first = MemorySink::default();
        let mut second = MemorySink::default();
        run(&config, &mut first).unwrap();
        run(&config, &mut second).unwrap();

        assert_eq!(first.artifacts, second.artifacts);
    }

    #[test]
    fn test_run_without_charts_as_json() {
        let file = write_dataset(&[("A", "2019-01-01"), ("A", "2020-01-01")]);
        let mut config = config_for(file.path());
        config.charts.enabled = false;
        config.output.format = OutputFormat::Json;
        config.output.report_file = "report.json".to_string();

        let mut sink = MemorySink::default();
        let report = run(&config, &mut sink).unwrap().report;

        assert_eq!(sink.artifacts.len(), 1);
        assert_eq!(report.artifacts, vec!["report.json".to_string()]);
        let json: serde_json::Value =
            serde_json::from_str(sink.get("report.json").unwrap()).unwrap();
        assert_eq!(json["baseline"]["start_year"], 2019);
    }

    #[test]
    fn test_run_fails_on_undated_dataset() {
        let file = write_dataset(&[("A", "n/a"), ("B", "")]);
        let config = config_for(file.path());

        let mut sink = MemorySink::default();
        let err = run(&config, &mut sink).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
        assert!(sink.artifacts.is_empty());
    }

    #[test]
    fn test_run_fails_on_missing_input() {
        let config = config_for(std::path::Path::new("no/such/incidents.csv"));
        let mut sink = MemorySink::default();
        assert!(matches!(
            run(&config, &mut sink),
            Err(PipelineError::InputNotFound(_))
        ));
    }

    #[test]
    fn test_run_rejects_bad_delimiter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "incident_type;start_date").unwrap();
        writeln!(file, "Ransomware;2020-01-01").unwrap();
        let mut config = config_for(file.path());

        config.input.delimiter = ";;".to_string();
        let mut sink = MemorySink::default();
        assert!(matches!(
            run(&config, &mut sink),
            Err(PipelineError::InvalidConfig(_))
        ));
        assert!(sink.artifacts.is_empty());

        config.input.delimiter = ";".to_string();
        let output = run(&config, &mut sink).unwrap();
        assert_eq!(output.report.yearly_counts.total(), 1);
    }

    #[test]
    fn test_run_to_directory() {
        let file = write_dataset(&[("A", "2019-01-01"), ("B", "2020-01-01"), ("B", "2021-05-05")]);
        let out = tempfile::tempdir().unwrap();
        let config = config_for(file.path());

        let mut sink = FsSink::new(out.path());
        let output = run(&config, &mut sink).unwrap();
        assert_eq!(output.written.len(), 3);

        for name in artifact_names(&config) {
            assert!(out.path().join(&name).is_file(), "missing {}", name);
        }
    }
}
