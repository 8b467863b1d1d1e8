//! Incident Trends - yearly incident statistics and anomaly report
//!
//! A CLI tool that loads a time-stamped incident dataset, counts incidents
//! per year, computes year-over-year change and z-score anomaly flags, and
//! writes a markdown (or JSON) report with two SVG charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (missing input, unusable dataset, unwritable output, bad config)

mod analysis;
mod charts;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod output;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use output::{ArtifactSink, FsSink, MemorySink};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Incident Trends v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_analysis(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .incident-trends.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!(
        "✅ Created {} with default settings.",
        config::DEFAULT_CONFIG_FILE
    );
    println!("   Edit it to set the input file, thresholds and output names.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete analysis workflow.
fn run_analysis(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;

    let spinner = stage_spinner(args.quiet);
    spinner.set_message(format!("Analysing {}", config.input.path.display()));

    // --dry-run renders every artifact in memory instead of on disk
    let mut preview = MemorySink::default();
    let mut files = FsSink::new(&config.output.dir);
    let sink: &mut dyn ArtifactSink = if args.dry_run {
        &mut preview
    } else {
        &mut files
    };
    let result = pipeline::run(&config, sink);
    spinner.finish_and_clear();
    let output = result?;

    if !args.quiet {
        print_summary(&output.analysis);
    }

    if args.dry_run {
        println!("🔍 Dry run: would write to {}", files.dir().display());
        for name in &output.report.artifacts {
            let size = preview.get(name).map_or(0, str::len);
            println!("   {} ({} bytes)", name, size);
        }
        println!("\n✅ Dry run complete. No files were written.");
        return Ok(());
    }

    if !args.quiet {
        println!("📝 Generated files:");
        for path in &output.written {
            println!("   {}", path.display());
        }
        println!(
            "\n✅ Analysis complete in {:.1}s. Report saved to: {}",
            start_time.elapsed().as_secs_f64(),
            config.report_path().display()
        );
    }

    Ok(())
}

/// Print the baseline, change series and flagged years.
fn print_summary(analysis: &pipeline::Analysis) {
    println!("\n===== Yearly incident baseline =====");
    println!("{}", report::console::format_baseline(&analysis.baseline));
    println!("\n===== Year-to-year % change =====");
    println!("{}", report::console::format_changes(&analysis.changes));
    println!("\n===== Unusual-year detection (z-scores) =====");
    println!("{}\n", report::console::format_flags(&analysis.anomalies));
}

/// Spinner shown while the dataset is loaded and analysed.
fn stage_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
