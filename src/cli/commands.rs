//! Command implementations for the caseload processor CLI.
//!
//! Runs the pipeline, reports a summary in text or JSON, and surfaces the
//! per-file load log. An empty dataset after processing every file is the
//! one pipeline-level failure and halts with a nonzero exit.

use crate::cli::args::{Args, Command, MetricsArgs, OutputFormat, ProcessArgs};
use crate::metrics::MetricDictionary;
use crate::models::LoadReport;
use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Main command dispatcher.
pub fn run(args: Args) -> Result<()> {
    setup_logging(args.verbose);

    match args.command {
        Command::Process(process_args) => run_process(&process_args),
        Command::Metrics(metrics_args) => run_metrics(&metrics_args),
    }
}

fn setup_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_process(args: &ProcessArgs) -> Result<()> {
    let config = args.to_config();
    info!("Processing {} report files", config.files.len());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid spinner template"),
    );
    spinner.set_message("Loading report files...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut pipeline = Pipeline::new(config);
    let report = pipeline.load()?;

    spinner.finish_and_clear();

    if report.dataset.is_empty() {
        for line in &report.logs {
            eprintln!("  {}", line);
        }
        anyhow::bail!("no data loaded from any report file; check filenames and header rows");
    }

    match args.format {
        OutputFormat::Text => print_text_summary(&report, args.show_log),
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}

fn print_text_summary(report: &LoadReport, show_log: bool) {
    let stats = &report.stats;
    let dataset = &report.dataset;

    println!("{}", "Load Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Rows:".bright_cyan(),
        dataset.len().to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Counties:".bright_cyan(),
        dataset.counties().len().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Metrics:".bright_cyan(),
        dataset.metrics().len().to_string().bright_white()
    );
    if let Some((start, end)) = dataset.date_range() {
        println!("  {} {} to {}", "Range:".bright_cyan(), start, end);
    }
    println!(
        "  {} {} read, {} missing, {} skipped",
        "Files:".bright_cyan(),
        stats.files_read,
        stats.files_missing,
        stats.files_skipped
    );
    if stats.duplicates_removed > 0 {
        println!(
            "  {} {}",
            "Duplicates removed:".bright_cyan(),
            stats.duplicates_removed
        );
    }
    if stats.metrics_pruned > 0 || stats.counties_pruned > 0 {
        println!(
            "  {} {} metrics, {} counties",
            "Pruned:".bright_cyan(),
            stats.metrics_pruned,
            stats.counties_pruned
        );
    }

    if show_log {
        println!("\n{}", "Load Log".bright_yellow());
        for line in &report.logs {
            println!("  {}", line);
        }
    }
}

fn print_json(report: &LoadReport) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to encode dataset summary as JSON")?;
    println!("{json}");
    Ok(())
}

fn run_metrics(args: &MetricsArgs) -> Result<()> {
    let dictionary = match &args.dictionary {
        Some(path) => MetricDictionary::from_dictionary_file(path)?,
        None => MetricDictionary::from_ordered_list(
            &crate::constants::CA237_METRICS
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        ),
    };

    match args.format {
        OutputFormat::Text => {
            println!("{}", "Metric Dictionary".bright_green().bold());
            for (id, name) in dictionary.entries() {
                println!("  {} {}", format!("Cell {id:>3}").bright_cyan(), name);
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = dictionary
                .entries()
                .iter()
                .map(|(id, name)| serde_json::json!({ "cell": id, "metric": name }))
                .collect();
            let json = serde_json::to_string_pretty(&entries)
                .context("Failed to encode metric dictionary as JSON")?;
            println!("{json}");
        }
    }

    Ok(())
}
