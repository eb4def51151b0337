//! Command line argument definitions for the caseload processor CLI.

use crate::config::{AbsentValuePolicy, PipelineConfig, SuppressionPolicy};
use crate::constants::{CA237_METRICS, DEFAULT_REPORT_FILES};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "caseload-processor",
    version,
    about = "Normalize county caseload CSV reports into a tidy long-form dataset"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Increase logging verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the normalization pipeline over the configured report files
    Process(ProcessArgs),
    /// Print the resolved metric dictionary
    Metrics(MetricsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ProcessArgs {
    /// Directory searched for report files, ahead of the working directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Report filenames in precedence order (defaults to the CA 237 CW
    /// fiscal-year exports); earlier files win deduplication ties
    #[arg(short, long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Resolve cell numbers through a data dictionary file instead of the
    /// built-in ordered metric list
    #[arg(long)]
    pub dictionary: Option<PathBuf>,

    /// Replace fully suppressed values ("*") with zero instead of absent
    #[arg(long)]
    pub zero_fill: bool,

    /// Keep rows whose value failed numeric coercion
    #[arg(long)]
    pub retain_absent: bool,

    /// Remove metrics/counties with no non-zero data across the corpus
    #[arg(long)]
    pub prune: bool,

    /// Output format for the dataset summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the per-file load log after the summary
    #[arg(long)]
    pub show_log: bool,
}

#[derive(clap::Args, Debug)]
pub struct MetricsArgs {
    /// Data dictionary file; omit to show the built-in ordered list
    #[arg(long)]
    pub dictionary: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl ProcessArgs {
    /// Translate CLI flags into a pipeline configuration.
    pub fn to_config(&self) -> PipelineConfig {
        let files = if self.files.is_empty() {
            DEFAULT_REPORT_FILES.iter().map(|s| s.to_string()).collect()
        } else {
            self.files.clone()
        };

        let mut config = match &self.dictionary {
            Some(path) => PipelineConfig::dictionary_file(files, path.clone()),
            None => PipelineConfig::ordered_list(
                files,
                CA237_METRICS.iter().map(|s| s.to_string()).collect(),
            ),
        };

        if let Some(dir) = &self.data_dir {
            config = config.with_search_dirs(vec![dir.clone(), PathBuf::from(".")]);
        }
        if self.zero_fill {
            config = config.with_suppression(SuppressionPolicy::ZeroFill);
        }
        if self.retain_absent {
            config = config.with_absent_values(AbsentValuePolicy::Retain);
        }
        config.with_pruning(self.prune)
    }
}
