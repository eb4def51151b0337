//! Pipeline configuration.
//!
//! The source reports come in near-duplicate variants that differ only in
//! metric resolution, suppression-marker handling, and pruning. One pipeline
//! serves them all, parameterized by an explicit configuration struct.

use crate::constants::{DEFAULT_REPORT_FILES, HEADER_ROW_CANDIDATES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How numbered cell columns resolve to metric names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricSource {
    /// Fixed ordered list: cell `n` maps to the `n`-th entry. Identifiers
    /// outside the list range are left unmapped.
    OrderedList(Vec<String>),
    /// External data dictionary file supplying composite labels. Identifiers
    /// absent from the dictionary fall back to a generic "Cell N" label.
    DictionaryFile(PathBuf),
}

/// Handling of the de-identification marker before numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuppressionPolicy {
    /// Strip the marker; values that still fail coercion become absent.
    Strip,
    /// Replace a fully suppressed value with zero before coercion.
    ZeroFill,
}

/// Handling of absent values in the long-form output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsentValuePolicy {
    /// Drop rows whose value did not coerce.
    Drop,
    /// Retain rows with an absent value.
    Retain,
}

/// Complete configuration for one pipeline instance.
///
/// Policies are fixed for the lifetime of the pipeline; they never mix
/// within one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Report filenames in precedence order; earlier files win ties.
    pub files: Vec<String>,
    /// Candidate directories searched for each filename, in order.
    pub search_dirs: Vec<PathBuf>,
    /// Header row indices tried when reading a report file.
    pub header_candidates: Vec<usize>,
    pub metric_source: MetricSource,
    pub suppression: SuppressionPolicy,
    pub absent_values: AbsentValuePolicy,
    /// Remove metrics/counties with no non-zero data across the corpus.
    pub prune_empty: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::ordered_list(
            DEFAULT_REPORT_FILES.iter().map(|s| s.to_string()).collect(),
            crate::constants::CA237_METRICS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl PipelineConfig {
    /// Ordered-list variant: suppressed values are stripped and absent
    /// values dropped from the long-form output.
    pub fn ordered_list(files: Vec<String>, metrics: Vec<String>) -> Self {
        Self {
            files,
            search_dirs: default_search_dirs(),
            header_candidates: HEADER_ROW_CANDIDATES.to_vec(),
            metric_source: MetricSource::OrderedList(metrics),
            suppression: SuppressionPolicy::Strip,
            absent_values: AbsentValuePolicy::Drop,
            prune_empty: false,
        }
    }

    /// Dictionary-file variant: unknown cells keep a generic label and
    /// absent values are retained in the long-form output.
    pub fn dictionary_file(files: Vec<String>, dictionary: PathBuf) -> Self {
        Self {
            files,
            search_dirs: default_search_dirs(),
            header_candidates: HEADER_ROW_CANDIDATES.to_vec(),
            metric_source: MetricSource::DictionaryFile(dictionary),
            suppression: SuppressionPolicy::Strip,
            absent_values: AbsentValuePolicy::Retain,
            prune_empty: false,
        }
    }

    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    pub fn with_suppression(mut self, policy: SuppressionPolicy) -> Self {
        self.suppression = policy;
        self
    }

    pub fn with_absent_values(mut self, policy: AbsentValuePolicy) -> Self {
        self.absent_values = policy;
        self
    }

    pub fn with_pruning(mut self, enabled: bool) -> Self {
        self.prune_empty = enabled;
        self
    }
}

/// Current working directory plus its `data` subdirectory.
fn default_search_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("."), PathBuf::from("data")]
}
