//! Metric cell resolution.
//!
//! Source reports label metric columns with positional "cell" numbers
//! ("Cell 1", "CELL 12", or a bare "7"). This module resolves those
//! identifiers to canonical metric names, either from a fixed ordered list
//! or from an external data dictionary file.

use crate::columns::clean_label;
use crate::config::MetricSource;
use crate::constants::{DICTIONARY_LABEL_SEPARATOR, DICTIONARY_PREAMBLE_LINES};
use crate::error::{CaseloadError, Result};
use crate::models::Table;
use csv::ReaderBuilder;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Matches an optional "Cell" prefix followed by digits: "Cell 1", "CELL1", "1".
fn cell_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:cell\s*)?(\d+)$").expect("valid cell label regex"))
}

/// Extract the 1-based cell identifier from a cleaned column label.
pub fn cell_identifier(label: &str) -> Option<u32> {
    let cleaned = clean_label(label);
    let captures = cell_label_regex().captures(&cleaned)?;
    captures[1].parse().ok()
}

/// A mapping from positional cell identifiers to canonical metric names.
///
/// Identifiers are unique within one dictionary; lookups for unknown
/// identifiers fail closed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDictionary {
    names: HashMap<u32, String>,
    /// Metric names in cell-number order, for stable downstream ordering.
    ordered: Vec<(u32, String)>,
    /// Whether unknown identifiers fall back to a generic "Cell N" label.
    generic_fallback: bool,
}

impl MetricDictionary {
    /// Build from a fixed ordered list: index + 1 = cell number.
    pub fn from_ordered_list(metrics: &[String]) -> Self {
        let ordered: Vec<(u32, String)> = metrics
            .iter()
            .enumerate()
            .map(|(i, name)| (i as u32 + 1, name.clone()))
            .collect();
        Self {
            names: ordered.iter().cloned().collect(),
            ordered,
            generic_fallback: false,
        }
    }

    /// Load from a data dictionary CSV: one preamble line to skip, then five
    /// fixed columns (cell identifier, part label, item label, column label,
    /// unused). The composite metric name joins the non-empty label parts.
    pub fn from_dictionary_file(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| CaseloadError::csv(path, e))?;

        let mut ordered = Vec::new();
        let mut names = HashMap::new();

        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| CaseloadError::csv(path, e))?;
            if line < DICTIONARY_PREAMBLE_LINES {
                continue;
            }

            let field = |i: usize| record.get(i).map(clean_label).unwrap_or_default();
            let id: u32 = match field(0).parse() {
                Ok(id) => id,
                Err(_) => {
                    debug!("Skipping dictionary line {}: no cell identifier", line + 1);
                    continue;
                }
            };

            let label = [field(1), field(2), field(3)]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(DICTIONARY_LABEL_SEPARATOR);
            if label.is_empty() {
                debug!("Skipping dictionary cell {}: empty label", id);
                continue;
            }

            if names.contains_key(&id) {
                warn!("Duplicate cell identifier {} in {}", id, path.display());
                continue;
            }
            names.insert(id, label.clone());
            ordered.push((id, label));
        }

        if ordered.is_empty() {
            return Err(CaseloadError::InvalidDictionary {
                path: path.to_path_buf(),
                reason: "no cell definitions found".to_string(),
            });
        }

        ordered.sort_by_key(|(id, _)| *id);
        Ok(Self {
            names,
            ordered,
            generic_fallback: true,
        })
    }

    /// Build the dictionary named by a metric source.
    pub fn from_source(source: &MetricSource) -> Result<Self> {
        match source {
            MetricSource::OrderedList(metrics) => Ok(Self::from_ordered_list(metrics)),
            MetricSource::DictionaryFile(path) => Self::from_dictionary_file(path),
        }
    }

    /// Canonical name for a cell identifier, or `None` when unknown.
    pub fn resolve(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Name a cell column for the long-form output: known identifiers get
    /// their canonical name; unknown ones get "Cell N" in fallback mode and
    /// stay unmapped otherwise.
    fn output_name(&self, id: u32) -> Option<String> {
        match self.resolve(id) {
            Some(name) => Some(name.to_string()),
            None if self.generic_fallback => Some(format!("Cell {id}")),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// (identifier, name) pairs in cell-number order.
    pub fn entries(&self) -> &[(u32, String)] {
        &self.ordered
    }
}

/// A metric column discovered in a wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    pub column_index: usize,
    pub cell_id: u32,
    pub metric: String,
}

/// Identify cell columns and resolve their metric names.
///
/// Unmapped columns are not dropped or renamed: they keep their numeric
/// label in the wide table so raw values stay inspectable, but they do not
/// contribute to the long-form output.
pub fn resolve_metric_columns(table: &Table, dictionary: &MetricDictionary) -> Vec<MetricColumn> {
    let mut resolved = Vec::new();
    for (column_index, label) in table.columns.iter().enumerate() {
        let Some(cell_id) = cell_identifier(label) else {
            continue;
        };
        match dictionary.output_name(cell_id) {
            Some(metric) => resolved.push(MetricColumn {
                column_index,
                cell_id,
                metric,
            }),
            None => debug!("Cell {} outside dictionary range, left unmapped", cell_id),
        }
    }
    // Melt in cell-number order so per-file output ordering is stable.
    resolved.sort_by_key(|c| c.cell_id);
    resolved
}
