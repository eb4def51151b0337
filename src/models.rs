//! Core data structures for caseload processing.
//!
//! Defines the wide table read from a report file, the long-form normalized
//! rows produced by the pipeline, and the load report returned to callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One report file in wide form: normalized column labels plus string cells.
///
/// Rows are padded or truncated to the column count at construction, so
/// indexing a row by a column index is always in bounds.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, aligning every row to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of a column by exact name, one per row.
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the rows whose index satisfies the mask.
    pub fn retain_rows(&mut self, mask: &[bool]) {
        let mut it = mask.iter();
        self.rows.retain(|_| *it.next().unwrap_or(&false));
    }
}

/// One observation in long form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub date: NaiveDate,
    pub report_month: String,
    pub county: String,
    pub metric: String,
    pub value: Option<f64>,
}

/// The assembled, date-ordered dataset: unique per (date, county, metric).
///
/// Treated as immutable by downstream consumers; filtering copies rather
/// than mutates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub rows: Vec<NormalizedRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date;
        let last = self.rows.last()?.date;
        Some((first, last))
    }

    /// Distinct county names in first-seen order.
    pub fn counties(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.county.as_str()) {
                seen.push(row.county.as_str());
            }
        }
        seen
    }

    /// Distinct metric names in first-seen order.
    pub fn metrics(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.metric.as_str()) {
                seen.push(row.metric.as_str());
            }
        }
        seen
    }
}

/// Per-run counters for reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadStats {
    pub files_read: usize,
    pub files_missing: usize,
    pub files_skipped: usize,
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub metrics_pruned: usize,
    pub counties_pruned: usize,
}

/// Everything one load cycle produces: the dataset plus the human-readable
/// log lines describing per-file read outcomes and pruning counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub dataset: Dataset,
    pub logs: Vec<String>,
    pub stats: LoadStats,
}
