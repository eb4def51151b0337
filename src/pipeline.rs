//! Pipeline orchestration and dataset assembly.
//!
//! Reads each configured report file, normalizes it to long form, then
//! concatenates, sorts, deduplicates, and optionally prunes the combined
//! dataset. Per-file problems are logged and skipped; processing always
//! continues to the remaining files.

use crate::cache::DatasetCache;
use crate::columns::{read_report_csv, COUNTY_NAME, REPORT_MONTH};
use crate::config::{AbsentValuePolicy, PipelineConfig};
use crate::constants::REPORT_MONTH_FORMAT;
use crate::dates::build_dates;
use crate::error::{CaseloadError, Result};
use crate::metrics::{resolve_metric_columns, MetricDictionary};
use crate::models::{Dataset, LoadReport, LoadStats, NormalizedRow, Table};
use crate::resolver::SearchPath;
use crate::sanitize::{coerce_value, filter_county_rows};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The normalization pipeline: configuration plus a result cache keyed by
/// the input configuration snapshot.
pub struct Pipeline {
    config: PipelineConfig,
    cache: DatasetCache,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replace the configuration. Any change clears the cache wholesale:
    /// parts of the configuration (policies, search dirs) are invisible to
    /// the cache key, so surviving entries could otherwise be served later
    /// under a policy they were not computed with.
    pub fn set_config(&mut self, config: PipelineConfig) {
        if config != self.config {
            self.cache.clear();
        }
        self.config = config;
    }

    /// Load the dataset, reusing the cached result when the configuration
    /// is unchanged.
    pub fn load(&mut self) -> Result<Arc<LoadReport>> {
        if let Some(cached) = self.cache.get(&self.config) {
            debug!("Returning cached dataset for unchanged configuration");
            return Ok(cached);
        }
        let report = load_all(&self.config)?;
        Ok(self.cache.insert(&self.config, report))
    }
}

/// Run one complete load cycle: read every configured file, assemble the
/// long-form dataset, and collect the human-readable load log.
pub fn load_all(config: &PipelineConfig) -> Result<LoadReport> {
    if config.files.is_empty() {
        return Err(CaseloadError::configuration("no report files configured"));
    }

    let dictionary = MetricDictionary::from_source(&config.metric_source)?;
    let search = SearchPath::new(config.search_dirs.clone());

    let mut logs = Vec::new();
    let mut stats = LoadStats::default();
    let mut rows: Vec<NormalizedRow> = Vec::new();

    for filename in &config.files {
        let Some(path) = search.resolve(filename) else {
            logs.push(format!("{filename}: missing"));
            stats.files_missing += 1;
            continue;
        };

        let table = match read_report_csv(&path, &config.header_candidates) {
            Ok((table, header_idx)) => {
                logs.push(format!("{filename}: read with header={header_idx}"));
                table
            }
            Err(CaseloadError::UnrecognizedHeader { .. }) => {
                logs.push(format!("{filename}: no usable header row, skipped"));
                stats.files_skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                logs.push(format!("{filename}: unreadable, skipped"));
                stats.files_skipped += 1;
                continue;
            }
        };

        match normalize_file(table, &dictionary, config) {
            Some(file_rows) => {
                debug!("{}: {} long-form rows", filename, file_rows.len());
                stats.files_read += 1;
                rows.extend(file_rows);
            }
            None => {
                logs.push(format!("{filename}: no usable rows, skipped"));
                stats.files_skipped += 1;
            }
        }
    }

    let mut dataset = assemble(rows, &mut stats);
    if config.prune_empty {
        prune_empty_groups(&mut dataset, &mut logs, &mut stats);
    }
    stats.rows_loaded = dataset.len();

    info!(
        "Load complete: {} rows from {} files ({} missing, {} skipped)",
        dataset.len(),
        stats.files_read,
        stats.files_missing,
        stats.files_skipped
    );

    Ok(LoadReport {
        dataset,
        logs,
        stats,
    })
}

/// Normalize one file's wide table to long-form rows, or `None` when the
/// file contributes nothing usable.
fn normalize_file(
    mut table: Table,
    dictionary: &MetricDictionary,
    config: &PipelineConfig,
) -> Option<Vec<NormalizedRow>> {
    if table.column_index(COUNTY_NAME).is_none() {
        debug!("No County_Name column after normalization");
        return None;
    }

    filter_county_rows(&mut table);
    if table.is_empty() {
        return None;
    }

    // One calendar date per row; rows where no date parses are discarded.
    let (dates, _source) = build_dates(&table)?;
    table.retain_rows(&dates.iter().map(Option::is_some).collect::<Vec<_>>());
    let dates: Vec<_> = dates.into_iter().flatten().collect();
    if table.is_empty() {
        return None;
    }

    let county_idx = table.column_index(COUNTY_NAME)?;
    let report_month_idx = table.column_index(REPORT_MONTH);
    let metric_columns = resolve_metric_columns(&table, dictionary);
    if metric_columns.is_empty() {
        debug!("No resolvable metric columns");
        return None;
    }

    // Wide to long: one row per (date, county, metric).
    let mut rows = Vec::with_capacity(table.rows.len() * metric_columns.len());
    for metric in &metric_columns {
        for (row, date) in table.rows.iter().zip(dates.iter()) {
            let value = coerce_value(&row[metric.column_index], config.suppression);
            if value.is_none() && config.absent_values == AbsentValuePolicy::Drop {
                continue;
            }
            let report_month = match report_month_idx {
                Some(idx) if !row[idx].trim().is_empty() => row[idx].trim().to_string(),
                _ => date.format(REPORT_MONTH_FORMAT).to_string(),
            };
            rows.push(NormalizedRow {
                date: *date,
                report_month,
                county: row[county_idx].clone(),
                metric: metric.metric.clone(),
                value,
            });
        }
    }

    Some(rows)
}

/// Sort chronologically (stable, so file-list order breaks ties) and
/// deduplicate keeping the first occurrence per (date, county, metric).
fn assemble(mut rows: Vec<NormalizedRow>, stats: &mut LoadStats) -> Dataset {
    rows.sort_by_key(|row| row.date);

    let mut seen = HashSet::new();
    let before = rows.len();
    rows.retain(|row| seen.insert((row.date, row.county.clone(), row.metric.clone())));
    stats.duplicates_removed = before - rows.len();
    if stats.duplicates_removed > 0 {
        debug!("Removed {} duplicate observations", stats.duplicates_removed);
    }

    Dataset { rows }
}

/// Sum of a group's values: `None` when every value is absent, otherwise
/// the sum of the present values. The distinction only matters for logging;
/// both absent and zero totals are pruned.
fn group_sum(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut total = None;
    for value in values.flatten() {
        total = Some(total.unwrap_or(0.0) + value);
    }
    total
}

fn prune_reason(sum: Option<f64>) -> Option<&'static str> {
    match sum {
        None => Some("no values reported"),
        Some(total) if total == 0.0 => Some("all reported values zero"),
        Some(_) => None,
    }
}

/// Remove metrics and counties whose value total is absent or exactly zero
/// across the whole assembled dataset, logging each removal.
fn prune_empty_groups(dataset: &mut Dataset, logs: &mut Vec<String>, stats: &mut LoadStats) {
    let metrics: Vec<String> = dataset.metrics().iter().map(|m| m.to_string()).collect();
    let counties: Vec<String> = dataset.counties().iter().map(|c| c.to_string()).collect();

    let mut pruned_metrics = HashSet::new();
    for metric in &metrics {
        let sum = group_sum(
            dataset
                .rows
                .iter()
                .filter(|row| &row.metric == metric)
                .map(|row| row.value),
        );
        if let Some(reason) = prune_reason(sum) {
            logs.push(format!("pruned metric '{metric}': {reason}"));
            pruned_metrics.insert(metric.clone());
        }
    }

    let mut pruned_counties = HashSet::new();
    for county in &counties {
        let sum = group_sum(
            dataset
                .rows
                .iter()
                .filter(|row| &row.county == county)
                .map(|row| row.value),
        );
        if let Some(reason) = prune_reason(sum) {
            logs.push(format!("pruned county '{county}': {reason}"));
            pruned_counties.insert(county.clone());
        }
    }

    stats.metrics_pruned = pruned_metrics.len();
    stats.counties_pruned = pruned_counties.len();
    if pruned_metrics.is_empty() && pruned_counties.is_empty() {
        return;
    }

    dataset
        .rows
        .retain(|row| !pruned_metrics.contains(&row.metric) && !pruned_counties.contains(&row.county));
    info!(
        "Pruned {} metrics and {} counties with no non-zero data",
        stats.metrics_pruned, stats.counties_pruned
    );
}
