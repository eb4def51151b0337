//! Result caching keyed by the input configuration.
//!
//! Re-invoking the pipeline with an identical configuration returns the
//! previously computed dataset without re-reading files. The key is the
//! immutable input snapshot: the file list plus the metric configuration
//! (ordered name list, or the dictionary file path). Any change to either
//! produces a different key; the cache is populate-once-per-key.

use crate::config::{MetricSource, PipelineConfig};
use crate::models::LoadReport;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Immutable snapshot of the inputs a load depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    files: Vec<String>,
    metrics: Vec<String>,
}

impl CacheKey {
    pub fn from_config(config: &PipelineConfig) -> Self {
        let metrics = match &config.metric_source {
            MetricSource::OrderedList(names) => names.clone(),
            MetricSource::DictionaryFile(path) => {
                vec![format!("dictionary:{}", path.display())]
            }
        };
        Self {
            files: config.files.clone(),
            metrics,
        }
    }
}

/// Explicit memoization of load results.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<CacheKey, Arc<LoadReport>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, config: &PipelineConfig) -> Option<Arc<LoadReport>> {
        self.entries.get(&CacheKey::from_config(config)).cloned()
    }

    /// Store a computed result and return a shared handle to it.
    pub fn insert(&mut self, config: &PipelineConfig, report: LoadReport) -> Arc<LoadReport> {
        let report = Arc::new(report);
        self.entries
            .insert(CacheKey::from_config(config), Arc::clone(&report));
        report
    }

    /// Drop every cached result.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            debug!("Clearing {} cached load results", self.entries.len());
            self.entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
