//! Caseload Processor Library
//!
//! A Rust library for normalizing monthly county-level caseload CSV exports
//! (CalWORKs CA 237 CW / General Relief reports) into a canonical long-form
//! dataset ready for filtering and charting.
//!
//! This library provides tools for:
//! - Locating report files across a small set of candidate directories
//! - Detecting header rows and canonicalizing inconsistent column labels
//! - Reconciling heterogeneous date encodings into one calendar date per row
//! - Resolving numbered "cell" columns to metric names via an ordered list
//!   or an external data dictionary
//! - Coercing suppressed/dirty numeric values and reshaping wide to long form
//! - Deduplicating, sorting, and pruning the assembled dataset
//! - Caching results against the exact input configuration

pub mod cache;
pub mod columns;
pub mod config;
pub mod constants;
pub mod dates;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod sanitize;

pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use cache::DatasetCache;
pub use config::{AbsentValuePolicy, MetricSource, PipelineConfig, SuppressionPolicy};
pub use error::{CaseloadError, Result};
pub use metrics::MetricDictionary;
pub use models::{Dataset, LoadReport, NormalizedRow};
pub use pipeline::Pipeline;
