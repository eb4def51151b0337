//! Error handling for caseload processing operations.
//!
//! Per-file and per-row problems are recovered locally by the pipeline
//! (logged, skipped, processing continues); only systemic failures such as
//! an unreadable data dictionary surface as errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No usable header row in file: {path}")]
    UnrecognizedHeader { path: PathBuf },

    #[error("Invalid data dictionary {path}: {reason}")]
    InvalidDictionary { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CaseloadError {
    /// Attach file context to a csv error
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CaseloadError>;
