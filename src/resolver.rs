//! Report file location.
//!
//! Input sets are hand-maintained and partially present; a missing file is a
//! normal, loggable condition and must not abort the load.

use std::path::PathBuf;
use tracing::debug;

/// Ordered list of candidate directories searched for each report filename.
#[derive(Debug, Clone)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Return the first existing match for `filename`, or `None`.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        for dir in &self.dirs {
            let candidate = dir.join(filename);
            if candidate.exists() {
                debug!("Resolved {} to {}", filename, candidate.display());
                return Some(candidate);
            }
        }
        debug!("File not found in any candidate directory: {}", filename);
        None
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}
