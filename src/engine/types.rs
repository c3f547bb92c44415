//! Engine types
//!
//! Per-file reports and run statistics.

use serde::Serialize;

/// Result of processing one source object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Key read from the source location
    pub source_key: String,
    /// Key written in the destination location
    pub destination_key: String,
    /// Rows decoded from the source file
    pub rows_in: usize,
    /// Rows left after normalization
    pub rows_out: usize,
}

impl FileReport {
    /// Rows dropped by normalization
    pub fn rows_dropped(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }
}

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// One report per processed file, in processing order
    pub files: Vec<FileReport>,
    /// Total rows read
    pub rows_in: usize,
    /// Total rows written
    pub rows_out: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed file
    pub fn add_file(&mut self, report: FileReport) {
        self.rows_in += report.rows_in;
        self.rows_out += report.rows_out;
        self.files.push(report);
    }

    /// Number of processed files
    pub fn files_processed(&self) -> usize {
        self.files.len()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
