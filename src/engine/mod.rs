//! Execution engine module
//!
//! Main processing loop: list source CSV files, decode, normalize, encode
//! and write each one to the destination.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Pipeline` - Orchestrates a run over a source prefix
//! - `FileReport` / `RunSummary` - Row counts per file and per run
//! - `output_key` - Destination key derivation

mod types;

pub use types::{FileReport, RunSummary};

use crate::batch::Batch;
use crate::config::PipelineConfig;
use crate::decode::CsvDecoder;
use crate::error::Result;
use crate::normalize::Normalizer;
use crate::output::{self, OutputFormat};
use crate::storage::{join_key, StorageLocation};
use std::time::Instant;
use tracing::info;

/// Derive the destination key for a source key
///
/// Only the file name of the source key is kept; `.csv` becomes
/// `_processed.csv` (or `_processed.parquet`) and the result is placed
/// under `destination_prefix`.
pub fn output_key(source_key: &str, destination_prefix: &str, format: OutputFormat) -> String {
    let file_name = source_key.rsplit('/').next().unwrap_or(source_key);
    let suffix = format!("_processed.{}", format.extension());
    let renamed = if file_name.contains(".csv") {
        file_name.replace(".csv", &suffix)
    } else {
        format!("{file_name}{suffix}")
    };
    join_key(destination_prefix, &renamed)
}

/// Listing cleaning pipeline
pub struct Pipeline {
    config: PipelineConfig,
    decoder: CsvDecoder,
    normalizer: Normalizer,
}

impl Pipeline {
    /// Create a pipeline from a config
    pub fn new(config: PipelineConfig) -> Self {
        let decoder = CsvDecoder::with_config(config.decoder.clone());
        let normalizer = Normalizer::new(config.columns.clone());
        Self {
            config,
            decoder,
            normalizer,
        }
    }

    /// Get the config
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get the normalizer
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Decode CSV bytes and normalize the resulting batch
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<Batch> {
        let batch = self.decoder.decode_bytes(bytes)?;
        Ok(self.normalizer.normalize(&batch))
    }

    /// Process one source object and write the result to the destination
    pub async fn process_file(
        &self,
        source: &StorageLocation,
        destination: &StorageLocation,
        key: &str,
    ) -> Result<FileReport> {
        info!(source = %source.display_path(key), "Processing file");

        let bytes = source.read(key).await?;
        let raw = self.decoder.decode_bytes(&bytes)?;
        let cleaned = self.normalizer.normalize(&raw);

        let destination_key = output_key(key, &self.config.destination_prefix, self.config.format);
        let encoded = output::encode(&cleaned, self.config.format)?;
        let written = destination.write(&destination_key, encoded).await?;

        info!(
            destination = %written,
            rows_in = raw.num_rows(),
            rows_out = cleaned.num_rows(),
            "Processed file saved"
        );

        Ok(FileReport {
            source_key: key.to_string(),
            destination_key,
            rows_in: raw.num_rows(),
            rows_out: cleaned.num_rows(),
        })
    }

    /// Process every `.csv` object under the source prefix
    pub async fn run_with(
        &self,
        source: &StorageLocation,
        destination: &StorageLocation,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::new();

        let keys = source.list_csv(&self.config.source_prefix).await?;
        info!(
            prefix = %self.config.source_prefix,
            files = keys.len(),
            "Starting run"
        );

        for key in &keys {
            let report = self.process_file(source, destination, key).await?;
            summary.add_file(report);
        }

        summary.set_duration(start.elapsed().as_millis() as u64);
        info!(
            files = summary.files_processed(),
            rows_in = summary.rows_in,
            rows_out = summary.rows_out,
            duration_ms = summary.duration_ms,
            "Run complete"
        );

        Ok(summary)
    }

    /// Open the configured locations and process every source file
    pub async fn run(&self) -> Result<RunSummary> {
        let (source, destination) = self.locations()?;
        self.run_with(&source, &destination).await
    }

    /// Open the configured source and destination locations
    pub fn locations(&self) -> Result<(StorageLocation, StorageLocation)> {
        self.config.validate()?;
        let source = StorageLocation::parse(self.config.source_url()?)?;
        let destination = StorageLocation::parse_destination(self.config.destination_url()?)?;
        Ok((source, destination))
    }
}
