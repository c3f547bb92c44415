//! Output encoders
//!
//! CSV is the default output; Parquet is available for downstream
//! warehouses that prefer typed columns.

use super::schema::batch_to_arrow;
use crate::batch::Batch;
use crate::error::{Error, Result};
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};

// ============================================================================
// Output Format
// ============================================================================

/// Output file format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values (default)
    #[default]
    Csv,
    /// Parquet file
    Parquet,
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

// ============================================================================
// CSV
// ============================================================================

/// Encode a batch as CSV with a header row
pub fn encode_csv(batch: &Batch) -> Bytes {
    encode_csv_with_delimiter(batch, ',')
}

/// Encode a batch as CSV with a custom delimiter
///
/// Missing values are written as empty fields. Fields containing the
/// delimiter, a quote or a line break are quoted.
pub fn encode_csv_with_delimiter(batch: &Batch, delimiter: char) -> Bytes {
    if batch.num_columns() == 0 {
        return Bytes::new();
    }

    let mut out = String::new();
    push_record(
        &mut out,
        batch.columns().iter().map(|c| c.name.clone()),
        delimiter,
    );
    for row in 0..batch.num_rows() {
        push_record(
            &mut out,
            batch.columns().iter().map(|c| c.values[row].to_text()),
            delimiter,
        );
    }

    Bytes::from(out)
}

fn push_record(out: &mut String, fields: impl Iterator<Item = String>, delimiter: char) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        push_field(out, &field, delimiter);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str, delimiter: char) {
    let needs_quotes = field.contains(|c: char| c == delimiter || matches!(c, '"' | '\n' | '\r'));
    if needs_quotes {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

// ============================================================================
// Parquet
// ============================================================================

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Use ZSTD compression
    #[must_use]
    pub fn zstd(mut self) -> Self {
        self.compression = Compression::ZSTD(parquet::basic::ZstdLevel::default());
        self
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder =
                builder.set_statistics_enabled(parquet::file::properties::EnabledStatistics::None);
        }

        builder.build()
    }
}

/// Encode a batch as an in-memory Parquet file
pub fn encode_parquet(batch: &Batch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let record_batch = batch_to_arrow(batch)?;
    let props = config.build_properties();

    let mut writer = ArrowWriter::try_new(Vec::new(), record_batch.schema(), Some(props))
        .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;
    writer
        .write(&record_batch)
        .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;
    let buffer = writer
        .into_inner()
        .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;

    Ok(Bytes::from(buffer))
}

/// Encode a batch in the given format
pub fn encode(batch: &Batch, format: OutputFormat) -> Result<Bytes> {
    match format {
        OutputFormat::Csv => Ok(encode_csv(batch)),
        OutputFormat::Parquet => encode_parquet(batch, &ParquetWriterConfig::default()),
    }
}
