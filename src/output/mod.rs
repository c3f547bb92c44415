//! Output module
//!
//! Handles encoding cleaned batches for the destination store.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Writing batches as CSV
//! - Inferring Arrow schemas from batch columns
//! - Converting batches to Arrow RecordBatches
//! - Writing Parquet files

mod schema;
mod writer;

pub use schema::{batch_to_arrow, infer_column_type, infer_schema};
pub use writer::{
    encode, encode_csv, encode_csv_with_delimiter, encode_parquet, OutputFormat,
    ParquetWriterConfig,
};
