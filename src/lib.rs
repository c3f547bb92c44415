// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Listing ETL
//!
//! Batch cleaning for real-estate listing exports. CSV files are read from
//! object storage, normalized row by row and written back as CSV or Parquet.
//!
//! ## Features
//!
//! - **Row filtering**: Drop rows with an unparseable scrape timestamp or identifier
//! - **Type coercion**: Nullable integers, floats, booleans, date-times and arrays
//! - **JSON flattening**: Expand embedded JSON columns into prefixed scalar columns
//! - **Object storage**: S3, R2, GCS, Azure or a local directory
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listing_etl::config::PipelineConfig;
//! use listing_etl::engine::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> listing_etl::Result<()> {
//!     let config = PipelineConfig::default().with_env();
//!     let summary = Pipeline::new(config).run().await?;
//!     println!("{} rows written", summary.rows_out);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌─────────────┐   ┌──────────┐   ┌──────────┐
//! │ storage  │ → │  decode  │ → │  normalize  │ → │  output  │ → │ storage  │
//! │ list/get │   │CSV→Batch │   │filter/coerce│   │ CSV/Parq │   │   put    │
//! └──────────┘   └──────────┘   └─────────────┘   └──────────┘   └──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Columnar in-memory tables
pub mod batch;

/// Listing normalization steps
pub mod normalize;

/// CSV decoding
pub mod decode;

/// CSV/Arrow/Parquet output
pub mod output;

/// Object storage locations
pub mod storage;

/// Main execution engine
pub mod engine;

/// Pipeline configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

// Re-export commonly used types
pub use batch::{Batch, Column, Value};
pub use config::PipelineConfig;
pub use engine::Pipeline;
pub use normalize::{normalize, ColumnConfig, Normalizer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
