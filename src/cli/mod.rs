//! CLI module
//!
//! Command-line interface for the listing pipeline.
//!
//! # Commands
//!
//! - `run` - Process every CSV file under the source prefix
//! - `file` - Process a single source object
//! - `local` - Normalize a local CSV file
//! - `columns` - Print the column configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, LocationArgs};
pub use runner::Runner;
