//! CLI commands and argument parsing

use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Real-estate listing cleaning pipeline
#[derive(Parser, Debug)]
#[command(name = "listing-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Location overrides shared by the storage commands
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Source location (s3://bucket, r2://bucket, gs://bucket, az://container or a local path)
    #[arg(long)]
    pub source: Option<String>,

    /// Destination location
    #[arg(long)]
    pub destination: Option<String>,

    /// Prefix output keys are written under
    #[arg(long)]
    pub destination_prefix: Option<String>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every CSV file under the source prefix
    Run {
        #[command(flatten)]
        locations: LocationArgs,

        /// Prefix listed in the source location
        #[arg(long)]
        source_prefix: Option<String>,
    },

    /// Process a single source object
    File {
        /// Source object key (e.g. raw-data/listings.csv)
        key: String,

        #[command(flatten)]
        locations: LocationArgs,
    },

    /// Normalize a local CSV file
    Local {
        /// Input CSV file
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Print the effective column configuration
    Columns,
}
