//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, LocationArgs};
use crate::config::PipelineConfig;
use crate::engine::Pipeline;
use crate::error::{Error, Result};
use crate::output::{self, OutputFormat};
use anyhow::Context;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                locations,
                source_prefix,
            } => self.run_all(locations, source_prefix.as_deref()).await,
            Commands::File { key, locations } => self.run_file(key, locations).await,
            Commands::Local {
                input,
                output,
                format,
            } => self.run_local(input, output.as_deref(), *format),
            Commands::Columns => self.columns(),
        }
    }

    /// Build the effective config: file, then environment
    fn base_config(&self) -> Result<PipelineConfig> {
        let config = match &self.cli.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        Ok(config.with_env())
    }

    /// Build the effective config with command-line overrides applied last
    fn config_with(&self, args: &LocationArgs) -> Result<PipelineConfig> {
        let mut config = self.base_config()?;
        apply_overrides(&mut config, args);
        Ok(config)
    }

    /// Process every file under the source prefix
    async fn run_all(&self, args: &LocationArgs, source_prefix: Option<&str>) -> Result<()> {
        let mut config = self.config_with(args)?;
        if let Some(prefix) = source_prefix {
            config.source_prefix = prefix.to_string();
        }

        let summary = Pipeline::new(config).run().await?;
        println!("{}", serde_json::to_string(&summary)?);
        Ok(())
    }

    /// Process a single source object
    async fn run_file(&self, key: &str, args: &LocationArgs) -> Result<()> {
        let pipeline = Pipeline::new(self.config_with(args)?);
        let (source, destination) = pipeline.locations()?;

        let report = pipeline.process_file(&source, &destination, key).await?;
        println!("{}", serde_json::to_string(&report)?);
        Ok(())
    }

    /// Normalize a local CSV file
    fn run_local(
        &self,
        input: &Path,
        output_path: Option<&Path>,
        format: Option<OutputFormat>,
    ) -> Result<()> {
        let config = self.base_config()?;
        let format = format.unwrap_or(config.format);
        let pipeline = Pipeline::new(config);

        let bytes = fs::read(input).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound {
                path: input.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        let batch = pipeline.process_bytes(&bytes)?;
        let encoded = output::encode(&batch, format)?;

        match output_path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)
                            .with_context(|| format!("Failed to create {}", parent.display()))?;
                    }
                }
                fs::write(path, &encoded)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(
                    output = %path.display(),
                    rows = batch.num_rows(),
                    "Wrote normalized file"
                );
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&encoded)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Print the column configuration as YAML
    fn columns(&self) -> Result<()> {
        let config = self.base_config()?;
        print!("{}", serde_yaml::to_string(&config.columns)?);
        Ok(())
    }
}

/// Apply command-line location overrides
fn apply_overrides(config: &mut PipelineConfig, args: &LocationArgs) {
    if let Some(source) = &args.source {
        config.source = Some(source.clone());
    }
    if let Some(destination) = &args.destination {
        config.destination = Some(destination.clone());
    }
    if let Some(prefix) = &args.destination_prefix {
        config.destination_prefix = prefix.clone();
    }
    if let Some(format) = args.format {
        config.format = format;
    }
}
