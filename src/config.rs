//! Pipeline configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! environment variables, then command-line flags.
//!
//! ```yaml
//! source: s3://listings-raw
//! destination: s3://listings-clean
//! source_prefix: raw-data/
//! destination_prefix: processed-data/
//! format: csv
//! columns:
//!   float_columns: [latitude, price, bedrooms, bathrooms]
//! ```

use crate::decode::DecoderConfig;
use crate::error::{Error, Result};
use crate::normalize::ColumnConfig;
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the source bucket
pub const ENV_SOURCE_BUCKET: &str = "SOURCE_BUCKET";

/// Environment variable naming the destination bucket
pub const ENV_DESTINATION_BUCKET: &str = "DESTINATION_BUCKET";

// ============================================================================
// Pipeline Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source location URL (e.g. `s3://bucket`, `/data/in`)
    pub source: Option<String>,

    /// Destination location URL
    pub destination: Option<String>,

    /// Prefix listed in the source location
    pub source_prefix: String,

    /// Prefix output keys are written under
    pub destination_prefix: String,

    /// Output file format
    pub format: OutputFormat,

    /// CSV decoding options
    pub decoder: DecoderConfig,

    /// Column names used by the normalizer
    pub columns: ColumnConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            source_prefix: "raw-data/".to_string(),
            destination_prefix: "processed-data/".to_string(),
            format: OutputFormat::default(),
            decoder: DecoderConfig::default(),
            columns: ColumnConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Fill unset locations from `SOURCE_BUCKET` / `DESTINATION_BUCKET`
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Fill unset locations from a variable lookup
    ///
    /// A bare bucket name becomes an `s3://` URL; values that already carry
    /// a scheme are used as-is.
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(bucket_url);
        if self.source.is_none() {
            self.source = lookup(ENV_SOURCE_BUCKET);
        }
        if self.destination.is_none() {
            self.destination = lookup(ENV_DESTINATION_BUCKET);
        }
        self
    }

    /// Check that both locations are set
    pub fn validate(&self) -> Result<()> {
        if self.source.is_none() {
            return Err(Error::missing_field("source"));
        }
        if self.destination.is_none() {
            return Err(Error::missing_field("destination"));
        }
        Ok(())
    }

    /// Get the source URL
    pub fn source_url(&self) -> Result<&str> {
        self.source
            .as_deref()
            .ok_or_else(|| Error::missing_field("source"))
    }

    /// Get the destination URL
    pub fn destination_url(&self) -> Result<&str> {
        self.destination
            .as_deref()
            .ok_or_else(|| Error::missing_field("destination"))
    }
}

/// Turn a bucket name into an S3 URL unless it already has a scheme
fn bucket_url(value: String) -> String {
    let value = value.trim().to_string();
    if value.contains("://") {
        value
    } else {
        format!("s3://{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.source_prefix, "raw-data/");
        assert_eq!(config.destination_prefix, "processed-data/");
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.columns.identifier, "zpid");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r"
source: s3://raw
format: parquet
columns:
  float_columns: [latitude, price, bedrooms, bathrooms]
decoder:
  delimiter: ';'
";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.source.as_deref(), Some("s3://raw"));
        assert_eq!(config.destination, None);
        assert_eq!(config.format, OutputFormat::Parquet);
        assert_eq!(config.columns.float_columns.len(), 4);
        assert_eq!(config.columns.timestamp, "scraping_datetime");
        assert_eq!(config.decoder.delimiter, ';');
        assert_eq!(config.source_prefix, "raw-data/");
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = PipelineConfig::from_yaml("format: [oops").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineConfig::load("/nonexistent/listing-etl.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "destination: gs://clean\n").unwrap();
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.destination.as_deref(), Some("gs://clean"));
    }

    #[test]
    fn test_env_fills_missing_locations() {
        let env: HashMap<&str, &str> = [
            (ENV_SOURCE_BUCKET, "listings-raw"),
            (ENV_DESTINATION_BUCKET, "r2://clean"),
        ]
        .into_iter()
        .collect();

        let config =
            PipelineConfig::default().with_env_from(|k| env.get(k).map(|v| (*v).to_string()));
        assert_eq!(config.source.as_deref(), Some("s3://listings-raw"));
        assert_eq!(config.destination.as_deref(), Some("r2://clean"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_does_not_override_file() {
        let config = PipelineConfig {
            source: Some("/data/in".to_string()),
            ..PipelineConfig::default()
        }
        .with_env_from(|_| Some("other".to_string()));
        assert_eq!(config.source.as_deref(), Some("/data/in"));
        assert_eq!(config.destination.as_deref(), Some("s3://other"));
    }

    #[test]
    fn test_env_ignores_blank_values() {
        let config = PipelineConfig::default().with_env_from(|_| Some("  ".to_string()));
        assert!(config.source.is_none());
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Missing required config field: source"
        );
    }
}
