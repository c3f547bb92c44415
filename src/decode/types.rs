//! Decoder configuration

use serde::{Deserialize, Serialize};

/// Configuration for decoding CSV input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Field delimiter (default: comma)
    pub delimiter: char,
    /// Whether the first record is a header
    pub has_header: bool,
    /// Recognize integers, floats and booleans per cell
    pub infer_types: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
            infer_types: true,
        }
    }
}

impl DecoderConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first record is a header
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Enable or disable per-cell type inference
    #[must_use]
    pub fn with_type_inference(mut self, enabled: bool) -> Self {
        self.infer_types = enabled;
        self
    }
}
