//! CSV decoder implementation

use super::types::DecoderConfig;
use crate::batch::{Batch, Value};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Tokens read as missing values
pub const NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// CSV decoder with configurable delimiter, header handling and inference
#[derive(Debug, Clone, Default)]
pub struct CsvDecoder {
    config: DecoderConfig,
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder from a config
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Get the decoder config
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode raw bytes, stripping a UTF-8 byte order mark
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Batch> {
        let body = std::str::from_utf8(bytes)?;
        self.decode(body.strip_prefix('\u{feff}').unwrap_or(body))
    }

    /// Decode a CSV body into a batch
    pub fn decode(&self, body: &str) -> Result<Batch> {
        let mut records = split_records(body, self.config.delimiter)?.into_iter();

        let header: Vec<String> = if self.config.has_header {
            match records.next() {
                Some(names) => dedupe_header(names),
                None => return Ok(Batch::new()),
            }
        } else {
            match records.as_slice().first() {
                Some(first) => (0..first.len()).map(|i| format!("column_{i}")).collect(),
                None => return Ok(Batch::new()),
            }
        };

        let width = header.len();
        let first_data_record = usize::from(self.config.has_header) + 1;
        let mut rows = Vec::new();

        for (idx, fields) in records.enumerate() {
            if fields.len() > width {
                return Err(Error::csv(
                    idx + first_data_record,
                    format!("expected {width} fields, saw {}", fields.len()),
                ));
            }
            rows.push(
                fields
                    .iter()
                    .map(|raw| parse_cell(raw, self.config.infer_types))
                    .collect(),
            );
        }

        debug!(rows = rows.len(), columns = width, "Decoded CSV");
        Batch::from_rows(header, rows)
    }
}

/// Split a CSV body into records of raw fields
///
/// Quoted fields may contain delimiters, doubled quotes and line breaks.
/// Blank lines are skipped.
fn split_records(body: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_quoted = false;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !field_quoted => {
                in_quotes = true;
                field_quoted = true;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                field_quoted = false;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_record(&mut records, &mut record, &mut field, field_quoted);
                field_quoted = false;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::csv(records.len() + 1, "unterminated quoted field"));
    }
    if !field.is_empty() || !record.is_empty() || field_quoted {
        end_record(&mut records, &mut record, &mut field, field_quoted);
    }

    Ok(records)
}

/// Close the current record, skipping blank lines
fn end_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    quoted: bool,
) {
    record.push(std::mem::take(field));
    let blank = record.len() == 1 && record[0].is_empty() && !quoted;
    let done = std::mem::take(record);
    if !blank {
        records.push(done);
    }
}

/// Make header names unique and non-empty
///
/// Repeated names get `.1`, `.2`, ... suffixes, skipping any suffix already
/// taken by another column; empty names become `Unnamed: {index}`.
fn dedupe_header(names: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = if name.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                name
            };
            let mut unique = name.clone();
            if used.contains(&unique) {
                let counter = counters.entry(name.clone()).or_insert(1);
                loop {
                    unique = format!("{name}.{counter}");
                    *counter += 1;
                    if !used.contains(&unique) {
                        break;
                    }
                }
            }
            used.insert(unique.clone());
            unique
        })
        .collect()
}

/// Parse a raw CSV field into a value
pub fn parse_cell(raw: &str, infer_types: bool) -> Value {
    let trimmed = raw.trim();
    if NA_VALUES.contains(&raw) || trimmed.is_empty() {
        return Value::Null;
    }
    if !infer_types {
        return Value::String(raw.to_string());
    }

    // Try integer
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Int(n);
    }

    // Try float
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return Value::Float(n);
        }
    }

    // Try boolean
    match trimmed {
        "True" | "TRUE" | "true" => return Value::Bool(true),
        "False" | "FALSE" | "false" => return Value::Bool(false),
        _ => {}
    }

    Value::String(raw.to_string())
}
