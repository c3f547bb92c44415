//! Batch, column and value types

use crate::error::{Error, Result};
use chrono::{NaiveDateTime, Timelike};
use serde_json::Value as JsonValue;

// ============================================================================
// Value
// ============================================================================

/// A single cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Missing value
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Calendar date-time without a zone
    DateTime(NaiveDateTime),
    /// Ordered sequence (parsed array literal or JSON array)
    List(Vec<Value>),
    /// Ordered string-keyed mapping (parsed dict literal)
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Check if this is the missing marker
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload, if any
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the float payload, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean payload, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the date-time payload, if any
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get the list payload, if any
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short type name, used in log messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Convert to a JSON value
    ///
    /// Date-times become strings in the text format, non-finite floats
    /// become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(n) => JsonValue::Number((*n).into()),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map_or(JsonValue::Null, JsonValue::Number),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::DateTime(dt) => JsonValue::String(format_datetime(dt)),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Render as text, the way it is written to a CSV cell
    ///
    /// Missing renders as the empty string. Lists and maps render as
    /// compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => format_datetime(dt),
            Value::List(_) | Value::Map(_) => self.to_json().to_string(),
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(arr) => Value::List(arr.iter().map(Value::from).collect()),
            JsonValue::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Format a float so integral values keep a trailing `.0`
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return String::new();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = n.to_string();
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{s}.0")
    }
}

/// Format a date-time as `YYYY-MM-DD HH:MM:SS`, with microseconds when present
fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

// ============================================================================
// Column
// ============================================================================

/// A named column
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create a column of `len` missing values
    pub fn nulls(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, vec![Value::Null; len])
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the column has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing values
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

// ============================================================================
// Batch
// ============================================================================

/// An ordered set of equal-length columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Batch {
    /// Create an empty batch (no columns, no rows)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a batch from columns, checking they all have the same length
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != num_rows) {
            return Err(Error::Other(format!(
                "Column '{}' has {} values, expected {num_rows}",
                bad.name,
                bad.len()
            )));
        }
        Ok(Self { columns, num_rows })
    }

    /// Create a batch from a header and row-major records
    ///
    /// Short rows are padded with missing values; long rows are an error.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let width = header.len();
        let num_rows = rows.len();
        let mut columns: Vec<Column> = header
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(num_rows)))
            .collect();

        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(Error::Other(format!(
                    "Row {idx} has {} values, header has {width}",
                    row.len()
                )));
            }
            let missing = width - row.len();
            for (col, value) in columns
                .iter_mut()
                .zip(row.into_iter().chain(std::iter::repeat(Value::Null).take(missing)))
            {
                col.values.push(value);
            }
        }

        Ok(Self { columns, num_rows })
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of a column
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a column's values by name
    pub fn values(&self, name: &str) -> Option<&[Value]> {
        self.column(name).map(|c| c.values.as_slice())
    }

    /// Get a single cell
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name).and_then(|c| c.values.get(row))
    }

    /// Replace a column in place, or append it if it does not exist
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per row. Callers derive
    /// new columns from existing ones, so a mismatch is a bug.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) {
        if self.columns.is_empty() {
            self.num_rows = values.len();
        }
        assert_eq!(
            values.len(),
            self.num_rows,
            "column '{name}' length does not match batch"
        );
        match self.index_of(name) {
            Some(idx) => self.columns[idx].values = values,
            None => self.columns.push(Column::new(name, values)),
        }
    }

    /// Remove a column, returning it
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.index_of(name)?;
        Some(self.columns.remove(idx))
    }

    /// Apply a function to every value of a column
    ///
    /// Returns `false` if the column does not exist.
    pub fn map_column(&mut self, name: &str, f: impl Fn(&Value) -> Value) -> bool {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => {
                col.values = col.values.iter().map(f).collect();
                true
            }
            None => false,
        }
    }

    /// Keep only the rows whose mask entry is `true`
    ///
    /// # Panics
    ///
    /// Panics if the mask length differs from the row count.
    pub fn retain_rows(&mut self, mask: &[bool]) {
        assert_eq!(mask.len(), self.num_rows, "row mask length does not match batch");
        for col in &mut self.columns {
            let mut keep = mask.iter();
            col.values.retain(|_| keep.next().copied().unwrap_or(false));
        }
        self.num_rows = mask.iter().filter(|k| **k).count();
    }

    /// Get one row as `(column, value)` pairs
    pub fn row(&self, idx: usize) -> Option<Vec<(&str, &Value)>> {
        if idx >= self.num_rows {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.as_str(), &c.values[idx]))
                .collect(),
        )
    }
}
