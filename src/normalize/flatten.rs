//! JSON column flattening
//!
//! Replaces a column of JSON-encoded objects with one column per leaf path.
//! Nested keys are joined with `.` and every derived column is prefixed with
//! the original column name and `_`, so `{"a": {"b": 1}}` in column `C`
//! becomes column `C_a.b`.

use crate::batch::{Batch, Value};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Separator between nested keys
pub const PATH_SEPARATOR: char = '.';

/// Flatten a JSON column in place
///
/// The original column is removed and the derived columns are appended in
/// order of first appearance. Rows whose value is missing, malformed or not
/// a JSON object get missing values in every derived column. Returns `false`
/// if the column does not exist.
pub fn flatten_json_column(batch: &mut Batch, column: &str) -> bool {
    let Some(source) = batch.remove_column(column) else {
        warn!(column, "JSON column not found, skipping flatten");
        return false;
    };

    let num_rows = source.len();
    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<(usize, Value)>> = Vec::with_capacity(num_rows);
    let mut unparsed = 0usize;

    for value in &source.values {
        let mut fields = Vec::new();
        match parse_object(value) {
            Some(obj) => {
                for (path, leaf) in flatten_object(&obj) {
                    let pos = *positions.entry(path.clone()).or_insert_with(|| {
                        names.push(path);
                        names.len() - 1
                    });
                    fields.push((pos, leaf));
                }
            }
            None => unparsed += 1,
        }
        rows.push(fields);
    }

    let mut columns: Vec<Vec<Value>> = vec![vec![Value::Null; num_rows]; names.len()];
    for (row_idx, fields) in rows.into_iter().enumerate() {
        for (pos, leaf) in fields {
            columns[pos][row_idx] = leaf;
        }
    }

    debug!(
        column,
        derived = names.len(),
        unparsed,
        "Flattened JSON column"
    );

    for (name, values) in names.into_iter().zip(columns) {
        batch.set_column(&format!("{column}_{name}"), values);
    }
    true
}

/// Parse a cell as a JSON object
fn parse_object(value: &Value) -> Option<Map<String, JsonValue>> {
    let parsed = match value {
        Value::String(s) => serde_json::from_str::<JsonValue>(s).ok()?,
        Value::Map(_) => value.to_json(),
        _ => return None,
    };
    match parsed {
        JsonValue::Object(obj) => Some(obj),
        _ => None,
    }
}

/// Flatten an object into `(path, leaf)` pairs
///
/// Arrays and scalars are leaves. Empty nested objects contribute nothing.
pub fn flatten_object(obj: &Map<String, JsonValue>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(obj, None, &mut out);
    out
}

fn flatten_into(obj: &Map<String, JsonValue>, prefix: Option<&str>, out: &mut Vec<(String, Value)>) {
    for (key, value) in obj {
        let path = match prefix {
            Some(p) => format!("{p}{PATH_SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            JsonValue::Object(nested) => flatten_into(nested, Some(&path), out),
            leaf => out.push((path, Value::from(leaf))),
        }
    }
}
