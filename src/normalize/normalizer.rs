//! Record normalizer
//!
//! Runs the cleaning steps over a batch in a fixed order. Each step is also
//! exposed on its own and works on a single named column.

use super::coerce::{
    is_numeric, parse_datetime, to_array, to_bool, to_datetime, to_nullable_float,
    to_nullable_int,
};
use super::flatten::flatten_json_column;
use super::types::{ColumnConfig, DAY_COLUMN, MONTH_COLUMN, YEAR_COLUMN};
use crate::batch::{Batch, Value};
use chrono::{Datelike, NaiveDateTime};
use tracing::{debug, warn};

/// Normalizer for listing batches
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    columns: ColumnConfig,
}

impl Normalizer {
    /// Create a normalizer with custom column names
    pub fn new(columns: ColumnConfig) -> Self {
        Self { columns }
    }

    /// Get the column configuration
    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    /// Normalize a batch, returning a new one
    ///
    /// Never fails: bad values become missing, rows with an unparseable
    /// timestamp or identifier are dropped. Steps whose column is absent are
    /// skipped with a warning.
    pub fn normalize(&self, batch: &Batch) -> Batch {
        let c = &self.columns;
        let mut out = batch.clone();
        let rows_in = out.num_rows();

        decompose_timestamp(&mut out, &c.timestamp);
        filter_identifier(&mut out, &c.identifier);
        flatten_json_column(&mut out, &c.search_request);
        coerce_datetime(&mut out, &c.on_market_date);
        coerce_int(&mut out, &c.year_built);
        coerce_array(&mut out, &c.property_subtype);
        coerce_bool(&mut out, &c.is_new_construction);
        for column in &c.float_columns {
            coerce_float(&mut out, column);
        }
        coerce_int(&mut out, &c.zipcode);
        coerce_array(&mut out, &c.price_history);
        flatten_json_column(&mut out, &c.at_a_glance_facts);

        debug!(
            rows_in,
            rows_out = out.num_rows(),
            columns = out.num_columns(),
            "Normalized batch"
        );
        out
    }
}

/// Normalize a batch using the default column names
pub fn normalize(batch: &Batch) -> Batch {
    Normalizer::default().normalize(batch)
}

/// Parse the timestamp column and derive `year`, `month` and `day`
///
/// Rows whose timestamp does not parse are dropped. The timestamp column is
/// kept, holding parsed date-times.
pub fn decompose_timestamp(batch: &mut Batch, column: &str) -> bool {
    let Some(values) = batch.values(column) else {
        warn!(column, "Timestamp column not found, skipping");
        return false;
    };

    let parsed: Vec<_> = values.iter().map(parse_datetime).collect();
    let part = |f: fn(&NaiveDateTime) -> i64| -> Vec<Value> {
        parsed
            .iter()
            .map(|dt| dt.as_ref().map_or(Value::Null, |dt| Value::Int(f(dt))))
            .collect()
    };
    let years = part(|dt: &NaiveDateTime| i64::from(dt.year()));
    let months = part(|dt: &NaiveDateTime| i64::from(dt.month()));
    let days = part(|dt: &NaiveDateTime| i64::from(dt.day()));
    let mask: Vec<bool> = parsed.iter().map(Option::is_some).collect();

    batch.set_column(
        column,
        parsed
            .iter()
            .map(|dt| dt.map_or(Value::Null, Value::DateTime))
            .collect(),
    );
    batch.set_column(YEAR_COLUMN, years);
    batch.set_column(MONTH_COLUMN, months);
    batch.set_column(DAY_COLUMN, days);

    let before = batch.num_rows();
    batch.retain_rows(&mask);
    debug!(
        column,
        dropped = before - batch.num_rows(),
        "Dropped rows with unparseable timestamp"
    );
    true
}

/// Keep rows whose identifier is numeric and convert it to an integer
///
/// Rows whose identifier is present but not numeric are dropped. Missing
/// identifiers are kept as missing, the same as a `nan` identifier.
pub fn filter_identifier(batch: &mut Batch, column: &str) -> bool {
    let Some(values) = batch.values(column) else {
        warn!(column, "Identifier column not found, skipping");
        return false;
    };

    let mask: Vec<bool> = values
        .iter()
        .map(|v| v.is_null() || is_numeric(v))
        .collect();
    let before = batch.num_rows();
    batch.retain_rows(&mask);
    batch.map_column(column, to_nullable_int);
    debug!(
        column,
        dropped = before - batch.num_rows(),
        "Dropped rows with non-numeric identifier"
    );
    true
}

/// Coerce a column to date-times
pub fn coerce_datetime(batch: &mut Batch, column: &str) -> bool {
    apply(batch, column, to_datetime)
}

/// Coerce a column to nullable integers
pub fn coerce_int(batch: &mut Batch, column: &str) -> bool {
    apply(batch, column, to_nullable_int)
}

/// Coerce a column to nullable floats
pub fn coerce_float(batch: &mut Batch, column: &str) -> bool {
    apply(batch, column, to_nullable_float)
}

/// Keep booleans in a column, blank out everything else
pub fn coerce_bool(batch: &mut Batch, column: &str) -> bool {
    apply(batch, column, to_bool)
}

/// Parse array-like strings in a column
pub fn coerce_array(batch: &mut Batch, column: &str) -> bool {
    apply(batch, column, to_array)
}

fn apply(batch: &mut Batch, column: &str, f: fn(&Value) -> Value) -> bool {
    let applied = batch.map_column(column, f);
    if !applied {
        warn!(column, "Column not found, skipping coercion");
    }
    applied
}
