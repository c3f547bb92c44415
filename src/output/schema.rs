//! Arrow schema inference and batch to Arrow conversion

use crate::batch::{Batch, Value};
use crate::error::{Error, Result};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, NullArray, StringArray,
    TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Infer an Arrow schema for a batch
///
/// One nullable field per column, typed from the column's non-missing values.
pub fn infer_schema(batch: &Batch) -> Schema {
    let fields: Vec<Field> = batch
        .columns()
        .iter()
        .map(|col| Field::new(&col.name, infer_column_type(&col.values), true))
        .collect();
    Schema::new(fields)
}

/// Infer the Arrow type of a column
///
/// Mixed integers and floats widen to Float64; any other mix falls back to
/// Utf8. A column with only missing values is Null.
pub fn infer_column_type(values: &[Value]) -> DataType {
    values
        .iter()
        .filter(|v| !v.is_null())
        .map(infer_type)
        .fold(DataType::Null, |acc, t| merge_types(&acc, &t))
}

/// Convert a batch to an Arrow RecordBatch
pub fn batch_to_arrow(batch: &Batch) -> Result<RecordBatch> {
    let schema = infer_schema(batch);

    let columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(col, field)| build_array(&col.values, field.data_type()))
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(schema), columns, &options)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

/// Infer Arrow DataType from a single value
fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Int(_) => DataType::Int64,
        Value::Float(_) => DataType::Float64,
        Value::DateTime(_) => DataType::Timestamp(TimeUnit::Microsecond, None),
        Value::String(_) | Value::List(_) | Value::Map(_) => DataType::Utf8,
    }
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        // Same types
        (a, b) if a == b => a.clone(),

        // Null can merge with anything
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        // Numbers can merge (prefer Float64 for mixed)
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        // Different types -> fall back to String
        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from column values
fn build_array(values: &[Value], data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Null => Arc::new(NullArray::new(values.len())),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(Value::as_bool).collect();
            Arc::new(arr)
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(Value::as_i64).collect();
            Arc::new(arr)
        }

        DataType::Float64 => {
            let arr: Float64Array = values
                .iter()
                .map(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64)))
                .collect();
            Arc::new(arr)
        }

        DataType::Timestamp(TimeUnit::Microsecond, None) => {
            let arr: TimestampMicrosecondArray = values
                .iter()
                .map(|v| v.as_datetime().map(|dt| dt.and_utc().timestamp_micros()))
                .collect();
            Arc::new(arr)
        }

        _ => {
            // Everything else is written as text
            let arr: StringArray = values
                .iter()
                .map(|v| if v.is_null() { None } else { Some(v.to_text()) })
                .collect();
            Arc::new(arr)
        }
    }
}
