//! Tests for batch module

use super::*;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample() -> Batch {
    Batch::from_rows(
        vec!["id".to_string(), "name".to_string()],
        vec![
            vec![Value::Int(1), Value::from("a")],
            vec![Value::Int(2), Value::from("b")],
            vec![Value::Int(3)],
        ],
    )
    .unwrap()
}

// ============================================================================
// Batch Construction Tests
// ============================================================================

#[test]
fn test_from_rows_pads_short_rows() {
    let batch = sample();
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(batch.num_columns(), 2);
    assert_eq!(batch.get(2, "name"), Some(&Value::Null));
}

#[test]
fn test_from_rows_rejects_long_rows() {
    let result = Batch::from_rows(
        vec!["a".to_string()],
        vec![vec![Value::Int(1), Value::Int(2)]],
    );
    assert!(result.is_err());
}

#[test]
fn test_from_columns_length_mismatch() {
    let result = Batch::from_columns(vec![
        Column::new("a", vec![Value::Int(1)]),
        Column::new("b", vec![]),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_empty_batch() {
    let batch = Batch::new();
    assert!(batch.is_empty());
    assert!(batch.column_names().is_empty());
    assert!(batch.row(0).is_none());
}

// ============================================================================
// Column Manipulation Tests
// ============================================================================

#[test]
fn test_set_column_appends_and_replaces() {
    let mut batch = sample();
    batch.set_column("flag", vec![Value::Bool(true); 3]);
    assert_eq!(batch.column_names(), vec!["id", "name", "flag"]);

    batch.set_column("id", vec![Value::Null; 3]);
    assert_eq!(batch.column_names(), vec!["id", "name", "flag"]);
    assert_eq!(batch.column("id").unwrap().null_count(), 3);
}

#[test]
fn test_set_column_on_empty_batch_sets_row_count() {
    let mut batch = Batch::new();
    batch.set_column("x", vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(batch.num_rows(), 2);
}

#[test]
#[should_panic(expected = "length does not match")]
fn test_set_column_wrong_length_panics() {
    let mut batch = sample();
    batch.set_column("bad", vec![Value::Null]);
}

#[test]
fn test_remove_column() {
    let mut batch = sample();
    let removed = batch.remove_column("id").unwrap();
    assert_eq!(removed.len(), 3);
    assert_eq!(batch.column_names(), vec!["name"]);
    assert!(batch.remove_column("id").is_none());
}

#[test]
fn test_map_column() {
    let mut batch = sample();
    let applied = batch.map_column("id", |v| match v {
        Value::Int(n) => Value::Int(n * 10),
        other => other.clone(),
    });
    assert!(applied);
    assert_eq!(batch.get(1, "id"), Some(&Value::Int(20)));
    assert!(!batch.map_column("missing", Clone::clone));
}

#[test]
fn test_retain_rows() {
    let mut batch = sample();
    batch.retain_rows(&[true, false, true]);
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(
        batch.values("id").unwrap(),
        &[Value::Int(1), Value::Int(3)]
    );
}

#[test]
fn test_row_access() {
    let batch = sample();
    let row = batch.row(0).unwrap();
    assert_eq!(row, vec![("id", &Value::Int(1)), ("name", &Value::from("a"))]);
}

// ============================================================================
// Value Tests
// ============================================================================

#[test]
fn test_value_to_text() {
    assert_eq!(Value::Null.to_text(), "");
    assert_eq!(Value::Bool(true).to_text(), "True");
    assert_eq!(Value::Int(-4).to_text(), "-4");
    assert_eq!(Value::Float(2000.0).to_text(), "2000.0");
    assert_eq!(Value::Float(37.5).to_text(), "37.5");
    assert_eq!(Value::Float(f64::NAN).to_text(), "");

    let dt = NaiveDate::from_ymd_opt(2021, 5, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    assert_eq!(Value::DateTime(dt).to_text(), "2021-05-01 10:00:00");

    let list = Value::List(vec![Value::from("Condo"), Value::Int(2)]);
    assert_eq!(list.to_text(), r#"["Condo",2]"#);
}

#[test]
fn test_value_datetime_with_fraction() {
    let dt = NaiveDate::from_ymd_opt(2021, 5, 1)
        .unwrap()
        .and_hms_micro_opt(10, 0, 0, 250_000)
        .unwrap();
    assert_eq!(Value::DateTime(dt).to_text(), "2021-05-01 10:00:00.250000");
}

#[test]
fn test_value_from_json() {
    let value = Value::from(&json!({"a": [1, 2.5, null], "b": "x"}));
    assert_eq!(
        value,
        Value::Map(vec![
            (
                "a".to_string(),
                Value::List(vec![Value::Int(1), Value::Float(2.5), Value::Null])
            ),
            ("b".to_string(), Value::from("x")),
        ])
    );
}

#[test]
fn test_value_from_option() {
    assert_eq!(Value::from(Some(3_i64)), Value::Int(3));
    assert_eq!(Value::from(None::<i64>), Value::Null);
}
