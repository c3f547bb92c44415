//! Tests for normalize module

use super::*;
use crate::batch::{Batch, Value};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

const HEADER: &[&str] = &[
    "zpid",
    "scraping_datetime",
    "zillow_search_request",
    "on_market_date",
    "year_built",
    "property_subtype",
    "is_new_construction",
    "latitude",
    "zipcode",
    "price",
    "price_history",
    "bedrooms",
    "at_a_glance_facts",
    "city",
];

fn listing(zpid: Value, scraped: &str) -> Vec<Value> {
    vec![
        zpid,
        Value::from(scraped),
        Value::from(r#"{"x": 1, "filters": {"beds": 2}}"#),
        Value::from("2021-04-20"),
        Value::from("2000"),
        Value::from("['SingleFamily']"),
        Value::Bool(true),
        Value::from("47.61"),
        Value::Int(98101),
        Value::Float(350_000.0),
        Value::from("[('2021-01-01', 340000)]"),
        Value::from("3"),
        Value::from(r#"{"Type": "House", "Parking": {"spaces": 2}}"#),
        Value::from("Seattle"),
    ]
}

fn batch(rows: Vec<Vec<Value>>) -> Batch {
    Batch::from_rows(HEADER.iter().map(|s| (*s).to_string()).collect(), rows).unwrap()
}

// ============================================================================
// End-to-end Tests
// ============================================================================

#[test]
fn test_normalize_full_row() {
    let input = batch(vec![listing(Value::from("123.0"), "2021-05-01T10:00:00")]);
    let out = normalize(&input);

    assert_eq!(out.num_rows(), 1);
    assert_eq!(out.get(0, "zpid"), Some(&Value::Int(123)));
    assert_eq!(out.get(0, "year"), Some(&Value::Int(2021)));
    assert_eq!(out.get(0, "month"), Some(&Value::Int(5)));
    assert_eq!(out.get(0, "day"), Some(&Value::Int(1)));
    assert_eq!(out.get(0, "zillow_search_request_x"), Some(&Value::Int(1)));
    assert_eq!(
        out.get(0, "zillow_search_request_filters.beds"),
        Some(&Value::Int(2))
    );
    assert_eq!(out.get(0, "year_built"), Some(&Value::Int(2000)));
    assert_eq!(
        out.get(0, "property_subtype"),
        Some(&Value::List(vec![Value::from("SingleFamily")]))
    );
    assert_eq!(out.get(0, "is_new_construction"), Some(&Value::Bool(true)));
    assert_eq!(out.get(0, "latitude"), Some(&Value::Float(47.61)));
    assert_eq!(out.get(0, "zipcode"), Some(&Value::Int(98101)));
    assert_eq!(out.get(0, "price"), Some(&Value::Float(350_000.0)));
    assert_eq!(out.get(0, "bedrooms"), Some(&Value::Float(3.0)));
    assert_eq!(
        out.get(0, "price_history"),
        Some(&Value::List(vec![Value::List(vec![
            Value::from("2021-01-01"),
            Value::Int(340_000)
        ])]))
    );
    assert_eq!(
        out.get(0, "at_a_glance_facts_Parking.spaces"),
        Some(&Value::Int(2))
    );
    assert_eq!(out.get(0, "city"), Some(&Value::from("Seattle")));

    let on_market = NaiveDate::from_ymd_opt(2021, 4, 20)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(out.get(0, "on_market_date"), Some(&Value::DateTime(on_market)));
}

#[test]
fn test_normalize_column_layout() {
    let input = batch(vec![listing(Value::Int(1), "2021-05-01")]);
    let out = normalize(&input);

    assert!(out.has_column("scraping_datetime"));
    assert!(!out.has_column("zillow_search_request"));
    assert!(!out.has_column("at_a_glance_facts"));
    assert_eq!(
        out.column_names(),
        vec![
            "zpid",
            "scraping_datetime",
            "on_market_date",
            "year_built",
            "property_subtype",
            "is_new_construction",
            "latitude",
            "zipcode",
            "price",
            "price_history",
            "bedrooms",
            "city",
            "year",
            "month",
            "day",
            "zillow_search_request_x",
            "zillow_search_request_filters.beds",
            "at_a_glance_facts_Type",
            "at_a_glance_facts_Parking.spaces",
        ]
    );
}

#[test]
fn test_normalize_does_not_mutate_input() {
    let input = batch(vec![listing(Value::from("abc"), "2021-05-01")]);
    let snapshot = input.clone();
    let out = normalize(&input);
    assert_eq!(input, snapshot);
    assert_eq!(out.num_rows(), 0);
}

// ============================================================================
// Row Filtering Tests
// ============================================================================

#[test]
fn test_non_numeric_identifier_dropped() {
    let input = batch(vec![
        listing(Value::from("abc"), "2021-05-01T10:00:00"),
        listing(Value::from("77.9"), "2021-05-02T10:00:00"),
        listing(Value::Null, "2021-05-03T10:00:00"),
        listing(Value::from(""), "2021-05-04T10:00:00"),
    ]);
    let out = normalize(&input);

    assert_eq!(out.num_rows(), 2);
    assert_eq!(out.get(0, "zpid"), Some(&Value::Int(77)));
    assert_eq!(out.get(0, "day"), Some(&Value::Int(2)));
    assert_eq!(out.get(1, "zpid"), Some(&Value::Null));
    assert_eq!(out.get(1, "day"), Some(&Value::Int(3)));
}

#[test]
fn test_missing_identifier_kept_as_missing() {
    let mut input = batch(vec![listing(Value::Null, "2021-05-01")]);
    assert!(filter_identifier(&mut input, "zpid"));
    assert_eq!(input.num_rows(), 1);
    assert_eq!(input.get(0, "zpid"), Some(&Value::Null));
}

#[test]
fn test_blank_and_nan_identifier_cells_survive_decoding() {
    let body = "zpid,scraping_datetime,year_built\n\
                ,2021-05-01T10:00:00,2000\n\
                nan,2021-05-02T10:00:00,1999\n\
                7,2021-05-03T10:00:00,1998\n";
    let decoded = crate::decode::CsvDecoder::new().decode(body).unwrap();
    let out = normalize(&decoded);

    assert_eq!(out.num_rows(), 3);
    assert_eq!(
        out.values("zpid").unwrap(),
        &[Value::Null, Value::Null, Value::Int(7)][..]
    );
    assert_eq!(
        out.values("year_built").unwrap(),
        &[Value::Int(2000), Value::Int(1999), Value::Int(1998)][..]
    );
}

#[test]
fn test_nan_identifier_kept_as_missing() {
    let input = batch(vec![listing(Value::from("nan"), "2021-05-01")]);
    let out = normalize(&input);
    assert_eq!(out.num_rows(), 1);
    assert_eq!(out.get(0, "zpid"), Some(&Value::Null));
}

#[test]
fn test_unparseable_timestamp_dropped() {
    let input = batch(vec![
        listing(Value::Int(1), "yesterday"),
        listing(Value::Int(2), "2021-12-31 23:59:59"),
        listing(Value::Int(3), ""),
    ]);
    let out = normalize(&input);

    assert_eq!(out.num_rows(), 1);
    assert_eq!(out.get(0, "zpid"), Some(&Value::Int(2)));
    assert_eq!(
        (out.get(0, "year"), out.get(0, "month"), out.get(0, "day")),
        (
            Some(&Value::Int(2021)),
            Some(&Value::Int(12)),
            Some(&Value::Int(31))
        )
    );
}

// ============================================================================
// Value Degradation Tests
// ============================================================================

#[test]
fn test_bad_values_become_missing() {
    let mut row = listing(Value::Int(9), "2021-05-01");
    row[3] = Value::from("soon");
    row[4] = Value::from("unknown");
    row[5] = Value::from("SingleFamily");
    row[6] = Value::from("true");
    row[7] = Value::Null;
    row[8] = Value::from("98101-1234");
    row[9] = Value::from("$350k");
    row[10] = Value::Int(5);
    let out = normalize(&batch(vec![row]));

    assert_eq!(out.num_rows(), 1);
    for column in [
        "on_market_date",
        "year_built",
        "property_subtype",
        "is_new_construction",
        "latitude",
        "zipcode",
        "price",
        "price_history",
    ] {
        assert_eq!(out.get(0, column), Some(&Value::Null), "{column}");
    }
}

#[test]
fn test_malformed_json_rows_get_missing_derived_values() {
    let mut bad = listing(Value::Int(2), "2021-05-02");
    bad[2] = Value::from("{not json");
    bad[12] = Value::Null;
    let input = batch(vec![listing(Value::Int(1), "2021-05-01"), bad]);
    let out = normalize(&input);

    assert_eq!(out.num_rows(), 2);
    assert_eq!(out.get(1, "zillow_search_request_x"), Some(&Value::Null));
    assert_eq!(out.get(1, "at_a_glance_facts_Type"), Some(&Value::Null));
    assert_eq!(
        out.get(0, "at_a_glance_facts_Type"),
        Some(&Value::from("House"))
    );
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_missing_columns_are_skipped() {
    let input = Batch::from_rows(
        vec!["zpid".to_string(), "price".to_string()],
        vec![vec![Value::from("5"), Value::from("10.5")]],
    )
    .unwrap();
    let out = normalize(&input);

    assert_eq!(out.column_names(), vec!["zpid", "price"]);
    assert_eq!(out.get(0, "zpid"), Some(&Value::Int(5)));
    assert_eq!(out.get(0, "price"), Some(&Value::Float(10.5)));
}

#[test]
fn test_custom_column_names() {
    let columns = ColumnConfig {
        identifier: "listing_id".to_string(),
        timestamp: "scraped_at".to_string(),
        float_columns: vec!["sqft".to_string()],
        ..ColumnConfig::default()
    };
    let input = Batch::from_rows(
        vec![
            "listing_id".to_string(),
            "scraped_at".to_string(),
            "sqft".to_string(),
        ],
        vec![
            vec![Value::from("10"), Value::from("2022-01-15"), Value::from("1200")],
            vec![Value::from("x"), Value::from("2022-01-15"), Value::from("900")],
        ],
    )
    .unwrap();

    let out = Normalizer::new(columns).normalize(&input);
    assert_eq!(out.num_rows(), 1);
    assert_eq!(out.get(0, "listing_id"), Some(&Value::Int(10)));
    assert_eq!(out.get(0, "sqft"), Some(&Value::Float(1200.0)));
    assert_eq!(out.get(0, "year"), Some(&Value::Int(2022)));
}

#[test]
fn test_expected_columns() {
    let columns = ColumnConfig::default();
    let expected = columns.expected_columns();
    assert_eq!(expected.len(), 13);
    assert_eq!(expected[0], "scraping_datetime");
    assert!(expected.contains(&"bedrooms"));
}
