//! Value-level coercions
//!
//! Every function here is total: a value that cannot be converted becomes
//! [`Value::Null`] instead of an error.

use super::literal::parse_literal;
use crate::batch::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-time layouts tried after RFC 3339, most common first
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Date-time layouts carrying a UTC offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Date-only layouts
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Interpret a value as a number
///
/// Strings are trimmed and parsed as `f64`, so exponents, `nan` and `inf`
/// are accepted. Booleans count as 1 and 0.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Check if a value is parseable as a number
pub fn is_numeric(value: &Value) -> bool {
    parse_number(value).is_some()
}

/// Convert to a nullable integer, truncating toward zero
///
/// Missing stays missing. Unparseable, non-finite or out-of-range values
/// become missing.
pub fn to_nullable_int(value: &Value) -> Value {
    if let Value::Int(n) = value {
        return Value::Int(*n);
    }
    match parse_number(value) {
        Some(f) if f.is_finite() => {
            let t = f.trunc();
            // i64::MAX as f64 rounds up to 2^63, which is out of range
            if t >= i64::MIN as f64 && t < i64::MAX as f64 {
                Value::Int(t as i64)
            } else {
                Value::Null
            }
        }
        _ => Value::Null,
    }
}

/// Convert to a nullable float
///
/// Missing and NaN become missing; infinities are kept.
pub fn to_nullable_float(value: &Value) -> Value {
    match parse_number(value) {
        Some(f) if !f.is_nan() => Value::Float(f),
        _ => Value::Null,
    }
}

/// Keep booleans, turn everything else into missing
///
/// Strings such as `"true"` are not interpreted.
pub fn to_bool(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::Bool(*b),
        _ => Value::Null,
    }
}

/// Parse an array-like string into a list
///
/// A scalar literal becomes a one-element list. Non-strings and strings
/// that are not literals become missing.
pub fn to_array(value: &Value) -> Value {
    let Value::String(s) = value else {
        return Value::Null;
    };
    match parse_literal(s) {
        Ok(list @ Value::List(_)) => list,
        Ok(scalar) => Value::List(vec![scalar]),
        Err(_) => Value::Null,
    }
}

/// Convert to a date-time value, or missing
pub fn to_datetime(value: &Value) -> Value {
    parse_datetime(value).map_or(Value::Null, Value::DateTime)
}

/// Interpret a value as a date-time
pub fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::String(s) => parse_datetime_str(s),
        _ => None,
    }
}

/// Parse a date-time string
///
/// Values with an offset keep their local wall-clock time. A bare date is
/// midnight.
pub fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}
