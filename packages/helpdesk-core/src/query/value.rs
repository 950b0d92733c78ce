//! Loose comparison of JSON field values.
//!
//! Stored values are JSON scalars. Numbers compare numerically, check fields
//! stored as booleans compare as 0/1, and everything else compares as text
//! with null behaving like the empty string.

use std::cmp::Ordering;

use serde_json::Value;

/// Numeric view of a value, if it has one.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Text view of a scalar value; null becomes the empty string.
pub(crate) fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Numeric view used when one side is a number and the other a numeric string.
fn coerce_number(value: &Value) -> Option<f64> {
    as_number(value).or_else(|| match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Equality used by `=`, `!=`, `in` and `not in`.
pub(crate) fn loose_eq(actual: &Value, expected: &Value) -> bool {
    if as_number(actual).is_some() || as_number(expected).is_some() {
        if let (Some(a), Some(b)) = (coerce_number(actual), coerce_number(expected)) {
            return a == b;
        }
    }
    as_text(actual) == as_text(expected)
}

/// Ordering used by comparison filters. Returns `None` when `actual` is null.
pub(crate) fn compare(actual: &Value, expected: &Value) -> Option<Ordering> {
    if actual.is_null() {
        return None;
    }
    if as_number(actual).is_some() || as_number(expected).is_some() {
        if let (Some(a), Some(b)) = (coerce_number(actual), coerce_number(expected)) {
            return a.partial_cmp(&b);
        }
    }
    Some(as_text(actual).cmp(&as_text(expected)))
}

/// Total ordering used for sorting: null, then numbers, then text.
///
/// Values of different kinds never compare by content, so mixed columns
/// still sort consistently.
pub(crate) fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    sort_rank(a).cmp(&sort_rank(b)).then_with(|| match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => as_text(a).cmp(&as_text(b)),
    })
}

fn sort_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) | Value::Bool(_) => 1,
        _ => 2,
    }
}
