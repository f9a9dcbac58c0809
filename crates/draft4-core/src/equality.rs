//! # JSON-Aware Equality
//!
//! Structural equality used by `enum`: numbers compare by value across the
//! integer and float forms, arrays compare element-wise in order, objects
//! compare by key set and member values regardless of key order.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::number::Numeric;

/// Deep equality with numeric-value comparison.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| json_equal(v, other)))
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    // Exact unsigned comparison first: values above i64::MAX only have a
    // lossy float form.
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (Numeric::from_number_lossy(a), Numeric::from_number_lossy(b)) {
        (Some(x), Some(y)) => x.compare(y) == Some(Ordering::Equal),
        _ => false,
    }
}
