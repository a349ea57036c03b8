//! Equality and relational comparison

use super::bigint::{compare_bigint_number, string_to_bigint};
use super::conversion::{to_numeric, to_primitive, PreferredType};
use super::number::string_to_number;
use crate::error::Result;
use crate::runtime::{Realm, Value};
use std::cmp::Ordering;

/// Strict Equality Comparison (`===`)
pub fn strict_equals(x: &Value, y: &Value) -> bool {
    x.strict_equals(y)
}

/// Abstract Equality Comparison (`==`)
pub fn abstract_equals(realm: &Realm, x: &Value, y: &Value) -> Result<bool> {
    if x.get_type() == y.get_type() {
        return Ok(x.strict_equals(y));
    }
    let htmldda = realm.options().htmldda_objects;
    match (x, y) {
        (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => Ok(true),
        (Value::Object(obj), Value::Null | Value::Undefined)
        | (Value::Null | Value::Undefined, Value::Object(obj))
            if htmldda && obj.is_htmldda() =>
        {
            Ok(true)
        }
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            Ok(*n == string_to_number(s))
        }
        (Value::BigInt(n), Value::String(s)) | (Value::String(s), Value::BigInt(n)) => {
            Ok(string_to_bigint(s).is_some_and(|parsed| parsed == **n))
        }
        (Value::Boolean(b), _) => abstract_equals(realm, &boolean_to_number(*b), y),
        (_, Value::Boolean(b)) => abstract_equals(realm, x, &boolean_to_number(*b)),
        (Value::Object(_), y_prim) if is_equality_primitive(y_prim) => {
            let x = to_primitive(realm, x, PreferredType::Default)?;
            abstract_equals(realm, &x, y)
        }
        (x_prim, Value::Object(_)) if is_equality_primitive(x_prim) => {
            let y = to_primitive(realm, y, PreferredType::Default)?;
            abstract_equals(realm, x, &y)
        }
        (Value::BigInt(n), Value::Number(m)) | (Value::Number(m), Value::BigInt(n)) => {
            Ok(compare_bigint_number(n, *m) == Some(Ordering::Equal))
        }
        _ => Ok(false),
    }
}

fn boolean_to_number(b: bool) -> Value {
    Value::Number(if b { 1.0 } else { 0.0 })
}

fn is_equality_primitive(value: &Value) -> bool {
    matches!(
        value,
        Value::Number(_) | Value::String(_) | Value::BigInt(_) | Value::Symbol(_) | Value::Simd(_)
    )
}

/// Abstract Relational Comparison for `x < y`.
///
/// Returns `None` for the "undefined" outcome (a NaN was involved or a
/// string could not be parsed as a BigInt). `left_first` controls which
/// operand is converted to a primitive first.
pub fn relational_comparison(
    realm: &Realm,
    x: &Value,
    y: &Value,
    left_first: bool,
) -> Result<Option<bool>> {
    let (px, py) = if left_first {
        let px = to_primitive(realm, x, PreferredType::Number)?;
        let py = to_primitive(realm, y, PreferredType::Number)?;
        (px, py)
    } else {
        let py = to_primitive(realm, y, PreferredType::Number)?;
        let px = to_primitive(realm, x, PreferredType::Number)?;
        (px, py)
    };

    match (&px, &py) {
        (Value::String(a), Value::String(b)) => {
            return Ok(Some(compare_utf16(a, b) == Ordering::Less));
        }
        (Value::BigInt(a), Value::String(b)) => {
            return Ok(string_to_bigint(b).map(|b| **a < b));
        }
        (Value::String(a), Value::BigInt(b)) => {
            return Ok(string_to_bigint(a).map(|a| a < **b));
        }
        _ => {}
    }

    let nx = to_numeric(realm, &px)?;
    let ny = to_numeric(realm, &py)?;
    let result = match (&nx, &ny) {
        (Value::Number(a), Value::Number(b)) => number_less_than(*a, *b),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a < b),
        (Value::BigInt(a), Value::Number(b)) => {
            compare_bigint_number(a, *b).map(|o| o == Ordering::Less)
        }
        (Value::Number(a), Value::BigInt(b)) => {
            compare_bigint_number(b, *a).map(|o| o == Ordering::Greater)
        }
        _ => unreachable!("ToNumeric produced a non-numeric value"),
    };
    Ok(result)
}

fn number_less_than(a: f64, b: f64) -> Option<bool> {
    if a.is_nan() || b.is_nan() {
        None
    } else {
        Some(a < b)
    }
}

/// Compare strings by UTF-16 code units
pub fn compare_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// `x < y`
pub fn less_than(realm: &Realm, x: &Value, y: &Value) -> Result<bool> {
    Ok(relational_comparison(realm, x, y, true)? == Some(true))
}

/// `x > y`
pub fn greater_than(realm: &Realm, x: &Value, y: &Value) -> Result<bool> {
    Ok(relational_comparison(realm, y, x, false)? == Some(true))
}

/// `x <= y`
pub fn less_than_or_equal(realm: &Realm, x: &Value, y: &Value) -> Result<bool> {
    Ok(relational_comparison(realm, y, x, false)? == Some(false))
}

/// `x >= y`
pub fn greater_than_or_equal(realm: &Realm, x: &Value, y: &Value) -> Result<bool> {
    Ok(relational_comparison(realm, x, y, true)? == Some(false))
}
