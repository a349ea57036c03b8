//! JavaScript value types
//!
//! This module defines the runtime representation of JavaScript values and
//! the three equality algorithms that never call back into user code
//! ([`Value::same_value`], [`Value::same_value_zero`], [`Value::strict_equals`]).
//! Loose equality lives in `operations::compare` because it may run `valueOf`.

use super::object::{same_object, ObjectRef};
use super::operations::number::number_to_string;
use super::simd::SimdValue;
use super::symbol::Symbol;
use num_bigint::BigInt;
use std::fmt;
use std::rc::Rc;

/// A JavaScript value
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(Rc<str>),
    /// Symbol
    Symbol(Symbol),
    /// BigInt (arbitrary precision integer)
    BigInt(Rc<BigInt>),
    /// SIMD vector
    Simd(Rc<SimdValue>),
    /// Object (includes arrays, functions, etc.)
    Object(ObjectRef),
}

/// Language type of a value, as returned by `Type(x)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    BigInt,
    Simd,
    Object,
}

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    /// Create a BigInt value
    pub fn bigint(n: impl Into<BigInt>) -> Self {
        Value::BigInt(Rc::new(n.into()))
    }

    /// Classify this value
    pub fn get_type(&self) -> Type {
        match self {
            Value::Undefined => Type::Undefined,
            Value::Null => Type::Null,
            Value::Boolean(_) => Type::Boolean,
            Value::Number(_) => Type::Number,
            Value::String(_) => Type::String,
            Value::Symbol(_) => Type::Symbol,
            Value::BigInt(_) => Type::BigInt,
            Value::Simd(_) => Type::Simd,
            Value::Object(_) => Type::Object,
        }
    }

    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is nullish (null or undefined)
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if value is an object
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// The object payload, if any
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The number payload, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The symbol payload, if any
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    /// The BigInt payload, if any
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(n) => Some(n),
            _ => None,
        }
    }

    /// Read the number payload. Panics on any other tag.
    pub fn number_value(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            other => panic!("expected a Number, found {:?}", other.get_type()),
        }
    }

    /// Read the boolean payload. Panics on any other tag.
    pub fn boolean_value(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            other => panic!("expected a Boolean, found {:?}", other.get_type()),
        }
    }

    /// Read the string payload. Panics on any other tag.
    pub fn string_value(&self) -> &Rc<str> {
        match self {
            Value::String(s) => s,
            other => panic!("expected a String, found {:?}", other.get_type()),
        }
    }

    /// Read the object payload. Panics on any other tag.
    pub fn object_value(&self) -> &ObjectRef {
        match self {
            Value::Object(obj) => obj,
            other => panic!("expected an Object, found {:?}", other.get_type()),
        }
    }

    /// Get the typeof string
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::BigInt(_) => "bigint",
            Value::Simd(simd) => simd.simd_type().type_of(),
            Value::Object(obj) if obj.is_htmldda() => "undefined",
            Value::Object(obj) if obj.is_callable() => "function",
            Value::Object(_) => "object",
        }
    }

    /// SameValue: NaN equals NaN, +0 differs from -0
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => same_value_number(*a, *b),
            (Value::Simd(a), Value::Simd(b)) => a.same_value(b),
            _ => self.same_value_non_number(other),
        }
    }

    /// SameValueZero: NaN equals NaN, +0 equals -0
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::Simd(a), Value::Simd(b)) => a.same_value_zero(b),
            _ => self.same_value_non_number(other),
        }
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Simd(a), Value::Simd(b)) => a.strict_equals(b),
            _ => self.same_value_non_number(other),
        }
    }

    fn same_value_non_number(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => same_object(a, b),
            _ => false,
        }
    }
}

/// SameValue restricted to numbers
pub fn same_value_number(a: f64, b: f64) -> bool {
    if a.is_nan() {
        return b.is_nan();
    }
    a == b && a.is_sign_negative() == b.is_sign_negative()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(Rc::new(n))
    }
}

impl From<SimdValue> for Value {
    fn from(simd: SimdValue) -> Self {
        Value::Simd(Rc::new(simd))
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<Option<ObjectRef>> for Value {
    fn from(obj: Option<ObjectRef>) -> Self {
        obj.map_or(Value::Undefined, Value::Object)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Symbol(sym) => write!(f, "{}", sym.descriptive_string()),
            Value::BigInt(n) => write!(f, "{}n", n),
            Value::Simd(simd) => write!(f, "{}", simd),
            Value::Object(obj) => write!(f, "[object {}]", obj.class_name()),
        }
    }
}
