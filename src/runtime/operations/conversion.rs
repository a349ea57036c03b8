//! Type conversion and type testing abstract operations

use super::bigint::bigint_to_string;
use super::number::{
    double_to_int16, double_to_int32, double_to_int8, double_to_integer, double_to_uint16,
    double_to_uint32, double_to_uint8, double_to_uint8_clamp, number_to_string, string_to_number,
};
use super::object::{get, get_method};
use crate::error::{messages, Error, Result};
use crate::runtime::indexed::MAX_LENGTH;
use crate::runtime::object::{ObjectRef, OrdinaryObject, PropertyKey};
use crate::runtime::realm::Intrinsic;
use crate::runtime::symbol::WellKnownSymbol;
use crate::runtime::{Realm, Value};
use num_traits::Zero;
use std::rc::Rc;

/// Conversion hint for ToPrimitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    Default,
    Number,
    String,
}

impl PreferredType {
    /// The hint string passed to `@@toPrimitive`
    pub fn as_str(self) -> &'static str {
        match self {
            PreferredType::Default => "default",
            PreferredType::Number => "number",
            PreferredType::String => "string",
        }
    }
}

/// ToPrimitive(input, hint)
pub fn to_primitive(realm: &Realm, input: &Value, hint: PreferredType) -> Result<Value> {
    let Value::Object(obj) = input else {
        return Ok(input.clone());
    };
    let exotic = get_method(realm, input, WellKnownSymbol::ToPrimitive.symbol())?;
    if let Some(exotic) = exotic {
        let result = exotic.call(realm, input, &[Value::from(hint.as_str())])?;
        if result.is_object() {
            return Err(Error::type_error(messages::NOT_PRIMITIVE));
        }
        return Ok(result);
    }
    let hint = match hint {
        PreferredType::Default => PreferredType::Number,
        other => other,
    };
    ordinary_to_primitive(realm, obj, hint)
}

/// OrdinaryToPrimitive(O, hint)
pub fn ordinary_to_primitive(realm: &Realm, obj: &ObjectRef, hint: PreferredType) -> Result<Value> {
    let method_names = if hint == PreferredType::String {
        ["toString", "valueOf"]
    } else {
        ["valueOf", "toString"]
    };
    let this = Value::Object(obj.clone());
    for name in method_names {
        let method = get(realm, obj, name)?;
        if let Value::Object(method) = &method {
            if method.is_callable() {
                let result = method.call(realm, &this, &[])?;
                if !result.is_object() {
                    return Ok(result);
                }
            }
        }
    }
    Err(Error::type_error(messages::NO_PRIMITIVE_REPRESENTATION))
}

/// ToBoolean(argument)
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Boolean(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Symbol(_) | Value::Simd(_) => true,
        Value::BigInt(n) => !n.is_zero(),
        Value::Object(obj) => !obj.is_htmldda(),
    }
}

/// ToNumber(argument)
pub fn to_number(realm: &Realm, value: &Value) -> Result<f64> {
    match value {
        Value::Undefined => Ok(f64::NAN),
        Value::Null => Ok(0.0),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(*n),
        Value::String(s) => Ok(string_to_number(s)),
        Value::Symbol(_) => Err(Error::type_error(messages::SYMBOL_TO_NUMBER)),
        Value::BigInt(_) => Err(Error::type_error(messages::BIGINT_TO_NUMBER)),
        Value::Simd(_) => Err(Error::type_error(messages::SIMD_TO_NUMBER)),
        Value::Object(_) => {
            let primitive = to_primitive(realm, value, PreferredType::Number)?;
            to_number(realm, &primitive)
        }
    }
}

/// ToNumeric(value): a Number or BigInt value
pub fn to_numeric(realm: &Realm, value: &Value) -> Result<Value> {
    let primitive = to_primitive(realm, value, PreferredType::Number)?;
    if let Value::BigInt(_) = primitive {
        return Ok(primitive);
    }
    Ok(Value::Number(to_number(realm, &primitive)?))
}

/// ToInteger(argument)
pub fn to_integer(realm: &Realm, value: &Value) -> Result<f64> {
    Ok(double_to_integer(to_number(realm, value)?))
}

/// ToInt32(argument)
pub fn to_int32(realm: &Realm, value: &Value) -> Result<i32> {
    match value {
        Value::Number(n) => Ok(double_to_int32(*n)),
        _ => Ok(double_to_int32(to_number(realm, value)?)),
    }
}

/// ToUint32(argument)
pub fn to_uint32(realm: &Realm, value: &Value) -> Result<u32> {
    Ok(double_to_uint32(to_number(realm, value)?))
}

/// ToInt16(argument)
pub fn to_int16(realm: &Realm, value: &Value) -> Result<i16> {
    Ok(double_to_int16(to_number(realm, value)?))
}

/// ToUint16(argument)
pub fn to_uint16(realm: &Realm, value: &Value) -> Result<u16> {
    Ok(double_to_uint16(to_number(realm, value)?))
}

/// ToInt8(argument)
pub fn to_int8(realm: &Realm, value: &Value) -> Result<i8> {
    Ok(double_to_int8(to_number(realm, value)?))
}

/// ToUint8(argument)
pub fn to_uint8(realm: &Realm, value: &Value) -> Result<u8> {
    Ok(double_to_uint8(to_number(realm, value)?))
}

/// ToUint8Clamp(argument)
pub fn to_uint8_clamp(realm: &Realm, value: &Value) -> Result<u8> {
    Ok(double_to_uint8_clamp(to_number(realm, value)?))
}

/// ToString(argument)
pub fn to_string(realm: &Realm, value: &Value) -> Result<Rc<str>> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Undefined => Ok(Rc::from("undefined")),
        Value::Null => Ok(Rc::from("null")),
        Value::Boolean(b) => Ok(Rc::from(if *b { "true" } else { "false" })),
        Value::Number(n) => Ok(Rc::from(number_to_string(*n))),
        Value::Symbol(_) => Err(Error::type_error(messages::SYMBOL_TO_STRING)),
        Value::BigInt(n) => Ok(Rc::from(bigint_to_string(n))),
        Value::Simd(simd) => Ok(Rc::from(simd.to_string())),
        Value::Object(_) => {
            let primitive = to_primitive(realm, value, PreferredType::String)?;
            to_string(realm, &primitive)
        }
    }
}

/// ToObject(argument)
pub fn to_object(realm: &Realm, value: &Value) -> Result<ObjectRef> {
    let (intrinsic, class_name) = match value {
        Value::Object(obj) => return Ok(obj.clone()),
        Value::Undefined | Value::Null => {
            return Err(Error::type_error(messages::UNDEFINED_OR_NULL))
        }
        Value::Boolean(_) => (Intrinsic::BooleanPrototype, "Boolean"),
        Value::Number(_) => (Intrinsic::NumberPrototype, "Number"),
        Value::String(_) => (Intrinsic::StringPrototype, "String"),
        Value::Symbol(_) => (Intrinsic::SymbolPrototype, "Symbol"),
        Value::BigInt(_) => (Intrinsic::BigIntPrototype, "BigInt"),
        Value::Simd(_) => (Intrinsic::SimdPrototype, "SIMD"),
    };
    let wrapper = OrdinaryObject::new(Some(realm.intrinsic(intrinsic)))
        .with_class_name(class_name)
        .with_primitive(value.clone());
    Ok(Rc::new(wrapper))
}

/// ToPropertyKey(argument)
pub fn to_property_key(realm: &Realm, value: &Value) -> Result<PropertyKey> {
    match value {
        Value::String(s) => Ok(PropertyKey::from(s.clone())),
        Value::Symbol(sym) => Ok(PropertyKey::Symbol(sym.clone())),
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n < MAX_LENGTH as f64 => {
            Ok(PropertyKey::Index(*n as u64))
        }
        _ => {
            let key = to_primitive(realm, value, PreferredType::String)?;
            if let Value::Symbol(sym) = key {
                return Ok(PropertyKey::Symbol(sym));
            }
            Ok(PropertyKey::from(to_string(realm, &key)?))
        }
    }
}

/// ToLength(argument)
pub fn to_length(realm: &Realm, value: &Value) -> Result<u64> {
    let len = to_integer(realm, value)?;
    if len <= 0.0 {
        return Ok(0);
    }
    Ok(len.min(MAX_LENGTH as f64) as u64)
}

/// ToIndex(value)
pub fn to_index(realm: &Realm, value: &Value) -> Result<u64> {
    if value.is_undefined() {
        return Ok(0);
    }
    let integer = to_integer(realm, value)?;
    if integer < 0.0 {
        return Err(Error::range_error(messages::INVALID_INDEX));
    }
    let index = to_length(realm, &Value::Number(integer))?;
    if index as f64 != integer {
        return Err(Error::range_error(messages::INVALID_INDEX));
    }
    Ok(index)
}

/// CanonicalNumericIndexString(argument)
pub fn canonical_numeric_index_string(s: &str) -> Option<f64> {
    if s == "-0" {
        return Some(-0.0);
    }
    let n = string_to_number(s);
    if number_to_string(n) == s {
        Some(n)
    } else {
        None
    }
}

/// RequireObjectCoercible(argument)
pub fn require_object_coercible(value: &Value) -> Result<&Value> {
    if value.is_nullish() {
        return Err(Error::type_error(messages::UNDEFINED_OR_NULL));
    }
    Ok(value)
}

/// IsCallable(argument)
pub fn is_callable(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| obj.is_callable())
}

/// IsConstructor(argument)
pub fn is_constructor(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| obj.is_constructor())
}

/// IsArray(argument)
pub fn is_array(realm: &Realm, value: &Value) -> Result<bool> {
    match value {
        Value::Object(obj) => obj.is_array(realm),
        _ => Ok(false),
    }
}

/// IsInteger(argument)
pub fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_finite() && n.trunc() == *n)
}

/// IsPropertyKey(argument)
pub fn is_property_key(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Symbol(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::object::{NativeFunction, PropertyDescriptor};
    use crate::runtime::simd::{SimdType, SimdValue};
    use crate::runtime::symbol::Symbol;
    use std::cell::RefCell;

    fn object_with_method(realm: &Realm, name: &str, result: Value) -> ObjectRef {
        let obj = realm.new_object();
        let f = NativeFunction::create(realm, name, 0, move |_, _, _| Ok(result.clone()));
        obj.define_own_property(
            realm,
            &PropertyKey::from(name),
            PropertyDescriptor::data(Value::Object(f), true, false, true),
        )
        .unwrap();
        obj
    }

    #[test]
    fn test_to_primitive_prefers_value_of_for_numbers() {
        let realm = Realm::new();
        let obj = object_with_method(&realm, "valueOf", Value::from(42.0));
        let v = Value::Object(obj);
        assert_eq!(to_number(&realm, &v).unwrap(), 42.0);
    }

    #[test]
    fn test_to_primitive_order_by_hint() {
        let realm = Realm::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let obj = realm.new_object();
        for name in ["valueOf", "toString"] {
            let calls = calls.clone();
            let f = NativeFunction::create(&realm, name, 0, move |_, _, _| {
                calls.borrow_mut().push(name);
                Ok(Value::from(name))
            });
            obj.define_own_property(
                &realm,
                &PropertyKey::from(name),
                PropertyDescriptor::data(Value::Object(f), true, false, true),
            )
            .unwrap();
        }
        let v = Value::Object(obj);
        assert_eq!(&*to_string(&realm, &v).unwrap(), "toString");
        assert_eq!(
            to_primitive(&realm, &v, PreferredType::Default).unwrap(),
            Value::from("valueOf")
        );
        assert_eq!(*calls.borrow(), vec!["toString", "valueOf"]);
    }

    #[test]
    fn test_to_primitive_exotic_hint() {
        let realm = Realm::new();
        let obj = realm.new_object();
        let f = NativeFunction::create(&realm, "[Symbol.toPrimitive]", 1, |_, _, args| {
            Ok(args.first().cloned().unwrap_or(Value::Undefined))
        });
        obj.define_own_property(
            &realm,
            &PropertyKey::Symbol(WellKnownSymbol::ToPrimitive.symbol()),
            PropertyDescriptor::data(Value::Object(f), true, false, true),
        )
        .unwrap();
        let v = Value::Object(obj);
        assert_eq!(to_primitive(&realm, &v, PreferredType::Default).unwrap(), Value::from("default"));
        assert_eq!(&*to_string(&realm, &v).unwrap(), "string");
        assert!(to_number(&realm, &v).unwrap().is_nan());
    }

    #[test]
    fn test_to_primitive_rejects_objects() {
        let realm = Realm::new();
        let inner = realm.new_object();
        let obj = object_with_method(&realm, "valueOf", Value::Object(inner.clone()));
        let obj_value = Value::Object(obj.clone());
        let tostring = NativeFunction::create(&realm, "toString", 0, move |_, _, _| {
            Ok(Value::Object(inner.clone()))
        });
        obj.define_own_property(
            &realm,
            &PropertyKey::from("toString"),
            PropertyDescriptor::data(Value::Object(tostring), true, false, true),
        )
        .unwrap();
        let err = to_primitive(&realm, &obj_value, PreferredType::Number).unwrap_err();
        assert_eq!(err.message(), Some(messages::NO_PRIMITIVE_REPRESENTATION));
    }

    #[test]
    fn test_to_boolean() {
        assert!(!to_boolean(&Value::from(f64::NAN)));
        assert!(!to_boolean(&Value::from(-0.0)));
        assert!(!to_boolean(&Value::from("")));
        assert!(to_boolean(&Value::from("0")));
        assert!(!to_boolean(&Value::bigint(0)));
        assert!(to_boolean(&Value::bigint(-1)));
        assert!(to_boolean(&Value::Symbol(Symbol::new(None))));
        let realm = Realm::new();
        assert!(to_boolean(&Value::Object(realm.new_object())));
        let dda: ObjectRef = Rc::new(OrdinaryObject::new(None).with_htmldda());
        assert!(!to_boolean(&Value::Object(dda)));
    }

    #[test]
    fn test_to_number_errors() {
        let realm = Realm::new();
        for v in [
            Value::Symbol(Symbol::new(None)),
            Value::bigint(1),
            Value::from(SimdValue::new(SimdType::Int32x4, &[0.0; 4])),
        ] {
            let err = to_number(&realm, &v).unwrap_err();
            assert!(err.is_kind(ErrorKind::TypeError));
        }
        assert!(to_number(&realm, &Value::Undefined).unwrap().is_nan());
        assert_eq!(to_number(&realm, &Value::Null).unwrap(), 0.0);
        assert_eq!(to_number(&realm, &Value::from(" 0b11 ")).unwrap(), 3.0);
    }

    #[test]
    fn test_to_string_values() {
        let realm = Realm::new();
        let s = |v: Value| to_string(&realm, &v).unwrap().to_string();
        assert_eq!(s(Value::from(1e21)), "1e+21");
        assert_eq!(s(Value::from(-0.0)), "0");
        assert_eq!(s(Value::bigint(-12)), "-12");
        assert_eq!(s(Value::Undefined), "undefined");
        assert!(to_string(&realm, &Value::Symbol(Symbol::new(None))).is_err());
    }

    #[test]
    fn test_to_object_wraps_primitives() {
        let realm = Realm::new();
        let obj = to_object(&realm, &Value::from(5.0)).unwrap();
        assert_eq!(obj.primitive_value(), Some(Value::from(5.0)));
        assert_eq!(obj.class_name(), "Number");
        assert!(to_object(&realm, &Value::Null).is_err());
    }

    #[test]
    fn test_to_property_key() {
        let realm = Realm::new();
        assert_eq!(to_property_key(&realm, &Value::from(3.0)).unwrap(), PropertyKey::Index(3));
        assert_eq!(to_property_key(&realm, &Value::from("3")).unwrap(), PropertyKey::Index(3));
        assert_eq!(to_property_key(&realm, &Value::from(-0.0)).unwrap(), PropertyKey::Index(0));
        assert_eq!(
            to_property_key(&realm, &Value::from(1.5)).unwrap(),
            PropertyKey::from("1.5")
        );
        assert_eq!(to_property_key(&realm, &Value::Null).unwrap(), PropertyKey::from("null"));
    }

    #[test]
    fn test_to_length_and_index() {
        let realm = Realm::new();
        assert_eq!(to_length(&realm, &Value::from(-5.0)).unwrap(), 0);
        assert_eq!(to_length(&realm, &Value::from(f64::INFINITY)).unwrap(), MAX_LENGTH);
        assert_eq!(to_length(&realm, &Value::from("12.9")).unwrap(), 12);
        assert_eq!(to_index(&realm, &Value::Undefined).unwrap(), 0);
        assert_eq!(to_index(&realm, &Value::from(7.5)).unwrap(), 7);
        assert!(to_index(&realm, &Value::from(-1.0)).unwrap_err().is_kind(ErrorKind::RangeError));
        assert!(to_index(&realm, &Value::from(1e300)).unwrap_err().is_kind(ErrorKind::RangeError));
    }

    #[test]
    fn test_canonical_numeric_index_string() {
        assert_eq!(canonical_numeric_index_string("1"), Some(1.0));
        assert!(canonical_numeric_index_string("-0").unwrap().is_sign_negative());
        assert_eq!(canonical_numeric_index_string("1.50"), None);
        assert_eq!(canonical_numeric_index_string("foo"), None);
        assert!(canonical_numeric_index_string("NaN").unwrap().is_nan());
    }

    #[test]
    fn test_integer_conversions_through_values() {
        let realm = Realm::new();
        assert_eq!(to_int32(&realm, &Value::from("4294967297")).unwrap(), 1);
        assert_eq!(to_uint8_clamp(&realm, &Value::from(2.5)).unwrap(), 2);
        assert_eq!(to_int8(&realm, &Value::from(128.0)).unwrap(), -128);
        assert_eq!(to_uint16(&realm, &Value::from(true)).unwrap(), 1);
        assert_eq!(to_integer(&realm, &Value::from(f64::NAN)).unwrap(), 0.0);
        assert_eq!(to_integer(&realm, &Value::from(f64::NEG_INFINITY)).unwrap(), f64::NEG_INFINITY);
    }
}
