//! Integration tests for the abstract operations

mod common;
use common::{define_method, object_with, realm};
use pretty_assertions::assert_eq;
use quicksilver_core::prelude::*;
use quicksilver_core::runtime::operations::{
    create_iter_result_object, get_iterator, iterator_close_with_error, iterator_step,
    iterator_value, less_than, to_length,
};
use std::cell::Cell;
use std::rc::Rc;

mod equality {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_loose_equality_table() {
        let realm = realm();
        let cases = [
            (Value::from(1.0), Value::from("1"), true),
            (Value::Null, Value::Undefined, true),
            (Value::from(0.0), Value::from(false), true),
            (Value::from(""), Value::from(false), true),
            (Value::bigint(1), Value::from("1"), true),
            (Value::bigint(1), Value::from("1.0"), false),
            (Value::from("abc"), Value::from(f64::NAN), false),
            (Value::Null, Value::from(false), false),
            (Value::from(" \n42\t"), Value::from(42.0), true),
        ];
        for (x, y, expected) in cases {
            assert_eq!(
                abstract_equals(&realm, &x, &y).unwrap(),
                expected,
                "{x:?} == {y:?}"
            );
            assert_eq!(
                abstract_equals(&realm, &y, &x).unwrap(),
                expected,
                "{y:?} == {x:?}"
            );
        }
    }

    #[test]
    fn test_four_equalities_on_nan_and_zero() {
        let realm = realm();
        let nan = Value::from(f64::NAN);
        let zero = Value::from(0.0);
        let neg_zero = Value::from(-0.0);

        assert!(same_value(&nan, &nan));
        assert!(same_value_zero(&nan, &nan));
        assert!(!strict_equals(&nan, &nan));
        assert!(!abstract_equals(&realm, &nan, &nan).unwrap());

        assert!(!same_value(&zero, &neg_zero));
        assert!(same_value_zero(&zero, &neg_zero));
        assert!(strict_equals(&zero, &neg_zero));
        assert!(abstract_equals(&realm, &zero, &neg_zero).unwrap());
    }

    #[test]
    fn test_object_to_primitive_in_equality() {
        let realm = realm();
        let obj = realm.new_object();
        define_method(&realm, &obj, "valueOf", Value::from(3.0));
        let obj = Value::Object(obj);
        assert!(abstract_equals(&realm, &obj, &Value::from("3")).unwrap());
        assert!(abstract_equals(&realm, &Value::from(3.0), &obj).unwrap());
        assert!(!strict_equals(&obj, &Value::from(3.0)));
    }

    #[test]
    fn test_bigint_number_comparison_is_exact() {
        let realm = realm();
        let big: num_bigint::BigInt = "9007199254740993".parse().unwrap();
        let big = Value::bigint(big);
        let n = Value::from(9007199254740992.0);
        assert!(!abstract_equals(&realm, &big, &n).unwrap());
        assert!(less_than(&realm, &n, &big).unwrap());
    }
}

mod conversions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_integer_properties() {
        let realm = realm();
        for n in [0.0, -0.0, 1.5, -1.5, 1e300, -1e-300, f64::INFINITY, f64::NEG_INFINITY] {
            let once = to_integer(&realm, &Value::from(n)).unwrap();
            let twice = to_integer(&realm, &Value::from(once)).unwrap();
            assert!(Value::from(once).same_value(&Value::from(twice)), "{n}");
        }
        assert_eq!(to_integer(&realm, &Value::from(f64::NAN)).unwrap(), 0.0);
        assert_eq!(
            to_integer(&realm, &Value::from(f64::NEG_INFINITY)).unwrap(),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_to_int32_identity_on_int32() {
        let realm = realm();
        for k in [i32::MIN, -1, 0, 1, 12345, i32::MAX] {
            assert_eq!(to_int32(&realm, &Value::from(k)).unwrap(), k);
        }
        assert_eq!(to_uint32(&realm, &Value::from(-1.0)).unwrap(), u32::MAX);
    }

    #[test]
    fn test_to_primitive_call_order() {
        let realm = realm();
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let obj = realm.new_object();
        for (name, result) in [("valueOf", Value::Object(realm.new_object())), ("toString", Value::from("s"))] {
            let log = log.clone();
            let f = NativeFunction::create(&realm, name, 0, move |_, _, _| {
                log.borrow_mut().push(name);
                Ok(result.clone())
            });
            set(&realm, &obj, name, Value::Object(f), true).unwrap();
        }
        let value = Value::Object(obj);
        // valueOf returns an object, so the Number hint falls through to toString
        assert_eq!(to_primitive(&realm, &value, PreferredType::Number).unwrap(), Value::from("s"));
        assert_eq!(*log.borrow(), vec!["valueOf", "toString"]);
        log.borrow_mut().clear();
        assert_eq!(to_primitive(&realm, &value, PreferredType::String).unwrap(), Value::from("s"));
        assert_eq!(*log.borrow(), vec!["toString"]);
    }

    #[test]
    fn test_errors_from_user_code_propagate_unchanged() {
        let realm = realm();
        let obj = realm.new_object();
        let f = NativeFunction::create(&realm, "valueOf", 0, |_, _, _| {
            Err(Error::throw(Value::from("custom")))
        });
        set(&realm, &obj, "valueOf", Value::Object(f), true).unwrap();
        let err = to_number(&realm, &Value::Object(obj)).unwrap_err();
        assert_eq!(err.thrown_value(), Some(&Value::from("custom")));
    }

    #[test]
    fn test_number_to_string_round_trips() {
        let realm = realm();
        let cases = [
            (0.1, "0.1"),
            (1e21, "1e+21"),
            (1e-7, "1e-7"),
            (123456789.0, "123456789"),
            (-1.5, "-1.5"),
            (f64::NAN, "NaN"),
            (f64::NEG_INFINITY, "-Infinity"),
            (5e-324, "5e-324"),
        ];
        for (n, expected) in cases {
            assert_eq!(&*to_string(&realm, &Value::from(n)).unwrap(), expected);
        }
    }

    #[test]
    fn test_to_length_clamps_array_likes() {
        let realm = realm();
        let obj = object_with(&realm, &[("length", Value::from("-3"))]);
        let len = get(&realm, &obj, "length").unwrap();
        assert_eq!(to_length(&realm, &len).unwrap(), 0);
    }
}

mod iterators {
    use super::*;
    use pretty_assertions::assert_eq;

    /// An iterator over `0..` whose `return` throws and counts its calls
    fn failing_return_iterable(realm: &Realm, returns: Rc<Cell<u32>>) -> Value {
        let iterable = realm.new_object();
        let factory = NativeFunction::create(realm, "[Symbol.iterator]", 0, move |realm, _, _| {
            let iterator = realm.new_object();
            let counter = Rc::new(Cell::new(0.0));
            let next = NativeFunction::create(realm, "next", 0, move |realm, _, _| {
                counter.set(counter.get() + 1.0);
                Ok(Value::Object(create_iter_result_object(
                    realm,
                    Value::from(counter.get()),
                    false,
                )?))
            });
            set(realm, &iterator, "next", Value::Object(next), true)?;
            let returns = returns.clone();
            let ret = NativeFunction::create(realm, "return", 0, move |_, _, _| {
                returns.set(returns.get() + 1);
                Err(Error::type_error("return failed"))
            });
            set(realm, &iterator, "return", Value::Object(ret), true)?;
            Ok(Value::Object(iterator))
        });
        let key = PropertyKey::Symbol(WellKnownSymbol::Iterator.symbol());
        iterable
            .define_own_property(realm, &key, PropertyDescriptor::data(Value::Object(factory), true, false, true))
            .unwrap();
        Value::Object(iterable)
    }

    #[test]
    fn test_close_on_abrupt_completion_keeps_original_error() {
        let realm = realm();
        let returns = Rc::new(Cell::new(0));
        let iterable = failing_return_iterable(&realm, returns.clone());
        let mut record = get_iterator(&realm, &iterable).unwrap();
        let step = iterator_step(&realm, &mut record).unwrap().unwrap();
        assert_eq!(iterator_value(&realm, &step).unwrap(), Value::from(1.0));

        let original = Error::throw(Value::from("loop body failed"));
        let err = iterator_close_with_error(&realm, &record, original);
        assert_eq!(returns.get(), 1);
        assert_eq!(err.thrown_value(), Some(&Value::from("loop body failed")));
        assert_eq!(err.suppressed().len(), 1);
        assert_eq!(err.suppressed()[0].kind(), Some(ErrorKind::TypeError));
    }
}
