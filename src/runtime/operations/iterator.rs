//! Iterator protocol
//!
//! [`iterator_close`] is for normal completions. When the caller is already
//! unwinding, use [`iterator_close_with_error`]: failures while looking up
//! or calling `return` are attached to the original error as suppressed
//! errors and never replace it.

use super::conversion::to_boolean;
use super::object::{call, create_data_property_or_throw, get, get_method};
use crate::error::{messages, Error, Result};
use crate::runtime::object::ObjectRef;
use crate::runtime::symbol::WellKnownSymbol;
use crate::runtime::{Realm, Value};
use tracing::debug;

/// An iterator together with its cached `next` method
#[derive(Debug, Clone)]
pub struct IteratorRecord {
    pub iterator: ObjectRef,
    pub next_method: Value,
    pub done: bool,
}

/// GetIterator(obj)
pub fn get_iterator(realm: &Realm, value: &Value) -> Result<IteratorRecord> {
    let Some(method) = get_method(realm, value, WellKnownSymbol::Iterator.symbol())? else {
        return Err(Error::type_error(messages::not_iterable(&value.to_string())));
    };
    get_iterator_from_method(realm, value, &method)
}

/// GetIterator(obj, method) with an explicit `@@iterator` method
pub fn get_iterator_from_method(
    realm: &Realm,
    value: &Value,
    method: &ObjectRef,
) -> Result<IteratorRecord> {
    let Value::Object(iterator) = method.call(realm, value, &[])? else {
        return Err(Error::type_error(messages::ITERATOR_NOT_OBJECT));
    };
    let next_method = get(realm, &iterator, "next")?;
    Ok(IteratorRecord {
        iterator,
        next_method,
        done: false,
    })
}

/// IteratorNext(iteratorRecord, value)
pub fn iterator_next(
    realm: &Realm,
    record: &IteratorRecord,
    value: Option<Value>,
) -> Result<ObjectRef> {
    let this = Value::Object(record.iterator.clone());
    let result = match value {
        Some(value) => call(realm, &record.next_method, &this, &[value])?,
        None => call(realm, &record.next_method, &this, &[])?,
    };
    match result {
        Value::Object(result) => Ok(result),
        _ => Err(Error::type_error(messages::ITERATOR_RESULT_NOT_OBJECT)),
    }
}

/// IteratorComplete(iterResult)
pub fn iterator_complete(realm: &Realm, result: &ObjectRef) -> Result<bool> {
    Ok(to_boolean(&get(realm, result, "done")?))
}

/// IteratorValue(iterResult)
pub fn iterator_value(realm: &Realm, result: &ObjectRef) -> Result<Value> {
    get(realm, result, "value")
}

/// IteratorStep(iteratorRecord): `None` once the iterator is done
pub fn iterator_step(realm: &Realm, record: &mut IteratorRecord) -> Result<Option<ObjectRef>> {
    let result = match iterator_next(realm, record, None) {
        Ok(result) => result,
        Err(err) => {
            record.done = true;
            return Err(err);
        }
    };
    match iterator_complete(realm, &result) {
        Ok(true) => {
            record.done = true;
            Ok(None)
        }
        Ok(false) => Ok(Some(result)),
        Err(err) => {
            record.done = true;
            Err(err)
        }
    }
}

/// IteratorClose(iteratorRecord, NormalCompletion)
pub fn iterator_close(realm: &Realm, record: &IteratorRecord) -> Result<()> {
    let iterator = Value::Object(record.iterator.clone());
    let Some(return_method) = get_method(realm, &iterator, "return")? else {
        return Ok(());
    };
    let inner = return_method.call(realm, &iterator, &[])?;
    if !inner.is_object() {
        return Err(Error::type_error(messages::ITERATOR_RESULT_NOT_OBJECT));
    }
    Ok(())
}

/// IteratorClose(iteratorRecord, ThrowCompletion): always returns `cause`,
/// with any failure raised by `return` attached as suppressed
pub fn iterator_close_with_error(realm: &Realm, record: &IteratorRecord, mut cause: Error) -> Error {
    let iterator = Value::Object(record.iterator.clone());
    let return_method = match get_method(realm, &iterator, "return") {
        Ok(Some(method)) => method,
        Ok(None) => return cause,
        Err(err) => {
            debug!(error = %err, "suppressed failure looking up iterator return");
            cause.add_suppressed(err);
            return cause;
        }
    };
    if let Err(err) = return_method.call(realm, &iterator, &[]) {
        debug!(error = %err, "suppressed failure calling iterator return");
        cause.add_suppressed(err);
    }
    cause
}

/// CreateIterResultObject(value, done)
pub fn create_iter_result_object(realm: &Realm, value: Value, done: bool) -> Result<ObjectRef> {
    let obj = realm.new_object();
    create_data_property_or_throw(realm, &obj, "value", value)?;
    create_data_property_or_throw(realm, &obj, "done", Value::Boolean(done))?;
    Ok(obj)
}

/// IterableToList(items, method)
pub fn iterable_to_list(
    realm: &Realm,
    items: &Value,
    method: Option<&ObjectRef>,
) -> Result<Vec<Value>> {
    let mut record = match method {
        Some(method) => get_iterator_from_method(realm, items, method)?,
        None => get_iterator(realm, items)?,
    };
    let mut values = Vec::new();
    while let Some(next) = iterator_step(realm, &mut record)? {
        values.push(iterator_value(realm, &next)?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::object::NativeFunction;
    use crate::runtime::operations::object::create_method_property;
    use std::cell::Cell;
    use std::rc::Rc;

    /// An iterable yielding `0..limit`, counting calls to `return`
    fn counting_iterable(realm: &Realm, limit: u32, returns: Rc<Cell<u32>>) -> Value {
        let iterable = realm.new_object();
        let factory = NativeFunction::create(realm, "[Symbol.iterator]", 0, move |realm, _, _| {
            let iterator = realm.new_object();
            let position = Rc::new(Cell::new(0u32));
            let next = NativeFunction::create(realm, "next", 0, move |realm, _, _| {
                let current = position.get();
                position.set(current + 1);
                let result = if current < limit {
                    create_iter_result_object(realm, Value::from(current), false)?
                } else {
                    create_iter_result_object(realm, Value::Undefined, true)?
                };
                Ok(Value::Object(result))
            });
            create_method_property(realm, &iterator, "next", Value::Object(next))?;
            let returns = returns.clone();
            let ret = NativeFunction::create(realm, "return", 0, move |realm, _, _| {
                returns.set(returns.get() + 1);
                Ok(Value::Object(realm.new_object()))
            });
            create_method_property(realm, &iterator, "return", Value::Object(ret))?;
            Ok(Value::Object(iterator))
        });
        create_method_property(
            realm,
            &iterable,
            WellKnownSymbol::Iterator.symbol(),
            Value::Object(factory),
        )
        .unwrap();
        Value::Object(iterable)
    }

    #[test]
    fn test_iterable_to_list() {
        let realm = Realm::new();
        let returns = Rc::new(Cell::new(0));
        let iterable = counting_iterable(&realm, 3, returns.clone());
        let values = iterable_to_list(&realm, &iterable, None).unwrap();
        assert_eq!(values, vec![Value::from(0u32), Value::from(1u32), Value::from(2u32)]);
        assert_eq!(returns.get(), 0);
    }

    #[test]
    fn test_step_marks_done() {
        let realm = Realm::new();
        let iterable = counting_iterable(&realm, 1, Rc::new(Cell::new(0)));
        let mut record = get_iterator(&realm, &iterable).unwrap();
        let first = iterator_step(&realm, &mut record).unwrap().unwrap();
        assert_eq!(iterator_value(&realm, &first).unwrap(), Value::from(0u32));
        assert!(!record.done);
        assert!(iterator_step(&realm, &mut record).unwrap().is_none());
        assert!(record.done);
    }

    #[test]
    fn test_close_calls_return() {
        let realm = Realm::new();
        let returns = Rc::new(Cell::new(0));
        let iterable = counting_iterable(&realm, 5, returns.clone());
        let record = get_iterator(&realm, &iterable).unwrap();
        iterator_close(&realm, &record).unwrap();
        assert_eq!(returns.get(), 1);
    }

    #[test]
    fn test_close_tolerates_missing_return() {
        let realm = Realm::new();
        let record = IteratorRecord {
            iterator: realm.new_object(),
            next_method: Value::Undefined,
            done: false,
        };
        iterator_close(&realm, &record).unwrap();
        let cause = Error::range_error("boom");
        let err = iterator_close_with_error(&realm, &record, cause);
        assert!(err.is_kind(ErrorKind::RangeError));
        assert!(err.suppressed().is_empty());
    }

    #[test]
    fn test_close_with_error_suppresses_return_failure() {
        let realm = Realm::new();
        let iterator = realm.new_object();
        let ret = NativeFunction::create(&realm, "return", 0, |_, _, _| {
            Err(Error::throw(Value::from("from return")))
        });
        create_method_property(&realm, &iterator, "return", Value::Object(ret)).unwrap();
        let record = IteratorRecord {
            iterator,
            next_method: Value::Undefined,
            done: false,
        };
        let err = iterator_close_with_error(&realm, &record, Error::throw(Value::from("original")));
        assert_eq!(err.thrown_value(), Some(&Value::from("original")));
        assert_eq!(err.suppressed().len(), 1);
        assert_eq!(err.suppressed()[0].thrown_value(), Some(&Value::from("from return")));
    }

    #[test]
    fn test_close_rejects_non_object_result() {
        let realm = Realm::new();
        let iterator = realm.new_object();
        let ret = NativeFunction::create(&realm, "return", 0, |_, _, _| Ok(Value::from(1.0)));
        create_method_property(&realm, &iterator, "return", Value::Object(ret)).unwrap();
        let record = IteratorRecord {
            iterator,
            next_method: Value::Undefined,
            done: false,
        };
        let err = iterator_close(&realm, &record).unwrap_err();
        assert_eq!(err.message(), Some(messages::ITERATOR_RESULT_NOT_OBJECT));
        let err = iterator_close_with_error(&realm, &record, Error::range_error("x"));
        assert!(err.suppressed().is_empty());
    }

    #[test]
    fn test_non_iterable() {
        let realm = Realm::new();
        let err = get_iterator(&realm, &Value::from(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: 1 is not iterable");
    }
}
