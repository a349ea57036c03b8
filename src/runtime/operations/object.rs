//! Operations on objects
//!
//! Thin wrappers over the [`JsObject`](crate::runtime::JsObject) internal methods that add key
//! normalization and the throwing variants, plus the generic algorithms
//! built on top of them (integrity levels, `instanceof`, species lookup,
//! property descriptor conversion).

use super::conversion::{is_callable, to_boolean, to_length, to_object, to_property_key};
use crate::error::{messages, Error, Result};
use crate::runtime::object::{same_object, ArrayObject, ObjectRef, PropertyDescriptor, PropertyKey};
use crate::runtime::symbol::WellKnownSymbol;
use crate::runtime::{Realm, Type, Value};

/// Get(O, P)
pub fn get(realm: &Realm, obj: &ObjectRef, key: impl Into<PropertyKey>) -> Result<Value> {
    obj.get(realm, &key.into(), &Value::Object(obj.clone()))
}

/// GetV(V, P): property lookup on any value, using the value as receiver
pub fn get_v(realm: &Realm, value: &Value, key: impl Into<PropertyKey>) -> Result<Value> {
    let obj = to_object(realm, value)?;
    obj.get(realm, &key.into(), value)
}

/// GetMethod(V, P): `None` for undefined or null, TypeError if not callable
pub fn get_method(
    realm: &Realm,
    value: &Value,
    key: impl Into<PropertyKey>,
) -> Result<Option<ObjectRef>> {
    let key = key.into();
    let func = get_v(realm, value, &key)?;
    match func {
        Value::Undefined | Value::Null => Ok(None),
        Value::Object(obj) if obj.is_callable() => Ok(Some(obj)),
        _ => Err(Error::type_error(messages::not_a_function(&key.to_string()))),
    }
}

/// Set(O, P, V, Throw)
pub fn set(
    realm: &Realm,
    obj: &ObjectRef,
    key: impl Into<PropertyKey>,
    value: Value,
    throw: bool,
) -> Result<bool> {
    let key = key.into();
    let success = obj.set(realm, &key, value, &Value::Object(obj.clone()))?;
    if !success && throw {
        return Err(Error::type_error(messages::read_only_property(&key.to_string())));
    }
    Ok(success)
}

/// HasProperty(O, P)
pub fn has_property(realm: &Realm, obj: &ObjectRef, key: impl Into<PropertyKey>) -> Result<bool> {
    obj.has_property(realm, &key.into())
}

/// HasOwnProperty(O, P)
pub fn has_own_property(
    realm: &Realm,
    obj: &ObjectRef,
    key: impl Into<PropertyKey>,
) -> Result<bool> {
    Ok(obj.get_own_property(realm, &key.into())?.is_some())
}

/// IsExtensible(O)
pub fn is_extensible(realm: &Realm, obj: &ObjectRef) -> Result<bool> {
    obj.is_extensible(realm)
}

/// CreateDataProperty(O, P, V)
pub fn create_data_property(
    realm: &Realm,
    obj: &ObjectRef,
    key: impl Into<PropertyKey>,
    value: Value,
) -> Result<bool> {
    obj.define_own_property(
        realm,
        &key.into(),
        PropertyDescriptor::data(value, true, true, true),
    )
}

/// CreateDataPropertyOrThrow(O, P, V)
pub fn create_data_property_or_throw(
    realm: &Realm,
    obj: &ObjectRef,
    key: impl Into<PropertyKey>,
    value: Value,
) -> Result<()> {
    let key = key.into();
    if !create_data_property(realm, obj, &key, value)? {
        return Err(Error::type_error(messages::cannot_redefine(&key.to_string())));
    }
    Ok(())
}

/// CreateMethodProperty(O, P, V): writable, configurable, non-enumerable
pub fn create_method_property(
    realm: &Realm,
    obj: &ObjectRef,
    key: impl Into<PropertyKey>,
    value: Value,
) -> Result<bool> {
    obj.define_own_property(
        realm,
        &key.into(),
        PropertyDescriptor::data(value, true, false, true),
    )
}

/// DefinePropertyOrThrow(O, P, desc)
pub fn define_property_or_throw(
    realm: &Realm,
    obj: &ObjectRef,
    key: impl Into<PropertyKey>,
    desc: PropertyDescriptor,
) -> Result<()> {
    let key = key.into();
    if !obj.define_own_property(realm, &key, desc)? {
        let message = if obj.get_own_property(realm, &key)?.is_none() {
            messages::not_extensible(&key.to_string())
        } else {
            messages::cannot_redefine(&key.to_string())
        };
        return Err(Error::type_error(message));
    }
    Ok(())
}

/// DeletePropertyOrThrow(O, P)
pub fn delete_property_or_throw(
    realm: &Realm,
    obj: &ObjectRef,
    key: impl Into<PropertyKey>,
) -> Result<()> {
    let key = key.into();
    if !obj.delete(realm, &key)? {
        return Err(Error::type_error(messages::cannot_delete(&key.to_string())));
    }
    Ok(())
}

/// Call(F, V, args)
pub fn call(realm: &Realm, func: &Value, this: &Value, args: &[Value]) -> Result<Value> {
    match func {
        Value::Object(obj) if obj.is_callable() => obj.call(realm, this, args),
        _ => Err(Error::type_error(messages::not_a_function(&func.to_string()))),
    }
}

/// Construct(F, args, newTarget); `new_target` defaults to `func`
pub fn construct(
    realm: &Realm,
    func: &Value,
    args: &[Value],
    new_target: Option<&ObjectRef>,
) -> Result<ObjectRef> {
    match func {
        Value::Object(obj) if obj.is_constructor() => {
            let new_target = new_target.unwrap_or(obj);
            if !new_target.is_constructor() {
                return Err(Error::type_error(messages::not_a_constructor(
                    new_target.class_name(),
                )));
            }
            obj.construct(realm, args, new_target)
        }
        _ => Err(Error::type_error(messages::not_a_constructor(&func.to_string()))),
    }
}

/// Invoke(V, P, args)
pub fn invoke(
    realm: &Realm,
    value: &Value,
    key: impl Into<PropertyKey>,
    args: &[Value],
) -> Result<Value> {
    let func = get_v(realm, value, key)?;
    call(realm, &func, value, args)
}

/// Integrity levels for SetIntegrityLevel / TestIntegrityLevel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityLevel {
    Sealed,
    Frozen,
}

/// SetIntegrityLevel(O, level)
pub fn set_integrity_level(realm: &Realm, obj: &ObjectRef, level: IntegrityLevel) -> Result<bool> {
    if !obj.prevent_extensions(realm)? {
        return Ok(false);
    }
    let keys = obj.own_property_keys(realm)?;
    for key in keys {
        let desc = match level {
            IntegrityLevel::Sealed => PropertyDescriptor {
                configurable: Some(false),
                ..Default::default()
            },
            IntegrityLevel::Frozen => {
                let Some(current) = obj.get_own_property(realm, &key)? else {
                    continue;
                };
                if current.is_accessor() {
                    PropertyDescriptor {
                        configurable: Some(false),
                        ..Default::default()
                    }
                } else {
                    PropertyDescriptor {
                        configurable: Some(false),
                        writable: Some(false),
                        ..Default::default()
                    }
                }
            }
        };
        define_property_or_throw(realm, obj, key, desc)?;
    }
    Ok(true)
}

/// TestIntegrityLevel(O, level)
pub fn test_integrity_level(realm: &Realm, obj: &ObjectRef, level: IntegrityLevel) -> Result<bool> {
    if obj.is_extensible(realm)? {
        return Ok(false);
    }
    for key in obj.own_property_keys(realm)? {
        if let Some(current) = obj.get_own_property(realm, &key)? {
            if current.configurable {
                return Ok(false);
            }
            if level == IntegrityLevel::Frozen && current.writable() {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// CreateArrayFromList(elements)
pub fn create_array_from_list(
    realm: &Realm,
    elements: impl IntoIterator<Item = Value>,
) -> Result<ObjectRef> {
    let array = ArrayObject::create(realm, 0, None)?;
    for (index, element) in elements.into_iter().enumerate() {
        create_data_property_or_throw(realm, &array, index, element)?;
    }
    Ok(array)
}

/// CreateListFromArrayLike(obj, elementTypes); `None` accepts every type
pub fn create_list_from_array_like(
    realm: &Realm,
    value: &Value,
    element_types: Option<&[Type]>,
) -> Result<Vec<Value>> {
    let Value::Object(obj) = value else {
        return Err(Error::type_error(messages::not_an_object(&value.to_string())));
    };
    let len = to_length(realm, &get(realm, obj, "length")?)?;
    if len > realm.options().max_arguments as u64 {
        return Err(Error::range_error(messages::TOO_MANY_ARGUMENTS));
    }
    let mut list = Vec::with_capacity(len as usize);
    for index in 0..len {
        let next = get(realm, obj, index)?;
        if let Some(types) = element_types {
            if !types.contains(&next.get_type()) {
                return Err(Error::type_error(messages::INVALID_ELEMENT_TYPE));
            }
        }
        list.push(next);
    }
    Ok(list)
}

/// OrdinaryHasInstance(C, O)
///
/// There is no bound-function step: the object model has no bound functions.
pub fn ordinary_has_instance(realm: &Realm, constructor: &Value, value: &Value) -> Result<bool> {
    let Value::Object(c) = constructor else {
        return Ok(false);
    };
    if !c.is_callable() {
        return Ok(false);
    }
    let Value::Object(mut obj) = value.clone() else {
        return Ok(false);
    };
    let Value::Object(proto) = get(realm, c, "prototype")? else {
        return Err(Error::type_error(messages::PROTOTYPE_NOT_OBJECT));
    };
    loop {
        match obj.get_prototype_of(realm)? {
            None => return Ok(false),
            Some(next) if same_object(&next, &proto) => return Ok(true),
            Some(next) => obj = next,
        }
    }
}

/// InstanceofOperator(O, C)
pub fn instanceof_operator(realm: &Realm, value: &Value, target: &Value) -> Result<bool> {
    if !target.is_object() {
        return Err(Error::type_error(messages::INSTANCEOF_NOT_OBJECT));
    }
    if let Some(handler) = get_method(realm, target, WellKnownSymbol::HasInstance.symbol())? {
        let result = handler.call(realm, target, &[value.clone()])?;
        return Ok(to_boolean(&result));
    }
    if !is_callable(target) {
        return Err(Error::type_error(messages::INSTANCEOF_NOT_CALLABLE));
    }
    ordinary_has_instance(realm, target, value)
}

/// SpeciesConstructor(O, defaultConstructor)
pub fn species_constructor(
    realm: &Realm,
    obj: &ObjectRef,
    default_constructor: &ObjectRef,
) -> Result<ObjectRef> {
    let c = get(realm, obj, "constructor")?;
    let c = match c {
        Value::Undefined => return Ok(default_constructor.clone()),
        Value::Object(c) => c,
        _ => return Err(Error::type_error(messages::CONSTRUCTOR_NOT_OBJECT)),
    };
    match get(realm, &c, WellKnownSymbol::Species.symbol())? {
        Value::Undefined | Value::Null => Ok(default_constructor.clone()),
        Value::Object(species) if species.is_constructor() => Ok(species),
        _ => Err(Error::type_error(messages::SPECIES_NOT_CONSTRUCTOR)),
    }
}

/// What EnumerableOwnProperties collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerableKind {
    Key,
    Value,
    KeyValue,
}

/// EnumerableOwnProperties(O, kind): string keys only, in own-key order
pub fn enumerable_own_properties(
    realm: &Realm,
    obj: &ObjectRef,
    kind: EnumerableKind,
) -> Result<Vec<Value>> {
    let mut properties = Vec::new();
    for key in obj.own_property_keys(realm)? {
        if key.is_symbol() {
            continue;
        }
        let Some(desc) = obj.get_own_property(realm, &key)? else {
            continue;
        };
        if !desc.enumerable {
            continue;
        }
        match kind {
            EnumerableKind::Key => properties.push(key.to_value()),
            EnumerableKind::Value => properties.push(get(realm, obj, &key)?),
            EnumerableKind::KeyValue => {
                let value = get(realm, obj, &key)?;
                let entry = create_array_from_list(realm, [key.to_value(), value])?;
                properties.push(Value::Object(entry));
            }
        }
    }
    Ok(properties)
}

/// CopyDataProperties(target, source, excluded)
pub fn copy_data_properties(
    realm: &Realm,
    target: &ObjectRef,
    source: &Value,
    excluded: &[PropertyKey],
) -> Result<()> {
    if source.is_nullish() {
        return Ok(());
    }
    let from = to_object(realm, source)?;
    for key in from.own_property_keys(realm)? {
        if excluded.contains(&key) {
            continue;
        }
        let Some(desc) = from.get_own_property(realm, &key)? else {
            continue;
        };
        if desc.enumerable {
            let value = get(realm, &from, &key)?;
            create_data_property_or_throw(realm, target, key, value)?;
        }
    }
    Ok(())
}

/// ToPropertyDescriptor(Obj)
pub fn to_property_descriptor(realm: &Realm, value: &Value) -> Result<PropertyDescriptor> {
    let Value::Object(obj) = value else {
        return Err(Error::type_error(messages::PROPERTY_DESCRIPTOR_NOT_OBJECT));
    };
    let mut desc = PropertyDescriptor::default();
    if has_property(realm, obj, "enumerable")? {
        desc.enumerable = Some(to_boolean(&get(realm, obj, "enumerable")?));
    }
    if has_property(realm, obj, "configurable")? {
        desc.configurable = Some(to_boolean(&get(realm, obj, "configurable")?));
    }
    if has_property(realm, obj, "value")? {
        desc.value = Some(get(realm, obj, "value")?);
    }
    if has_property(realm, obj, "writable")? {
        desc.writable = Some(to_boolean(&get(realm, obj, "writable")?));
    }
    if has_property(realm, obj, "get")? {
        let getter = get(realm, obj, "get")?;
        if !getter.is_undefined() && !is_callable(&getter) {
            return Err(Error::type_error(messages::GETTER_NOT_CALLABLE));
        }
        desc.get = Some(getter);
    }
    if has_property(realm, obj, "set")? {
        let setter = get(realm, obj, "set")?;
        if !setter.is_undefined() && !is_callable(&setter) {
            return Err(Error::type_error(messages::SETTER_NOT_CALLABLE));
        }
        desc.set = Some(setter);
    }
    if desc.is_accessor_descriptor() && desc.is_data_descriptor() {
        return Err(Error::type_error(messages::INVALID_PROPERTY_DESCRIPTOR));
    }
    Ok(desc)
}

/// FromPropertyDescriptor(Desc): undefined for an absent descriptor
pub fn from_property_descriptor(realm: &Realm, desc: Option<&PropertyDescriptor>) -> Result<Value> {
    let Some(desc) = desc else {
        return Ok(Value::Undefined);
    };
    let obj = realm.new_object();
    let fields = [
        ("value", desc.value.clone()),
        ("writable", desc.writable.map(Value::Boolean)),
        ("get", desc.get.clone()),
        ("set", desc.set.clone()),
        ("enumerable", desc.enumerable.map(Value::Boolean)),
        ("configurable", desc.configurable.map(Value::Boolean)),
    ];
    for (name, field) in fields {
        if let Some(field) = field {
            create_data_property_or_throw(realm, &obj, name, field)?;
        }
    }
    Ok(Value::Object(obj))
}

/// CompletePropertyDescriptor(Desc)
pub fn complete_property_descriptor(mut desc: PropertyDescriptor) -> PropertyDescriptor {
    desc.complete();
    desc
}

/// ToPropertyKey followed by HasProperty, used by the `in` operator
pub fn has_property_value(realm: &Realm, obj: &Value, key: &Value) -> Result<bool> {
    let Value::Object(obj) = obj else {
        return Err(Error::type_error(messages::not_an_object(&obj.to_string())));
    };
    let key = to_property_key(realm, key)?;
    obj.has_property(realm, &key)
}
