//! Ordinary objects
//!
//! Integer-keyed properties live in an [`IndexedMap`]; string and symbol keyed
//! properties live in a hash map that remembers insertion order, which is
//! what `[[OwnPropertyKeys]]` reports.

use super::property::{Property, PropertyDescriptor, PropertyKey, PropertySlot};
use super::{JsObject, ObjectRef};
use crate::error::Result;
use crate::runtime::indexed::IndexedMap;
use crate::runtime::{Realm, Value};
use rustc_hash::FxHashMap as HashMap;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct PropertyStorage {
    indexed: IndexedMap<Property>,
    named: HashMap<PropertyKey, NamedProperty>,
    next_order: u64,
}

struct NamedProperty {
    order: u64,
    property: Property,
}

impl PropertyStorage {
    fn get(&self, key: &PropertyKey) -> Option<&Property> {
        match key {
            PropertyKey::Index(index) => self.indexed.get(*index),
            _ => self.named.get(key).map(|named| &named.property),
        }
    }

    fn insert(&mut self, key: &PropertyKey, property: Property) {
        match key {
            PropertyKey::Index(index) => {
                self.indexed.put(*index, property);
            }
            _ => {
                if let Some(named) = self.named.get_mut(key) {
                    named.property = property;
                } else {
                    let order = self.next_order;
                    self.next_order += 1;
                    self.named.insert(key.clone(), NamedProperty { order, property });
                }
            }
        }
    }

    fn remove(&mut self, key: &PropertyKey) -> bool {
        match key {
            PropertyKey::Index(index) => self.indexed.remove(*index).is_some(),
            _ => self.named.remove(key).is_some(),
        }
    }

    fn keys(&self) -> Vec<PropertyKey> {
        let mut strings: Vec<(&PropertyKey, u64)> = Vec::new();
        let mut symbols: Vec<(&PropertyKey, u64)> = Vec::new();
        for (key, named) in &self.named {
            if key.is_symbol() {
                symbols.push((key, named.order));
            } else {
                strings.push((key, named.order));
            }
        }
        strings.sort_by_key(|&(_, order)| order);
        symbols.sort_by_key(|&(_, order)| order);

        let mut keys = Vec::with_capacity(self.indexed.count() + strings.len() + symbols.len());
        keys.extend(self.indexed.keys().map(PropertyKey::Index));
        keys.extend(strings.into_iter().map(|(key, _)| key.clone()));
        keys.extend(symbols.into_iter().map(|(key, _)| key.clone()));
        keys
    }
}

/// An ordinary object
pub struct OrdinaryObject {
    prototype: RefCell<Option<ObjectRef>>,
    extensible: Cell<bool>,
    storage: RefCell<PropertyStorage>,
    class_name: &'static str,
    primitive: Option<Value>,
    htmldda: bool,
}

impl OrdinaryObject {
    /// Create an ordinary object with the given prototype
    pub fn new(prototype: Option<ObjectRef>) -> Self {
        OrdinaryObject {
            prototype: RefCell::new(prototype),
            extensible: Cell::new(true),
            storage: RefCell::new(PropertyStorage::default()),
            class_name: "Object",
            primitive: None,
            htmldda: false,
        }
    }

    /// ObjectCreate(proto) as a shared reference
    pub fn create(prototype: Option<ObjectRef>) -> ObjectRef {
        Rc::new(Self::new(prototype))
    }

    /// Set the class name reported in diagnostics
    pub fn with_class_name(mut self, class_name: &'static str) -> Self {
        self.class_name = class_name;
        self
    }

    /// Turn this object into a primitive wrapper
    pub fn with_primitive(mut self, value: Value) -> Self {
        self.primitive = Some(value);
        self
    }

    /// Give this object the `[[IsHTMLDDA]]` slot
    pub fn with_htmldda(mut self) -> Self {
        self.htmldda = true;
        self
    }

    /// Own property lookup without going through the realm
    pub fn own_property(&self, key: &PropertyKey) -> Option<Property> {
        self.storage.borrow().get(key).cloned()
    }

    /// Store a property directly, bypassing validation
    pub(crate) fn put_property(&self, key: &PropertyKey, property: Property) {
        self.storage.borrow_mut().insert(key, property);
    }

    /// Remove a property directly
    pub(crate) fn remove_property(&self, key: &PropertyKey) -> bool {
        self.storage.borrow_mut().remove(key)
    }

    /// Integer keys in `from..to`, highest first
    pub(crate) fn index_keys_descending(&self, from: u64, to: u64) -> Vec<u64> {
        let storage = self.storage.borrow();
        if from >= to {
            return Vec::new();
        }
        storage.indexed.indices(from, to).rev().collect()
    }

    /// OrdinaryDefineOwnProperty
    pub(crate) fn define_own_property_ordinary(
        &self,
        key: &PropertyKey,
        desc: PropertyDescriptor,
    ) -> bool {
        let current = self.own_property(key);
        let extensible = self.extensible.get();
        validate_and_apply_property_descriptor(Some((self, key)), extensible, &desc, current.as_ref())
    }

    /// OrdinarySetPrototypeOf. `identity` is the address of the outermost object.
    pub(crate) fn set_prototype_with_identity(
        &self,
        realm: &Realm,
        proto: Option<ObjectRef>,
        identity: *const (),
    ) -> Result<bool> {
        {
            let current = self.prototype.borrow();
            let unchanged = match (&proto, &*current) {
                (None, None) => true,
                (Some(a), Some(b)) => super::same_object(a, b),
                _ => false,
            };
            if unchanged {
                return Ok(true);
            }
        }
        if !self.extensible.get() {
            return Ok(false);
        }
        let mut p = proto.clone();
        while let Some(obj) = p {
            if std::ptr::addr_eq(Rc::as_ptr(&obj), identity) {
                return Ok(false);
            }
            p = obj.get_prototype_of(realm)?;
        }
        *self.prototype.borrow_mut() = proto;
        Ok(true)
    }

    /// OrdinaryDelete
    pub(crate) fn delete_ordinary(&self, key: &PropertyKey) -> bool {
        match self.own_property(key) {
            None => true,
            Some(prop) if prop.configurable => self.remove_property(key),
            Some(_) => false,
        }
    }

    pub(crate) fn prototype(&self) -> Option<ObjectRef> {
        self.prototype.borrow().clone()
    }

    pub(crate) fn extensible(&self) -> bool {
        self.extensible.get()
    }

    pub(crate) fn prevent_extensions_ordinary(&self) -> bool {
        self.extensible.set(false);
        true
    }

    pub(crate) fn own_keys_ordinary(&self) -> Vec<PropertyKey> {
        self.storage.borrow().keys()
    }
}

/// ValidateAndApplyPropertyDescriptor.
///
/// With `target == None` this only checks compatibility.
pub fn validate_and_apply_property_descriptor(
    target: Option<(&OrdinaryObject, &PropertyKey)>,
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&Property>,
) -> bool {
    let Some(current) = current else {
        if !extensible {
            return false;
        }
        if let Some((obj, key)) = target {
            obj.put_property(key, Property::from_descriptor(desc));
        }
        return true;
    };

    if desc.is_generic_descriptor() && desc.enumerable.is_none() && desc.configurable.is_none() {
        return true;
    }

    if !current.configurable {
        if desc.configurable == Some(true) {
            return false;
        }
        if desc.enumerable.is_some_and(|e| e != current.enumerable) {
            return false;
        }
    }

    let updated = if desc.is_generic_descriptor() {
        current.clone()
    } else if current.is_data() != desc.is_data_descriptor() {
        if !current.configurable {
            return false;
        }
        if current.is_data() {
            Property::accessor(None, None, current.enumerable, current.configurable)
        } else {
            Property::data(Value::Undefined, false, current.enumerable, current.configurable)
        }
    } else {
        match &current.slot {
            PropertySlot::Data { value, writable } => {
                if !current.configurable && !*writable {
                    if desc.writable == Some(true) {
                        return false;
                    }
                    if desc.value.as_ref().is_some_and(|v| !v.same_value(value)) {
                        return false;
                    }
                    return true;
                }
            }
            PropertySlot::Accessor { get, set } => {
                if !current.configurable {
                    if desc
                        .set
                        .as_ref()
                        .is_some_and(|s| !s.same_value(&Value::from(set.clone())))
                    {
                        return false;
                    }
                    if desc
                        .get
                        .as_ref()
                        .is_some_and(|g| !g.same_value(&Value::from(get.clone())))
                    {
                        return false;
                    }
                    return true;
                }
            }
        }
        current.clone()
    };

    if let Some((obj, key)) = target {
        obj.put_property(key, apply_descriptor(updated, desc));
    }
    true
}

fn apply_descriptor(mut property: Property, desc: &PropertyDescriptor) -> Property {
    match &mut property.slot {
        PropertySlot::Data { value, writable } => {
            if let Some(v) = &desc.value {
                *value = v.clone();
            }
            if let Some(w) = desc.writable {
                *writable = w;
            }
        }
        PropertySlot::Accessor { get, set } => {
            if let Some(g) = &desc.get {
                *get = g.as_object().cloned();
            }
            if let Some(s) = &desc.set {
                *set = s.as_object().cloned();
            }
        }
    }
    if let Some(e) = desc.enumerable {
        property.enumerable = e;
    }
    if let Some(c) = desc.configurable {
        property.configurable = c;
    }
    property
}

/// OrdinaryDefineOwnProperty for objects backed by an [`OrdinaryObject`]
pub fn ordinary_define_own_property(
    object: &OrdinaryObject,
    key: &PropertyKey,
    desc: PropertyDescriptor,
) -> bool {
    object.define_own_property_ordinary(key, desc)
}

/// OrdinaryHasProperty
pub fn ordinary_has_property(realm: &Realm, object: &dyn JsObject, key: &PropertyKey) -> Result<bool> {
    if object.get_own_property(realm, key)?.is_some() {
        return Ok(true);
    }
    match object.get_prototype_of(realm)? {
        Some(parent) => parent.has_property(realm, key),
        None => Ok(false),
    }
}

/// OrdinaryGet
pub fn ordinary_get(
    realm: &Realm,
    object: &dyn JsObject,
    key: &PropertyKey,
    receiver: &Value,
) -> Result<Value> {
    let Some(property) = object.get_own_property(realm, key)? else {
        return match object.get_prototype_of(realm)? {
            Some(parent) => parent.get(realm, key, receiver),
            None => Ok(Value::Undefined),
        };
    };
    match property.slot {
        PropertySlot::Data { value, .. } => Ok(value),
        PropertySlot::Accessor { get: Some(getter), .. } => getter.call(realm, receiver, &[]),
        PropertySlot::Accessor { get: None, .. } => Ok(Value::Undefined),
    }
}

/// OrdinarySet
pub fn ordinary_set(
    realm: &Realm,
    object: &dyn JsObject,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
) -> Result<bool> {
    let own = object.get_own_property(realm, key)?;
    ordinary_set_with_own_descriptor(realm, object, key, value, receiver, own)
}

/// OrdinarySetWithOwnDescriptor
pub fn ordinary_set_with_own_descriptor(
    realm: &Realm,
    object: &dyn JsObject,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
    own: Option<Property>,
) -> Result<bool> {
    let own = match own {
        Some(own) => own,
        None => match object.get_prototype_of(realm)? {
            Some(parent) => return parent.set(realm, key, value, receiver),
            None => Property::data(Value::Undefined, true, true, true),
        },
    };
    match own.slot {
        PropertySlot::Data { writable, .. } => {
            if !writable {
                return Ok(false);
            }
            let Value::Object(receiver_obj) = receiver else {
                return Ok(false);
            };
            match receiver_obj.get_own_property(realm, key)? {
                Some(existing) => {
                    if existing.is_accessor() || !existing.writable() {
                        return Ok(false);
                    }
                    receiver_obj.define_own_property(realm, key, PropertyDescriptor::value_only(value))
                }
                None => receiver_obj.define_own_property(
                    realm,
                    key,
                    PropertyDescriptor::data(value, true, true, true),
                ),
            }
        }
        PropertySlot::Accessor { set: Some(setter), .. } => {
            setter.call(realm, receiver, &[value])?;
            Ok(true)
        }
        PropertySlot::Accessor { set: None, .. } => Ok(false),
    }
}

impl JsObject for OrdinaryObject {
    fn get_prototype_of(&self, _realm: &Realm) -> Result<Option<ObjectRef>> {
        Ok(self.prototype())
    }

    fn set_prototype_of(&self, realm: &Realm, proto: Option<ObjectRef>) -> Result<bool> {
        self.set_prototype_with_identity(realm, proto, self as *const Self as *const ())
    }

    fn is_extensible(&self, _realm: &Realm) -> Result<bool> {
        Ok(self.extensible())
    }

    fn prevent_extensions(&self, _realm: &Realm) -> Result<bool> {
        Ok(self.prevent_extensions_ordinary())
    }

    fn get_own_property(&self, _realm: &Realm, key: &PropertyKey) -> Result<Option<Property>> {
        Ok(self.own_property(key))
    }

    fn define_own_property(
        &self,
        _realm: &Realm,
        key: &PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool> {
        Ok(self.define_own_property_ordinary(key, desc))
    }

    fn has_property(&self, realm: &Realm, key: &PropertyKey) -> Result<bool> {
        ordinary_has_property(realm, self, key)
    }

    fn get(&self, realm: &Realm, key: &PropertyKey, receiver: &Value) -> Result<Value> {
        ordinary_get(realm, self, key, receiver)
    }

    fn set(&self, realm: &Realm, key: &PropertyKey, value: Value, receiver: &Value) -> Result<bool> {
        ordinary_set(realm, self, key, value, receiver)
    }

    fn delete(&self, _realm: &Realm, key: &PropertyKey) -> Result<bool> {
        Ok(self.delete_ordinary(key))
    }

    fn own_property_keys(&self, _realm: &Realm) -> Result<Vec<PropertyKey>> {
        Ok(self.own_keys_ordinary())
    }

    fn is_htmldda(&self) -> bool {
        self.htmldda
    }

    fn class_name(&self) -> &'static str {
        self.class_name
    }

    fn primitive_value(&self) -> Option<Value> {
        self.primitive.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
