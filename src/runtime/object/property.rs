//! Property keys, partial descriptors and stored properties

use crate::runtime::indexed::{is_index, parse_index};
use crate::runtime::object::ObjectRef;
use crate::runtime::symbol::Symbol;
use crate::runtime::Value;
use std::fmt;
use std::rc::Rc;

/// Largest array index + 1, `2^32 - 1`
pub const MAX_ARRAY_LENGTH: u64 = 0xFFFF_FFFF;

/// A normalized property key.
///
/// Canonical integer strings below `2^53 - 1` are always represented as
/// [`PropertyKey::Index`], so `"7"` and `7` name the same property.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Index(u64),
    String(Rc<str>),
    Symbol(Symbol),
}

impl PropertyKey {
    /// Build a key from property name text
    pub fn from_str(s: &str) -> Self {
        match parse_index(s) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::String(Rc::from(s)),
        }
    }

    /// Build a key from an integer, falling back to its string form beyond the index range
    pub fn from_index(index: u64) -> Self {
        if is_index(index) {
            PropertyKey::Index(index)
        } else {
            PropertyKey::String(Rc::from(index.to_string()))
        }
    }

    /// The integer key, if this is one
    pub fn as_index(&self) -> Option<u64> {
        match self {
            PropertyKey::Index(index) => Some(*index),
            _ => None,
        }
    }

    /// The array index (below `2^32 - 1`), if this is one
    pub fn as_array_index(&self) -> Option<u32> {
        match self {
            PropertyKey::Index(index) if *index < MAX_ARRAY_LENGTH => Some(*index as u32),
            _ => None,
        }
    }

    /// Check whether this is a symbol key
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// The key as a language value (String or Symbol)
    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::Index(index) => Value::from(index.to_string()),
            PropertyKey::String(s) => Value::String(s.clone()),
            PropertyKey::Symbol(sym) => Value::Symbol(sym.clone()),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::from_str(s)
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::from_str(&s)
    }
}

impl From<Rc<str>> for PropertyKey {
    fn from(s: Rc<str>) -> Self {
        match parse_index(&s) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::String(s),
        }
    }
}

impl From<u32> for PropertyKey {
    fn from(index: u32) -> Self {
        PropertyKey::Index(u64::from(index))
    }
}

impl From<u64> for PropertyKey {
    fn from(index: u64) -> Self {
        PropertyKey::from_index(index)
    }
}

impl From<usize> for PropertyKey {
    fn from(index: usize) -> Self {
        PropertyKey::from_index(index as u64)
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}

impl From<Symbol> for PropertyKey {
    fn from(sym: Symbol) -> Self {
        PropertyKey::Symbol(sym)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Index(index) => write!(f, "{}", index),
            PropertyKey::String(s) => write!(f, "{}", s),
            PropertyKey::Symbol(sym) => write!(f, "{}", sym.descriptive_string()),
        }
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Index(index) => write!(f, "{}", index),
            PropertyKey::String(s) => write!(f, "{:?}", s),
            PropertyKey::Symbol(sym) => write!(f, "{:?}", sym),
        }
    }
}

/// A partial property descriptor; absent fields are `None`.
///
/// `get` and `set` hold either `undefined` or a callable object.
#[derive(Clone, Debug, Default)]
pub struct PropertyDescriptor {
    pub value: Option<Value>,
    pub writable: Option<bool>,
    pub get: Option<Value>,
    pub set: Option<Value>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    /// A fully populated data descriptor
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        PropertyDescriptor {
            value: Some(value),
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// A fully populated accessor descriptor
    pub fn accessor(
        get: Option<ObjectRef>,
        set: Option<ObjectRef>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        PropertyDescriptor {
            get: Some(Value::from(get)),
            set: Some(Value::from(set)),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// A descriptor that only carries a value
    pub fn value_only(value: Value) -> Self {
        PropertyDescriptor {
            value: Some(value),
            ..Default::default()
        }
    }

    /// IsAccessorDescriptor
    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    /// IsDataDescriptor
    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// IsGenericDescriptor
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    /// CompletePropertyDescriptor: fill every absent field with its default
    pub fn complete(&mut self) {
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            self.value.get_or_insert(Value::Undefined);
            self.writable.get_or_insert(false);
        } else {
            self.get.get_or_insert(Value::Undefined);
            self.set.get_or_insert(Value::Undefined);
        }
        self.enumerable.get_or_insert(false);
        self.configurable.get_or_insert(false);
    }
}

/// Payload of a stored property
#[derive(Clone, Debug)]
pub enum PropertySlot {
    Data { value: Value, writable: bool },
    Accessor {
        get: Option<ObjectRef>,
        set: Option<ObjectRef>,
    },
}

/// A complete property as stored on an object
#[derive(Clone, Debug)]
pub struct Property {
    pub slot: PropertySlot,
    pub enumerable: bool,
    pub configurable: bool,
}

impl Property {
    /// A data property
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Property {
            slot: PropertySlot::Data { value, writable },
            enumerable,
            configurable,
        }
    }

    /// An accessor property
    pub fn accessor(
        get: Option<ObjectRef>,
        set: Option<ObjectRef>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        Property {
            slot: PropertySlot::Accessor { get, set },
            enumerable,
            configurable,
        }
    }

    /// Build a property from a descriptor, defaulting absent fields
    pub fn from_descriptor(desc: &PropertyDescriptor) -> Self {
        let enumerable = desc.enumerable.unwrap_or(false);
        let configurable = desc.configurable.unwrap_or(false);
        if desc.is_accessor_descriptor() {
            Property::accessor(
                desc.get.as_ref().and_then(|v| v.as_object().cloned()),
                desc.set.as_ref().and_then(|v| v.as_object().cloned()),
                enumerable,
                configurable,
            )
        } else {
            Property::data(
                desc.value.clone().unwrap_or(Value::Undefined),
                desc.writable.unwrap_or(false),
                enumerable,
                configurable,
            )
        }
    }

    /// Check whether this is a data property
    pub fn is_data(&self) -> bool {
        matches!(self.slot, PropertySlot::Data { .. })
    }

    /// Check whether this is an accessor property
    pub fn is_accessor(&self) -> bool {
        matches!(self.slot, PropertySlot::Accessor { .. })
    }

    /// The value of a data property
    pub fn value(&self) -> Option<&Value> {
        match &self.slot {
            PropertySlot::Data { value, .. } => Some(value),
            PropertySlot::Accessor { .. } => None,
        }
    }

    /// Whether a data property is writable; accessors report false
    pub fn writable(&self) -> bool {
        matches!(self.slot, PropertySlot::Data { writable: true, .. })
    }

    /// The equivalent fully populated descriptor
    pub fn to_descriptor(&self) -> PropertyDescriptor {
        match &self.slot {
            PropertySlot::Data { value, writable } => {
                PropertyDescriptor::data(value.clone(), *writable, self.enumerable, self.configurable)
            }
            PropertySlot::Accessor { get, set } => PropertyDescriptor::accessor(
                get.clone(),
                set.clone(),
                self.enumerable,
                self.configurable,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalization() {
        assert_eq!(PropertyKey::from("12"), PropertyKey::Index(12));
        assert_eq!(PropertyKey::from("012"), PropertyKey::String(Rc::from("012")));
        assert_eq!(PropertyKey::from(4294967295u64), PropertyKey::Index(4294967295));
        assert_eq!(PropertyKey::from(4294967295u64).as_array_index(), None);
        assert_eq!(PropertyKey::from(7u32).as_array_index(), Some(7));
        assert_eq!(
            PropertyKey::from(u64::MAX),
            PropertyKey::String(Rc::from(u64::MAX.to_string()))
        );
        assert_eq!(PropertyKey::from("length").to_string(), "length");
    }

    #[test]
    fn test_descriptor_classification() {
        let generic = PropertyDescriptor {
            enumerable: Some(true),
            ..Default::default()
        };
        assert!(generic.is_generic_descriptor());
        assert!(PropertyDescriptor::value_only(Value::Null).is_data_descriptor());
        assert!(PropertyDescriptor::accessor(None, None, false, false).is_accessor_descriptor());
    }

    #[test]
    fn test_complete_descriptor() {
        let mut desc = PropertyDescriptor {
            writable: Some(true),
            ..Default::default()
        };
        desc.complete();
        assert!(matches!(desc.value, Some(Value::Undefined)));
        assert_eq!(desc.enumerable, Some(false));
        assert_eq!(desc.configurable, Some(false));
        assert_eq!(desc.writable, Some(true));

        let prop = Property::from_descriptor(&desc);
        assert!(prop.is_data());
        assert!(prop.writable());
    }
}
