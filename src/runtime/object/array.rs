//! Array exotic objects
//!
//! Elements are ordinary integer-keyed properties. The only exotic behavior
//! is `[[DefineOwnProperty]]`, which keeps `length` above every array index
//! and truncates the array when `length` shrinks.

use super::ordinary::{ordinary_get, ordinary_has_property, ordinary_set, OrdinaryObject};
use super::property::{Property, PropertyDescriptor, PropertyKey, MAX_ARRAY_LENGTH};
use super::{JsObject, ObjectRef};
use crate::error::{messages, Error, Result};
use crate::runtime::operations::{to_number, to_uint32};
use crate::runtime::realm::Intrinsic;
use crate::runtime::{Realm, Value};
use std::any::Any;
use std::rc::Rc;

/// An Array exotic object
pub struct ArrayObject {
    object: OrdinaryObject,
}

fn length_key() -> PropertyKey {
    PropertyKey::from("length")
}

impl ArrayObject {
    /// ArrayCreate(length, proto)
    pub fn create(realm: &Realm, length: u64, proto: Option<ObjectRef>) -> Result<ObjectRef> {
        if length > MAX_ARRAY_LENGTH {
            return Err(Error::range_error(messages::INVALID_ARRAY_LENGTH));
        }
        let proto = proto.unwrap_or_else(|| realm.intrinsic(Intrinsic::ArrayPrototype));
        let object = OrdinaryObject::new(Some(proto)).with_class_name("Array");
        object.put_property(
            &length_key(),
            Property::data(Value::Number(length as f64), true, false, false),
        );
        Ok(Rc::new(ArrayObject { object }))
    }

    /// Current value of the `length` property
    pub fn length(&self) -> u64 {
        self.object
            .own_property(&length_key())
            .and_then(|prop| prop.value().and_then(Value::as_number))
            .map_or(0, |n| n as u64)
    }

    fn length_property(&self) -> Property {
        self.object
            .own_property(&length_key())
            .unwrap_or_else(|| Property::data(Value::Number(0.0), true, false, false))
    }

    /// ArraySetLength
    fn set_length(&self, realm: &Realm, desc: PropertyDescriptor) -> Result<bool> {
        let Some(value) = desc.value.clone() else {
            return Ok(self.object.define_own_property_ordinary(&length_key(), desc));
        };
        let new_len = to_uint32(realm, &value)?;
        let number_len = to_number(realm, &value)?;
        if f64::from(new_len) != number_len {
            return Err(Error::range_error(messages::INVALID_ARRAY_LENGTH));
        }
        let new_len = u64::from(new_len);
        let mut new_len_desc = desc;
        new_len_desc.value = Some(Value::Number(new_len as f64));

        let old_len_prop = self.length_property();
        let old_len = self.length();
        if new_len >= old_len {
            return Ok(self.object.define_own_property_ordinary(&length_key(), new_len_desc));
        }
        if !old_len_prop.writable() {
            return Ok(false);
        }
        let new_writable = new_len_desc.writable != Some(false);
        if !new_writable {
            new_len_desc.writable = Some(true);
        }
        if !self
            .object
            .define_own_property_ordinary(&length_key(), new_len_desc.clone())
        {
            return Ok(false);
        }

        for index in self.object.index_keys_descending(new_len, old_len) {
            if !self.object.delete_ordinary(&PropertyKey::Index(index)) {
                new_len_desc.value = Some(Value::Number((index + 1) as f64));
                if !new_writable {
                    new_len_desc.writable = Some(false);
                }
                self.object.define_own_property_ordinary(&length_key(), new_len_desc);
                return Ok(false);
            }
        }

        if !new_writable {
            let freeze_length = PropertyDescriptor {
                writable: Some(false),
                ..Default::default()
            };
            self.object.define_own_property_ordinary(&length_key(), freeze_length);
        }
        Ok(true)
    }
}

impl JsObject for ArrayObject {
    forward_to_ordinary!(object);

    fn define_own_property(
        &self,
        realm: &Realm,
        key: &PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool> {
        if let PropertyKey::String(name) = key {
            if &**name == "length" {
                return self.set_length(realm, desc);
            }
        }
        let Some(index) = key.as_array_index() else {
            return Ok(self.object.define_own_property_ordinary(key, desc));
        };
        let index = u64::from(index);
        let old_len_prop = self.length_property();
        let old_len = self.length();
        if index >= old_len && !old_len_prop.writable() {
            return Ok(false);
        }
        if !self.object.define_own_property_ordinary(key, desc) {
            return Ok(false);
        }
        if index >= old_len {
            let mut updated = old_len_prop;
            updated.slot = super::PropertySlot::Data {
                value: Value::Number((index + 1) as f64),
                writable: true,
            };
            self.object.put_property(&length_key(), updated);
        }
        Ok(true)
    }

    fn is_array(&self, _realm: &Realm) -> Result<bool> {
        Ok(true)
    }

    fn class_name(&self) -> &'static str {
        "Array"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn array(realm: &Realm, len: u64) -> ObjectRef {
        ArrayObject::create(realm, len, None).unwrap()
    }

    fn length_of(realm: &Realm, obj: &ObjectRef) -> Value {
        obj.get(realm, &length_key(), &Value::Undefined).unwrap()
    }

    #[test]
    fn test_index_write_extends_length() {
        let realm = Realm::new();
        let arr = array(&realm, 0);
        let receiver = Value::Object(arr.clone());
        arr.set(&realm, &PropertyKey::from(4u32), Value::from("x"), &receiver).unwrap();
        assert_eq!(length_of(&realm, &arr), Value::from(5.0));
        assert!(arr.is_array(&realm).unwrap());
    }

    #[test]
    fn test_length_truncates_elements() {
        let realm = Realm::new();
        let arr = array(&realm, 0);
        let receiver = Value::Object(arr.clone());
        for i in 0..10u32 {
            arr.set(&realm, &PropertyKey::from(i), Value::from(i), &receiver).unwrap();
        }
        arr.set(&realm, &length_key(), Value::from(3.0), &receiver).unwrap();
        assert_eq!(length_of(&realm, &arr), Value::from(3.0));
        assert!(!arr.has_property(&realm, &PropertyKey::from(3u32)).unwrap());
        assert!(arr.has_property(&realm, &PropertyKey::from(2u32)).unwrap());
    }

    #[test]
    fn test_truncation_stops_at_non_configurable_element() {
        let realm = Realm::new();
        let arr = array(&realm, 0);
        for i in 0..5u32 {
            let configurable = i != 2;
            arr.define_own_property(
                &realm,
                &PropertyKey::from(i),
                PropertyDescriptor::data(Value::from(i), true, true, configurable),
            )
            .unwrap();
        }
        let ok = arr
            .define_own_property(&realm, &length_key(), PropertyDescriptor::value_only(Value::from(0.0)))
            .unwrap();
        assert!(!ok);
        assert_eq!(length_of(&realm, &arr), Value::from(3.0));
    }

    #[test]
    fn test_invalid_length_is_range_error() {
        let realm = Realm::new();
        let arr = array(&realm, 0);
        let err = arr
            .define_own_property(&realm, &length_key(), PropertyDescriptor::value_only(Value::from(1.5)))
            .unwrap_err();
        assert!(err.is_kind(ErrorKind::RangeError));
        assert!(ArrayObject::create(&realm, MAX_ARRAY_LENGTH + 1, None).is_err());
    }

    #[test]
    fn test_non_writable_length_blocks_growth() {
        let realm = Realm::new();
        let arr = array(&realm, 2);
        let freeze = PropertyDescriptor {
            writable: Some(false),
            ..Default::default()
        };
        assert!(arr.define_own_property(&realm, &length_key(), freeze).unwrap());
        let grew = arr
            .define_own_property(&realm, &PropertyKey::from(5u32), PropertyDescriptor::value_only(Value::Null))
            .unwrap();
        assert!(!grew);
        assert_eq!(length_of(&realm, &arr), Value::from(2.0));
    }
}
