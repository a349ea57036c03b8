//! Object environment records
//!
//! Bindings are the properties of a backing object. Records created for a
//! `with` statement also honor the object's `@@unscopables`.

use crate::error::{messages, Error, Result};
use crate::runtime::object::{ObjectRef, PropertyDescriptor, PropertyKey};
use crate::runtime::operations::{define_property_or_throw, get, has_property, set, to_boolean};
use crate::runtime::symbol::WellKnownSymbol;
use crate::runtime::{Realm, Value};

/// Environment record backed by an object
#[derive(Debug)]
pub struct ObjectEnvironmentRecord {
    binding_object: ObjectRef,
    with_environment: bool,
}

impl ObjectEnvironmentRecord {
    pub fn new(binding_object: ObjectRef, with_environment: bool) -> Self {
        ObjectEnvironmentRecord {
            binding_object,
            with_environment,
        }
    }

    /// The backing object
    pub fn binding_object(&self) -> &ObjectRef {
        &self.binding_object
    }

    /// Check whether this record was created by a `with` statement
    pub fn is_with_environment(&self) -> bool {
        self.with_environment
    }

    /// HasBinding(N)
    pub fn has_binding(&self, realm: &Realm, name: &str) -> Result<bool> {
        let obj = &self.binding_object;
        if !has_property(realm, obj, name)? {
            return Ok(false);
        }
        if !self.with_environment {
            return Ok(true);
        }
        if let Value::Object(unscopables) = get(realm, obj, WellKnownSymbol::Unscopables.symbol())? {
            if to_boolean(&get(realm, &unscopables, name)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// CreateMutableBinding(N, D)
    pub fn create_mutable_binding(&self, realm: &Realm, name: &str, deletable: bool) -> Result<()> {
        define_property_or_throw(
            realm,
            &self.binding_object,
            name,
            PropertyDescriptor::data(Value::Undefined, true, true, deletable),
        )
    }

    /// InitializeBinding(N, V)
    pub fn initialize_binding(&self, realm: &Realm, name: &str, value: Value) -> Result<()> {
        self.set_mutable_binding(realm, name, value, false)
    }

    /// SetMutableBinding(N, V, S)
    pub fn set_mutable_binding(&self, realm: &Realm, name: &str, value: Value, strict: bool) -> Result<()> {
        let key = PropertyKey::from(name);
        let still_exists = has_property(realm, &self.binding_object, &key)?;
        if !still_exists && strict {
            return Err(Error::reference_error(messages::not_defined(name)));
        }
        set(realm, &self.binding_object, key, value, strict)?;
        Ok(())
    }

    /// GetBindingValue(N, S)
    pub fn get_binding_value(&self, realm: &Realm, name: &str, strict: bool) -> Result<Value> {
        let key = PropertyKey::from(name);
        if !has_property(realm, &self.binding_object, &key)? {
            if strict {
                return Err(Error::reference_error(messages::not_defined(name)));
            }
            return Ok(Value::Undefined);
        }
        get(realm, &self.binding_object, key)
    }

    /// DeleteBinding(N)
    pub fn delete_binding(&self, realm: &Realm, name: &str) -> Result<bool> {
        self.binding_object.delete(realm, &PropertyKey::from(name))
    }

    /// WithBaseObject()
    pub fn with_base_object(&self) -> Value {
        if self.with_environment {
            Value::Object(self.binding_object.clone())
        } else {
            Value::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::operations::create_data_property_or_throw;

    #[test]
    fn test_bindings_are_properties() {
        let realm = Realm::new();
        let obj = realm.new_object();
        let record = ObjectEnvironmentRecord::new(obj.clone(), false);
        record.create_mutable_binding(&realm, "x", true).unwrap();
        record.initialize_binding(&realm, "x", Value::from(1.0)).unwrap();
        assert_eq!(get(&realm, &obj, "x").unwrap(), Value::from(1.0));
        assert!(record.has_binding(&realm, "x").unwrap());
        assert!(record.delete_binding(&realm, "x").unwrap());
        assert!(!record.has_binding(&realm, "x").unwrap());
        assert_eq!(record.get_binding_value(&realm, "x", false).unwrap(), Value::Undefined);
        let err = record.get_binding_value(&realm, "x", true).unwrap_err();
        assert!(err.is_kind(ErrorKind::ReferenceError));
    }

    #[test]
    fn test_strict_set_of_vanished_binding() {
        let realm = Realm::new();
        let record = ObjectEnvironmentRecord::new(realm.new_object(), false);
        let err = record
            .set_mutable_binding(&realm, "gone", Value::Null, true)
            .unwrap_err();
        assert!(err.is_kind(ErrorKind::ReferenceError));
        record.set_mutable_binding(&realm, "gone", Value::Null, false).unwrap();
        assert!(record.has_binding(&realm, "gone").unwrap());
    }

    #[test]
    fn test_with_environment_honors_unscopables() {
        let realm = Realm::new();
        let obj = realm.new_object();
        create_data_property_or_throw(&realm, &obj, "hidden", Value::from(1.0)).unwrap();
        create_data_property_or_throw(&realm, &obj, "shown", Value::from(2.0)).unwrap();
        let unscopables = realm.new_object();
        create_data_property_or_throw(&realm, &unscopables, "hidden", Value::from(true)).unwrap();
        create_data_property_or_throw(
            &realm,
            &obj,
            WellKnownSymbol::Unscopables.symbol(),
            Value::Object(unscopables),
        )
        .unwrap();

        let with = ObjectEnvironmentRecord::new(obj.clone(), true);
        assert!(!with.has_binding(&realm, "hidden").unwrap());
        assert!(with.has_binding(&realm, "shown").unwrap());
        assert!(with.with_base_object().is_object());

        let plain = ObjectEnvironmentRecord::new(obj, false);
        assert!(plain.has_binding(&realm, "hidden").unwrap());
        assert!(plain.with_base_object().is_undefined());
    }
}
