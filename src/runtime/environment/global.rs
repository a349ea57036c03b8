//! Global environment records
//!
//! A global record combines an object record over the global object (for
//! `var` and function declarations) with a declarative record (for `let`,
//! `const` and `class`), and remembers which names were declared with `var`.

use super::declarative::DeclarativeEnvironmentRecord;
use super::object::ObjectEnvironmentRecord;
use crate::error::{messages, Error, Result};
use crate::runtime::object::{ObjectRef, PropertyDescriptor, PropertyKey};
use crate::runtime::operations::{define_property_or_throw, set};
use crate::runtime::{Realm, Value};
use rustc_hash::FxHashSet as HashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Environment record for the global scope
#[derive(Debug)]
pub struct GlobalEnvironmentRecord {
    object_record: ObjectEnvironmentRecord,
    declarative: DeclarativeEnvironmentRecord,
    global_this: ObjectRef,
    var_names: RefCell<HashSet<Rc<str>>>,
}

impl GlobalEnvironmentRecord {
    pub fn new(global: ObjectRef, this_value: ObjectRef) -> Self {
        GlobalEnvironmentRecord {
            object_record: ObjectEnvironmentRecord::new(global, false),
            declarative: DeclarativeEnvironmentRecord::new(),
            global_this: this_value,
            var_names: RefCell::new(HashSet::default()),
        }
    }

    /// The global object
    pub fn global_object(&self) -> &ObjectRef {
        self.object_record.binding_object()
    }

    pub fn object_record(&self) -> &ObjectEnvironmentRecord {
        &self.object_record
    }

    pub fn declarative_record(&self) -> &DeclarativeEnvironmentRecord {
        &self.declarative
    }

    /// HasBinding(N)
    pub fn has_binding(&self, realm: &Realm, name: &str) -> Result<bool> {
        if self.declarative.has_binding(name) {
            return Ok(true);
        }
        self.object_record.has_binding(realm, name)
    }

    /// CreateMutableBinding(N, D)
    pub fn create_mutable_binding(&self, name: &str, deletable: bool) -> Result<()> {
        if self.declarative.has_binding(name) {
            return Err(Error::type_error(messages::already_declared(name)));
        }
        self.declarative.create_mutable_binding(name, deletable);
        Ok(())
    }

    /// CreateImmutableBinding(N, S)
    pub fn create_immutable_binding(&self, name: &str, strict: bool) -> Result<()> {
        if self.declarative.has_binding(name) {
            return Err(Error::type_error(messages::already_declared(name)));
        }
        self.declarative.create_immutable_binding(name, strict);
        Ok(())
    }

    /// InitializeBinding(N, V)
    pub fn initialize_binding(&self, realm: &Realm, name: &str, value: Value) -> Result<()> {
        if self.declarative.has_binding(name) {
            self.declarative.initialize_binding(name, value);
            return Ok(());
        }
        self.object_record.initialize_binding(realm, name, value)
    }

    /// SetMutableBinding(N, V, S)
    pub fn set_mutable_binding(&self, realm: &Realm, name: &str, value: Value, strict: bool) -> Result<()> {
        if self.declarative.has_binding(name) {
            return self.declarative.set_mutable_binding(name, value, strict);
        }
        self.object_record.set_mutable_binding(realm, name, value, strict)
    }

    /// GetBindingValue(N, S)
    pub fn get_binding_value(&self, realm: &Realm, name: &str, strict: bool) -> Result<Value> {
        if self.declarative.has_binding(name) {
            return self.declarative.get_binding_value(name, strict);
        }
        self.object_record.get_binding_value(realm, name, strict)
    }

    /// DeleteBinding(N)
    pub fn delete_binding(&self, realm: &Realm, name: &str) -> Result<bool> {
        if self.declarative.has_binding(name) {
            return Ok(self.declarative.delete_binding(name));
        }
        let global = self.global_object();
        let key = PropertyKey::from(name);
        if global.get_own_property(realm, &key)?.is_some() {
            let deleted = global.delete(realm, &key)?;
            if deleted {
                self.var_names.borrow_mut().remove(name);
            }
            return Ok(deleted);
        }
        Ok(true)
    }

    /// GetThisBinding()
    pub fn get_this_binding(&self) -> Value {
        Value::Object(self.global_this.clone())
    }

    /// HasVarDeclaration(N)
    pub fn has_var_declaration(&self, name: &str) -> bool {
        self.var_names.borrow().contains(name)
    }

    /// HasLexicalDeclaration(N)
    pub fn has_lexical_declaration(&self, name: &str) -> bool {
        self.declarative.has_binding(name)
    }

    /// HasRestrictedGlobalProperty(N)
    pub fn has_restricted_global_property(&self, realm: &Realm, name: &str) -> Result<bool> {
        let existing = self
            .global_object()
            .get_own_property(realm, &PropertyKey::from(name))?;
        Ok(existing.is_some_and(|prop| !prop.configurable))
    }

    /// CanDeclareGlobalVar(N)
    pub fn can_declare_global_var(&self, realm: &Realm, name: &str) -> Result<bool> {
        let global = self.global_object();
        if global.get_own_property(realm, &PropertyKey::from(name))?.is_some() {
            return Ok(true);
        }
        global.is_extensible(realm)
    }

    /// CanDeclareGlobalFunction(N)
    pub fn can_declare_global_function(&self, realm: &Realm, name: &str) -> Result<bool> {
        let global = self.global_object();
        let Some(existing) = global.get_own_property(realm, &PropertyKey::from(name))? else {
            return global.is_extensible(realm);
        };
        if existing.configurable {
            return Ok(true);
        }
        Ok(existing.is_data() && existing.writable() && existing.enumerable)
    }

    /// CreateGlobalVarBinding(N, D)
    pub fn create_global_var_binding(&self, realm: &Realm, name: &str, deletable: bool) -> Result<()> {
        let global = self.global_object();
        let has_own = global.get_own_property(realm, &PropertyKey::from(name))?.is_some();
        if !has_own && global.is_extensible(realm)? {
            self.object_record.create_mutable_binding(realm, name, deletable)?;
            self.object_record.initialize_binding(realm, name, Value::Undefined)?;
        }
        self.var_names.borrow_mut().insert(Rc::from(name));
        Ok(())
    }

    /// CreateGlobalFunctionBinding(N, V, D)
    pub fn create_global_function_binding(
        &self,
        realm: &Realm,
        name: &str,
        value: Value,
        deletable: bool,
    ) -> Result<()> {
        let global = self.global_object();
        let key = PropertyKey::from(name);
        let existing = global.get_own_property(realm, &key)?;
        let desc = match existing {
            Some(prop) if !prop.configurable => PropertyDescriptor::value_only(value.clone()),
            _ => PropertyDescriptor::data(value.clone(), true, true, deletable),
        };
        define_property_or_throw(realm, global, &key, desc)?;
        set(realm, global, key, value, false)?;
        self.var_names.borrow_mut().insert(Rc::from(name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::operations::get;

    fn record(realm: &Realm) -> GlobalEnvironmentRecord {
        let global = realm.global_object().clone();
        GlobalEnvironmentRecord::new(global.clone(), global)
    }

    #[test]
    fn test_lexical_shadows_object_part() {
        let realm = Realm::new();
        let global = record(&realm);
        global.create_global_var_binding(&realm, "v", false).unwrap();
        assert!(global.has_var_declaration("v"));
        assert_eq!(global.get_binding_value(&realm, "v", true).unwrap(), Value::Undefined);

        global.create_mutable_binding("l", false).unwrap();
        global.initialize_binding(&realm, "l", Value::from(1.0)).unwrap();
        assert!(global.has_lexical_declaration("l"));
        assert!(!global.has_var_declaration("l"));
        assert_eq!(get(&realm, global.global_object(), "l").unwrap(), Value::Undefined);

        let err = global.create_immutable_binding("l", true).unwrap_err();
        assert!(err.is_kind(ErrorKind::TypeError));
    }

    #[test]
    fn test_delete_var_binding() {
        let realm = Realm::new();
        let global = record(&realm);
        global.create_global_var_binding(&realm, "deletable", true).unwrap();
        global.create_global_var_binding(&realm, "fixed", false).unwrap();
        assert!(global.delete_binding(&realm, "deletable").unwrap());
        assert!(!global.has_var_declaration("deletable"));
        assert!(!global.delete_binding(&realm, "fixed").unwrap());
        assert!(global.has_var_declaration("fixed"));
        assert!(global.has_restricted_global_property(&realm, "fixed").unwrap());
    }

    #[test]
    fn test_can_declare_global_function() {
        let realm = Realm::new();
        let global = record(&realm);
        assert!(global.can_declare_global_function(&realm, "f").unwrap());
        global
            .create_global_function_binding(&realm, "f", Value::from(1.0), false)
            .unwrap();
        assert_eq!(get(&realm, global.global_object(), "f").unwrap(), Value::from(1.0));
        // non-configurable but writable and enumerable
        assert!(global.can_declare_global_function(&realm, "f").unwrap());

        global.global_object().prevent_extensions(&realm).unwrap();
        assert!(!global.can_declare_global_function(&realm, "g").unwrap());
        assert!(!global.can_declare_global_var(&realm, "g").unwrap());
        assert!(global.can_declare_global_var(&realm, "f").unwrap());
    }

    #[test]
    fn test_this_binding_is_global_this() {
        let realm = Realm::new();
        let this_value = realm.new_object();
        let global = GlobalEnvironmentRecord::new(realm.global_object().clone(), this_value);
        assert!(global.get_this_binding().is_object());
    }
}
