//! Function environment records

use super::declarative::DeclarativeEnvironmentRecord;
use crate::error::{messages, Error, Result};
use crate::runtime::object::ObjectRef;
use crate::runtime::{Realm, Value};
use std::cell::{Cell, RefCell};

/// State of a function record's `this` binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisBindingStatus {
    /// Arrow functions: `this` comes from the enclosing scope
    Lexical,
    /// Derived constructors before `super()` returns
    Uninitialized,
    Initialized,
}

/// Environment record for a function invocation
#[derive(Debug)]
pub struct FunctionEnvironmentRecord {
    declarative: DeclarativeEnvironmentRecord,
    this_value: RefCell<Value>,
    this_status: Cell<ThisBindingStatus>,
    function_object: ObjectRef,
    new_target: Option<ObjectRef>,
    home_object: Option<ObjectRef>,
}

impl FunctionEnvironmentRecord {
    pub fn new(
        function_object: ObjectRef,
        new_target: Option<ObjectRef>,
        lexical_this: bool,
        home_object: Option<ObjectRef>,
    ) -> Self {
        let status = if lexical_this {
            ThisBindingStatus::Lexical
        } else {
            ThisBindingStatus::Uninitialized
        };
        FunctionEnvironmentRecord {
            declarative: DeclarativeEnvironmentRecord::new(),
            this_value: RefCell::new(Value::Undefined),
            this_status: Cell::new(status),
            function_object,
            new_target,
            home_object,
        }
    }

    /// The function's own bindings
    pub fn declarative(&self) -> &DeclarativeEnvironmentRecord {
        &self.declarative
    }

    pub fn function_object(&self) -> &ObjectRef {
        &self.function_object
    }

    /// `new.target`, `None` for a plain call
    pub fn new_target(&self) -> Option<&ObjectRef> {
        self.new_target.as_ref()
    }

    pub fn home_object(&self) -> Option<&ObjectRef> {
        self.home_object.as_ref()
    }

    pub fn this_binding_status(&self) -> ThisBindingStatus {
        self.this_status.get()
    }

    /// HasThisBinding()
    pub fn has_this_binding(&self) -> bool {
        self.this_status.get() != ThisBindingStatus::Lexical
    }

    /// HasSuperBinding()
    pub fn has_super_binding(&self) -> bool {
        self.has_this_binding() && self.home_object.is_some()
    }

    /// BindThisValue(V); binding twice is an engine bug
    pub fn bind_this_value(&self, value: Value) {
        match self.this_status.get() {
            ThisBindingStatus::Lexical => panic!("cannot bind `this` in an arrow function environment"),
            ThisBindingStatus::Initialized => panic!("`this` is already bound"),
            ThisBindingStatus::Uninitialized => {
                *self.this_value.borrow_mut() = value;
                self.this_status.set(ThisBindingStatus::Initialized);
            }
        }
    }

    /// GetThisBinding()
    pub fn get_this_binding(&self) -> Result<Value> {
        match self.this_status.get() {
            ThisBindingStatus::Lexical => panic!("arrow function environments have no `this` binding"),
            ThisBindingStatus::Uninitialized => {
                Err(Error::reference_error(messages::THIS_NOT_INITIALIZED))
            }
            ThisBindingStatus::Initialized => Ok(self.this_value.borrow().clone()),
        }
    }

    /// GetSuperBase(): the prototype of the home object
    pub fn get_super_base(&self, realm: &Realm) -> Result<Value> {
        match &self.home_object {
            None => Ok(Value::Undefined),
            Some(home) => Ok(Value::from(home.get_prototype_of(realm)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::object::NativeFunction;

    fn function(realm: &Realm) -> ObjectRef {
        NativeFunction::create(realm, "f", 0, |_, _, _| Ok(Value::Undefined))
    }

    #[test]
    fn test_this_binding_state_machine() {
        let realm = Realm::new();
        let record = FunctionEnvironmentRecord::new(function(&realm), None, false, None);
        assert!(record.has_this_binding());
        let err = record.get_this_binding().unwrap_err();
        assert!(err.is_kind(ErrorKind::ReferenceError));
        record.bind_this_value(Value::from(5.0));
        assert_eq!(record.get_this_binding().unwrap(), Value::from(5.0));
        assert_eq!(record.this_binding_status(), ThisBindingStatus::Initialized);
    }

    #[test]
    #[should_panic(expected = "already bound")]
    fn test_binding_this_twice_panics() {
        let realm = Realm::new();
        let record = FunctionEnvironmentRecord::new(function(&realm), None, false, None);
        record.bind_this_value(Value::Null);
        record.bind_this_value(Value::Null);
    }

    #[test]
    fn test_lexical_this_and_super() {
        let realm = Realm::new();
        let arrow = FunctionEnvironmentRecord::new(function(&realm), None, true, None);
        assert!(!arrow.has_this_binding());
        assert!(!arrow.has_super_binding());

        let home = realm.new_object();
        let method = FunctionEnvironmentRecord::new(function(&realm), None, false, Some(home));
        assert!(method.has_super_binding());
        let base = method.get_super_base(&realm).unwrap();
        assert!(base.is_object());
    }

    #[test]
    fn test_new_target() {
        let realm = Realm::new();
        let f = function(&realm);
        let record = FunctionEnvironmentRecord::new(f.clone(), Some(f.clone()), false, None);
        assert!(record.new_target().is_some());
        let call = FunctionEnvironmentRecord::new(f, None, false, None);
        assert!(call.new_target().is_none());
    }
}
