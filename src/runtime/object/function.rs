//! Native function objects
//!
//! A [`NativeFunction`] wraps a Rust closure behind `[[Call]]` and, for
//! constructors, a second closure behind `[[Construct]]`.

use super::ordinary::{ordinary_get, ordinary_has_property, ordinary_set, OrdinaryObject};
use super::property::{Property, PropertyDescriptor, PropertyKey};
use super::{JsObject, ObjectRef};
use crate::error::{messages, Error, Result};
use crate::runtime::realm::Intrinsic;
use crate::runtime::{Realm, Value};
use std::any::Any;
use std::rc::Rc;

/// Native `[[Call]]` behavior: `(realm, this, arguments)`
pub type NativeFn = Rc<dyn Fn(&Realm, &Value, &[Value]) -> Result<Value>>;

/// Native `[[Construct]]` behavior: `(realm, arguments, newTarget)`
pub type NativeConstructFn = Rc<dyn Fn(&Realm, &[Value], &ObjectRef) -> Result<ObjectRef>>;

/// A built-in function implemented in Rust
pub struct NativeFunction {
    object: OrdinaryObject,
    name: Rc<str>,
    call: NativeFn,
    construct: Option<NativeConstructFn>,
}

impl NativeFunction {
    /// Create a callable, non-constructible function
    pub fn create<F>(realm: &Realm, name: &str, length: u32, call: F) -> ObjectRef
    where
        F: Fn(&Realm, &Value, &[Value]) -> Result<Value> + 'static,
    {
        Self::build(realm, name, length, Rc::new(call), None)
    }

    /// Create a function that is both callable and constructible
    pub fn create_constructor<F, C>(
        realm: &Realm,
        name: &str,
        length: u32,
        call: F,
        construct: C,
    ) -> ObjectRef
    where
        F: Fn(&Realm, &Value, &[Value]) -> Result<Value> + 'static,
        C: Fn(&Realm, &[Value], &ObjectRef) -> Result<ObjectRef> + 'static,
    {
        Self::build(realm, name, length, Rc::new(call), Some(Rc::new(construct)))
    }

    fn build(
        realm: &Realm,
        name: &str,
        length: u32,
        call: NativeFn,
        construct: Option<NativeConstructFn>,
    ) -> ObjectRef {
        let object = OrdinaryObject::new(Some(realm.intrinsic(Intrinsic::FunctionPrototype)))
            .with_class_name("Function");
        object.put_property(
            &PropertyKey::from("length"),
            Property::data(Value::from(length), false, false, true),
        );
        object.put_property(
            &PropertyKey::from("name"),
            Property::data(Value::from(name), false, false, true),
        );
        Rc::new(NativeFunction {
            object,
            name: Rc::from(name),
            call,
            construct,
        })
    }

    /// The function's name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl JsObject for NativeFunction {
    forward_to_ordinary!(object);

    fn define_own_property(
        &self,
        _realm: &Realm,
        key: &PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool> {
        Ok(self.object.define_own_property_ordinary(key, desc))
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn is_constructor(&self) -> bool {
        self.construct.is_some()
    }

    fn call(&self, realm: &Realm, this: &Value, args: &[Value]) -> Result<Value> {
        (self.call)(realm, this, args)
    }

    fn construct(&self, realm: &Realm, args: &[Value], new_target: &ObjectRef) -> Result<ObjectRef> {
        match &self.construct {
            Some(construct) => construct(realm, args, new_target),
            None => Err(Error::type_error(messages::not_a_constructor(&self.name))),
        }
    }

    fn class_name(&self) -> &'static str {
        "Function"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
