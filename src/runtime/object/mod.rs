//! The object capability and its reference implementations
//!
//! Abstract operations only ever talk to objects through [`JsObject`], the
//! fixed set of essential internal methods. Exotic objects (proxies, typed
//! arrays, host objects) implement the trait themselves; this module ships
//! ordinary objects, Array exotic objects and native functions.

/// Implements every essential internal method except `[[DefineOwnProperty]]`
/// by delegating to an embedded [`OrdinaryObject`] field.
macro_rules! forward_to_ordinary {
    ($field:ident) => {
        fn get_prototype_of(&self, _realm: &Realm) -> Result<Option<ObjectRef>> {
            Ok(self.$field.prototype())
        }

        fn set_prototype_of(&self, realm: &Realm, proto: Option<ObjectRef>) -> Result<bool> {
            self.$field
                .set_prototype_with_identity(realm, proto, self as *const Self as *const ())
        }

        fn is_extensible(&self, _realm: &Realm) -> Result<bool> {
            Ok(self.$field.extensible())
        }

        fn prevent_extensions(&self, _realm: &Realm) -> Result<bool> {
            Ok(self.$field.prevent_extensions_ordinary())
        }

        fn get_own_property(&self, _realm: &Realm, key: &PropertyKey) -> Result<Option<Property>> {
            Ok(self.$field.own_property(key))
        }

        fn has_property(&self, realm: &Realm, key: &PropertyKey) -> Result<bool> {
            ordinary_has_property(realm, self, key)
        }

        fn get(&self, realm: &Realm, key: &PropertyKey, receiver: &Value) -> Result<Value> {
            ordinary_get(realm, self, key, receiver)
        }

        fn set(
            &self,
            realm: &Realm,
            key: &PropertyKey,
            value: Value,
            receiver: &Value,
        ) -> Result<bool> {
            ordinary_set(realm, self, key, value, receiver)
        }

        fn delete(&self, _realm: &Realm, key: &PropertyKey) -> Result<bool> {
            Ok(self.$field.delete_ordinary(key))
        }

        fn own_property_keys(&self, _realm: &Realm) -> Result<Vec<PropertyKey>> {
            Ok(self.$field.own_keys_ordinary())
        }
    };
}

mod array;
mod function;
mod ordinary;
mod property;

pub use array::ArrayObject;
pub use function::{NativeConstructFn, NativeFn, NativeFunction};
pub use ordinary::{
    ordinary_define_own_property, ordinary_get, ordinary_has_property, ordinary_set,
    ordinary_set_with_own_descriptor, validate_and_apply_property_descriptor, OrdinaryObject,
};
pub use property::{Property, PropertyDescriptor, PropertyKey, PropertySlot, MAX_ARRAY_LENGTH};

use crate::error::{messages, Error, Result};
use crate::runtime::{Realm, Value};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Shared reference to an object
pub type ObjectRef = Rc<dyn JsObject>;

/// Object identity comparison
#[inline]
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Essential internal methods of an object.
///
/// Methods take the realm so implementations may call back into abstract
/// operations. Implementations must not hold a `RefCell` borrow of their own
/// state across a call into user code (accessors, `valueOf`, traps).
pub trait JsObject {
    /// `[[GetPrototypeOf]]`
    fn get_prototype_of(&self, realm: &Realm) -> Result<Option<ObjectRef>>;

    /// `[[SetPrototypeOf]]`
    fn set_prototype_of(&self, realm: &Realm, proto: Option<ObjectRef>) -> Result<bool>;

    /// `[[IsExtensible]]`
    fn is_extensible(&self, realm: &Realm) -> Result<bool>;

    /// `[[PreventExtensions]]`
    fn prevent_extensions(&self, realm: &Realm) -> Result<bool>;

    /// `[[GetOwnProperty]]`
    fn get_own_property(&self, realm: &Realm, key: &PropertyKey) -> Result<Option<Property>>;

    /// `[[DefineOwnProperty]]`
    fn define_own_property(
        &self,
        realm: &Realm,
        key: &PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool>;

    /// `[[HasProperty]]`
    fn has_property(&self, realm: &Realm, key: &PropertyKey) -> Result<bool>;

    /// `[[Get]]`
    fn get(&self, realm: &Realm, key: &PropertyKey, receiver: &Value) -> Result<Value>;

    /// `[[Set]]`
    fn set(&self, realm: &Realm, key: &PropertyKey, value: Value, receiver: &Value)
        -> Result<bool>;

    /// `[[Delete]]`
    fn delete(&self, realm: &Realm, key: &PropertyKey) -> Result<bool>;

    /// `[[OwnPropertyKeys]]`
    fn own_property_keys(&self, realm: &Realm) -> Result<Vec<PropertyKey>>;

    /// Whether the object has a `[[Call]]` internal method
    fn is_callable(&self) -> bool {
        false
    }

    /// Whether the object has a `[[Construct]]` internal method
    fn is_constructor(&self) -> bool {
        false
    }

    /// `[[Call]]`
    fn call(&self, _realm: &Realm, _this: &Value, _args: &[Value]) -> Result<Value> {
        Err(Error::type_error(messages::not_a_function(self.class_name())))
    }

    /// `[[Construct]]`
    fn construct(&self, _realm: &Realm, _args: &[Value], _new_target: &ObjectRef) -> Result<ObjectRef> {
        Err(Error::type_error(messages::not_a_constructor(self.class_name())))
    }

    /// Objects with `[[IsHTMLDDA]]` are falsy and loosely equal to null
    fn is_htmldda(&self) -> bool {
        false
    }

    /// IsArray for this object; proxies unwrap to their target
    fn is_array(&self, _realm: &Realm) -> Result<bool> {
        Ok(false)
    }

    /// Class name used in diagnostics
    fn class_name(&self) -> &'static str {
        "Object"
    }

    /// The wrapped primitive of a Boolean/Number/String/Symbol/BigInt wrapper object
    fn primitive_value(&self) -> Option<Value> {
        None
    }

    /// Downcasting support
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {}]", self.class_name())
    }
}
