//! Prelude module for convenient imports
//!
//! ```
//! use quicksilver_core::prelude::*;
//!
//! let realm = Realm::new();
//! let n = to_number(&realm, &Value::from(" 0x1F ")).unwrap();
//! assert_eq!(n, 31.0);
//! ```

// Values and realms
pub use crate::runtime::{Realm, RealmOptions, Symbol, Type, Value, WellKnownSymbol};

// Objects
pub use crate::runtime::object::{
    ArrayObject, JsObject, NativeFunction, ObjectRef, OrdinaryObject, PropertyDescriptor,
    PropertyKey,
};

// Error handling
pub use crate::error::{Error, ErrorKind, Result};

// Abstract operations
pub use crate::runtime::operations::{
    abstract_equals, call, construct, get, get_method, has_property, relational_comparison,
    same_value, same_value_zero, set, strict_equals, to_boolean, to_int32, to_integer, to_number,
    to_object, to_primitive, to_property_key, to_string, to_uint32, PreferredType,
};

// Scopes
pub use crate::runtime::environment::{
    get_identifier_reference, new_declarative_environment, new_global_environment,
    EnvironmentRef, Reference,
};
