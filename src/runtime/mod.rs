//! Runtime semantic core
//!
//! This module provides the value model, the object capability and its
//! ordinary implementations, the abstract operations, the environment chain
//! and the indexed property store that array-like objects are built on.

pub mod environment;
pub mod indexed;
pub mod object;
pub mod operations;
mod realm;
mod simd;
mod symbol;
mod value;

pub use environment::{
    get_identifier_reference, EnvironmentRecord, EnvironmentRef, LexicalEnvironment, ModuleGraph,
    ModuleId, ModuleStatus, Reference,
};
pub use indexed::{IndexedMap, Representation};
pub use object::{JsObject, ObjectRef, PropertyDescriptor, PropertyKey};
pub use realm::{Intrinsic, Realm, RealmOptions};
pub use simd::{SimdType, SimdValue};
pub use symbol::{Symbol, WellKnownSymbol};
pub use value::{same_value_number, Type, Value};
