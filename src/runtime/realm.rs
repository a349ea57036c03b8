//! Realms and realm configuration
//!
//! A [`Realm`] owns the intrinsic prototypes the core needs to allocate
//! objects (wrapper objects for ToObject, arrays, iterator results) and the
//! global object. Every abstract operation receives the realm it runs in.

use super::object::{ObjectRef, OrdinaryObject};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// Realm configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmOptions {
    /// Enable the Annex B rule that `[[IsHTMLDDA]]` objects loosely equal null and undefined
    pub htmldda_objects: bool,
    /// Upper bound on the list length produced by CreateListFromArrayLike
    pub max_arguments: usize,
}

impl Default for RealmOptions {
    fn default() -> Self {
        Self {
            htmldda_objects: false,
            max_arguments: 65_535,
        }
    }
}

impl RealmOptions {
    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Intrinsic objects reachable from a realm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    ObjectPrototype,
    FunctionPrototype,
    ArrayPrototype,
    IteratorPrototype,
    BooleanPrototype,
    NumberPrototype,
    StringPrototype,
    SymbolPrototype,
    BigIntPrototype,
    SimdPrototype,
}

struct Intrinsics {
    object_prototype: ObjectRef,
    function_prototype: ObjectRef,
    array_prototype: ObjectRef,
    iterator_prototype: ObjectRef,
    boolean_prototype: ObjectRef,
    number_prototype: ObjectRef,
    string_prototype: ObjectRef,
    symbol_prototype: ObjectRef,
    bigint_prototype: ObjectRef,
    simd_prototype: ObjectRef,
}

impl Intrinsics {
    fn new() -> Self {
        let object_prototype = OrdinaryObject::create(None);
        let derived = |class_name: &'static str| -> ObjectRef {
            Rc::new(OrdinaryObject::new(Some(object_prototype.clone())).with_class_name(class_name))
        };
        let function_prototype = derived("Function");
        let array_prototype = derived("Array");
        let iterator_prototype = derived("Iterator");
        let boolean_prototype = derived("Boolean");
        let number_prototype = derived("Number");
        let string_prototype = derived("String");
        let symbol_prototype = derived("Symbol");
        let bigint_prototype = derived("BigInt");
        let simd_prototype = derived("SIMD");
        Intrinsics {
            object_prototype,
            function_prototype,
            array_prototype,
            iterator_prototype,
            boolean_prototype,
            number_prototype,
            string_prototype,
            symbol_prototype,
            bigint_prototype,
            simd_prototype,
        }
    }
}

/// An ECMAScript realm
pub struct Realm {
    options: RealmOptions,
    intrinsics: Intrinsics,
    global_object: ObjectRef,
}

impl Realm {
    /// Create a realm with default options
    pub fn new() -> Self {
        Self::with_options(RealmOptions::default())
    }

    /// Create a realm with custom options
    pub fn with_options(options: RealmOptions) -> Self {
        let intrinsics = Intrinsics::new();
        let global_object = OrdinaryObject::create(Some(intrinsics.object_prototype.clone()));
        debug!(?options, "realm created");
        Realm {
            options,
            intrinsics,
            global_object,
        }
    }

    /// Realm options
    pub fn options(&self) -> &RealmOptions {
        &self.options
    }

    /// Look up an intrinsic object
    pub fn intrinsic(&self, intrinsic: Intrinsic) -> ObjectRef {
        let i = &self.intrinsics;
        match intrinsic {
            Intrinsic::ObjectPrototype => i.object_prototype.clone(),
            Intrinsic::FunctionPrototype => i.function_prototype.clone(),
            Intrinsic::ArrayPrototype => i.array_prototype.clone(),
            Intrinsic::IteratorPrototype => i.iterator_prototype.clone(),
            Intrinsic::BooleanPrototype => i.boolean_prototype.clone(),
            Intrinsic::NumberPrototype => i.number_prototype.clone(),
            Intrinsic::StringPrototype => i.string_prototype.clone(),
            Intrinsic::SymbolPrototype => i.symbol_prototype.clone(),
            Intrinsic::BigIntPrototype => i.bigint_prototype.clone(),
            Intrinsic::SimdPrototype => i.simd_prototype.clone(),
        }
    }

    /// The global object
    pub fn global_object(&self) -> &ObjectRef {
        &self.global_object
    }

    /// ObjectCreate(%ObjectPrototype%)
    pub fn new_object(&self) -> ObjectRef {
        OrdinaryObject::create(Some(self.intrinsics.object_prototype.clone()))
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}
