//! Shared test helpers for integration tests

use quicksilver_core::prelude::*;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a tracing subscriber honoring `RUST_LOG`, once per test binary
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A fresh realm with default options
pub fn realm() -> Realm {
    init_tracing();
    Realm::new()
}

/// An ordinary object with the given data properties
#[allow(dead_code)]
pub fn object_with(realm: &Realm, properties: &[(&str, Value)]) -> ObjectRef {
    let obj = realm.new_object();
    for (key, value) in properties {
        set(realm, &obj, *key, value.clone(), true).unwrap();
    }
    obj
}

/// Define a non-enumerable method that always returns `result`
#[allow(dead_code)]
pub fn define_method(realm: &Realm, obj: &ObjectRef, name: &str, result: Value) {
    let f = NativeFunction::create(realm, name, 0, move |_, _, _| Ok(result.clone()));
    obj.define_own_property(
        realm,
        &PropertyKey::from(name),
        PropertyDescriptor::data(Value::Object(f), true, false, true),
    )
    .unwrap();
}
