//! Lexical environments and environment records
//!
//! A [`LexicalEnvironment`] is an immutable chain node: one
//! [`EnvironmentRecord`] plus a shared pointer to the enclosing node. Closures
//! keep their defining scope alive by holding an [`EnvironmentRef`].
//!
//! Identifier resolution walks the chain outward and produces a
//! [`Reference`], which the interpreter then reads, writes or deletes.

mod declarative;
mod function;
mod global;
mod module;
mod object;

pub use declarative::{Binding, BindingFlags, DeclarativeEnvironmentRecord, Slot};
pub use function::{FunctionEnvironmentRecord, ThisBindingStatus};
pub use global::GlobalEnvironmentRecord;
pub use module::{ModuleEnvironmentRecord, ModuleGraph, ModuleId, ModuleStatus};
pub use object::ObjectEnvironmentRecord;

use crate::error::{messages, Error, Result};
use crate::runtime::object::ObjectRef;
use crate::runtime::operations::set;
use crate::runtime::{Realm, Value};
use std::rc::Rc;
use tracing::trace;

/// Shared pointer to a chain node
pub type EnvironmentRef = Rc<LexicalEnvironment>;

/// The five kinds of environment record
#[derive(Debug)]
pub enum EnvironmentRecord {
    Declarative(DeclarativeEnvironmentRecord),
    Object(ObjectEnvironmentRecord),
    Function(FunctionEnvironmentRecord),
    Global(GlobalEnvironmentRecord),
    Module(ModuleEnvironmentRecord),
}

impl EnvironmentRecord {
    /// The binding table of records that have one
    fn declarative_part(&self) -> Option<&DeclarativeEnvironmentRecord> {
        match self {
            EnvironmentRecord::Declarative(record) => Some(record),
            EnvironmentRecord::Function(record) => Some(record.declarative()),
            EnvironmentRecord::Module(record) => Some(record.declarative()),
            EnvironmentRecord::Object(_) | EnvironmentRecord::Global(_) => None,
        }
    }

    /// HasBinding(N)
    pub fn has_binding(&self, realm: &Realm, name: &str) -> Result<bool> {
        match self {
            EnvironmentRecord::Object(record) => record.has_binding(realm, name),
            EnvironmentRecord::Global(record) => record.has_binding(realm, name),
            _ => Ok(self.declarative_part().is_some_and(|d| d.has_binding(name))),
        }
    }

    /// CreateMutableBinding(N, D)
    pub fn create_mutable_binding(&self, realm: &Realm, name: &str, deletable: bool) -> Result<()> {
        match self {
            EnvironmentRecord::Object(record) => record.create_mutable_binding(realm, name, deletable),
            EnvironmentRecord::Global(record) => record.create_mutable_binding(name, deletable),
            EnvironmentRecord::Declarative(d) => {
                d.create_mutable_binding(name, deletable);
                Ok(())
            }
            EnvironmentRecord::Function(f) => {
                f.declarative().create_mutable_binding(name, deletable);
                Ok(())
            }
            EnvironmentRecord::Module(m) => {
                m.declarative().create_mutable_binding(name, deletable);
                Ok(())
            }
        }
    }

    /// CreateImmutableBinding(N, S)
    pub fn create_immutable_binding(&self, name: &str, strict: bool) -> Result<()> {
        match self {
            EnvironmentRecord::Object(_) => {
                panic!("object environment records cannot hold immutable binding '{name}'")
            }
            EnvironmentRecord::Global(record) => record.create_immutable_binding(name, strict),
            EnvironmentRecord::Declarative(d) => {
                d.create_immutable_binding(name, strict);
                Ok(())
            }
            EnvironmentRecord::Function(f) => {
                f.declarative().create_immutable_binding(name, strict);
                Ok(())
            }
            EnvironmentRecord::Module(m) => {
                m.declarative().create_immutable_binding(name, strict);
                Ok(())
            }
        }
    }

    /// InitializeBinding(N, V)
    pub fn initialize_binding(&self, realm: &Realm, name: &str, value: Value) -> Result<()> {
        match self {
            EnvironmentRecord::Object(record) => record.initialize_binding(realm, name, value),
            EnvironmentRecord::Global(record) => record.initialize_binding(realm, name, value),
            EnvironmentRecord::Declarative(d) => {
                d.initialize_binding(name, value);
                Ok(())
            }
            EnvironmentRecord::Function(f) => {
                f.declarative().initialize_binding(name, value);
                Ok(())
            }
            EnvironmentRecord::Module(m) => {
                m.declarative().initialize_binding(name, value);
                Ok(())
            }
        }
    }

    /// SetMutableBinding(N, V, S)
    pub fn set_mutable_binding(&self, realm: &Realm, name: &str, value: Value, strict: bool) -> Result<()> {
        match self {
            EnvironmentRecord::Object(record) => record.set_mutable_binding(realm, name, value, strict),
            EnvironmentRecord::Global(record) => record.set_mutable_binding(realm, name, value, strict),
            EnvironmentRecord::Declarative(d) => d.set_mutable_binding(name, value, strict),
            EnvironmentRecord::Function(f) => f.declarative().set_mutable_binding(name, value, strict),
            EnvironmentRecord::Module(m) => m.declarative().set_mutable_binding(name, value, strict),
        }
    }

    /// GetBindingValue(N, S)
    pub fn get_binding_value(&self, realm: &Realm, name: &str, strict: bool) -> Result<Value> {
        match self {
            EnvironmentRecord::Object(record) => record.get_binding_value(realm, name, strict),
            EnvironmentRecord::Global(record) => record.get_binding_value(realm, name, strict),
            EnvironmentRecord::Module(record) => record.get_binding_value(realm, name, strict),
            EnvironmentRecord::Declarative(d) => d.get_binding_value(name, strict),
            EnvironmentRecord::Function(f) => f.declarative().get_binding_value(name, strict),
        }
    }

    /// DeleteBinding(N)
    pub fn delete_binding(&self, realm: &Realm, name: &str) -> Result<bool> {
        match self {
            EnvironmentRecord::Object(record) => record.delete_binding(realm, name),
            EnvironmentRecord::Global(record) => record.delete_binding(realm, name),
            EnvironmentRecord::Module(record) => Ok(record.delete_binding(name)),
            EnvironmentRecord::Declarative(d) => Ok(d.delete_binding(name)),
            EnvironmentRecord::Function(f) => Ok(f.declarative().delete_binding(name)),
        }
    }

    /// HasThisBinding()
    pub fn has_this_binding(&self) -> bool {
        match self {
            EnvironmentRecord::Declarative(_) | EnvironmentRecord::Object(_) => false,
            EnvironmentRecord::Function(record) => record.has_this_binding(),
            EnvironmentRecord::Global(_) | EnvironmentRecord::Module(_) => true,
        }
    }

    /// HasSuperBinding()
    pub fn has_super_binding(&self) -> bool {
        match self {
            EnvironmentRecord::Function(record) => record.has_super_binding(),
            _ => false,
        }
    }

    /// WithBaseObject()
    pub fn with_base_object(&self) -> Value {
        match self {
            EnvironmentRecord::Object(record) => record.with_base_object(),
            _ => Value::Undefined,
        }
    }

    /// GetThisBinding(); only valid when [`has_this_binding`](Self::has_this_binding)
    pub fn get_this_binding(&self) -> Result<Value> {
        match self {
            EnvironmentRecord::Function(record) => record.get_this_binding(),
            EnvironmentRecord::Global(record) => Ok(record.get_this_binding()),
            EnvironmentRecord::Module(record) => Ok(record.get_this_binding()),
            EnvironmentRecord::Declarative(_) | EnvironmentRecord::Object(_) => {
                panic!("environment record has no `this` binding")
            }
        }
    }

    pub fn as_function(&self) -> Option<&FunctionEnvironmentRecord> {
        match self {
            EnvironmentRecord::Function(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_global(&self) -> Option<&GlobalEnvironmentRecord> {
        match self {
            EnvironmentRecord::Global(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&ModuleEnvironmentRecord> {
        match self {
            EnvironmentRecord::Module(record) => Some(record),
            _ => None,
        }
    }
}

/// A node of the scope chain
#[derive(Debug)]
pub struct LexicalEnvironment {
    record: EnvironmentRecord,
    outer: Option<EnvironmentRef>,
}

impl LexicalEnvironment {
    pub fn new(record: EnvironmentRecord, outer: Option<EnvironmentRef>) -> Self {
        LexicalEnvironment { record, outer }
    }

    pub fn record(&self) -> &EnvironmentRecord {
        &self.record
    }

    /// The enclosing environment; `None` only for the global environment
    pub fn outer(&self) -> Option<&EnvironmentRef> {
        self.outer.as_ref()
    }
}

/// A resolved (or unresolvable) identifier
#[derive(Debug, Clone)]
pub enum Reference {
    Environment {
        base: EnvironmentRef,
        name: Rc<str>,
        strict: bool,
    },
    Unresolvable {
        name: Rc<str>,
        strict: bool,
    },
}

impl Reference {
    /// The referenced name
    pub fn name(&self) -> &str {
        match self {
            Reference::Environment { name, .. } | Reference::Unresolvable { name, .. } => &**name,
        }
    }

    pub fn is_strict(&self) -> bool {
        match self {
            Reference::Environment { strict, .. } | Reference::Unresolvable { strict, .. } => *strict,
        }
    }

    /// IsUnresolvableReference(V)
    pub fn is_unresolvable(&self) -> bool {
        matches!(self, Reference::Unresolvable { .. })
    }

    /// GetValue(V)
    pub fn get_value(&self, realm: &Realm) -> Result<Value> {
        match self {
            Reference::Unresolvable { name, .. } => {
                Err(Error::reference_error(messages::not_defined(name)))
            }
            Reference::Environment { base, name, strict } => {
                base.record().get_binding_value(realm, name, *strict)
            }
        }
    }

    /// PutValue(V, W)
    pub fn put_value(&self, realm: &Realm, value: Value) -> Result<()> {
        match self {
            Reference::Unresolvable { name, strict: true } => {
                Err(Error::reference_error(messages::not_defined(name)))
            }
            Reference::Unresolvable { name, strict: false } => {
                set(realm, realm.global_object(), &**name, value, false)?;
                Ok(())
            }
            Reference::Environment { base, name, strict } => {
                base.record().set_mutable_binding(realm, name, value, *strict)
            }
        }
    }

    /// The `delete` operator applied to an identifier reference
    pub fn delete(&self, realm: &Realm) -> Result<bool> {
        match self {
            Reference::Unresolvable { .. } => Ok(true),
            Reference::Environment { base, name, .. } => base.record().delete_binding(realm, name),
        }
    }

    /// The `this` value for a call through this reference
    pub fn this_value(&self) -> Value {
        match self {
            Reference::Environment { base, .. } => base.record().with_base_object(),
            Reference::Unresolvable { .. } => Value::Undefined,
        }
    }
}

/// GetIdentifierReference(lex, name, strict)
pub fn get_identifier_reference(
    realm: &Realm,
    env: &EnvironmentRef,
    name: &str,
    strict: bool,
) -> Result<Reference> {
    let mut current = Some(env.clone());
    while let Some(env) = current {
        if env.record().has_binding(realm, name)? {
            return Ok(Reference::Environment {
                base: env,
                name: Rc::from(name),
                strict,
            });
        }
        current = env.outer().cloned();
    }
    Ok(Reference::Unresolvable {
        name: Rc::from(name),
        strict,
    })
}

/// GetThisEnvironment(): the nearest environment with a `this` binding
pub fn get_this_environment(env: &EnvironmentRef) -> EnvironmentRef {
    let mut current = env.clone();
    loop {
        if current.record().has_this_binding() {
            return current;
        }
        let outer = current
            .outer()
            .cloned()
            .unwrap_or_else(|| panic!("scope chain has no environment with a `this` binding"));
        current = outer;
    }
}

/// ResolveThisBinding()
pub fn resolve_this_binding(env: &EnvironmentRef) -> Result<Value> {
    get_this_environment(env).record().get_this_binding()
}

/// GetNewTarget()
pub fn get_new_target(env: &EnvironmentRef) -> Value {
    let this_env = get_this_environment(env);
    match this_env.record().as_function() {
        Some(record) => Value::from(record.new_target().cloned()),
        None => Value::Undefined,
    }
}

/// NewDeclarativeEnvironment(E)
pub fn new_declarative_environment(outer: &EnvironmentRef) -> EnvironmentRef {
    trace!("declarative environment created");
    Rc::new(LexicalEnvironment::new(
        EnvironmentRecord::Declarative(DeclarativeEnvironmentRecord::new()),
        Some(outer.clone()),
    ))
}

/// A declarative environment holding the catch parameter `name`, initialized to `thrown`
pub fn new_catch_environment(outer: &EnvironmentRef, name: &str, thrown: Value) -> EnvironmentRef {
    let env = new_declarative_environment(outer);
    if let EnvironmentRecord::Declarative(record) = env.record() {
        record.create_mutable_binding(name, false);
        record.initialize_binding(name, thrown);
    }
    env
}

/// NewObjectEnvironment(O, E); `with_environment` marks a `with` statement scope
pub fn new_object_environment(
    binding_object: ObjectRef,
    with_environment: bool,
    outer: &EnvironmentRef,
) -> EnvironmentRef {
    trace!(with_environment, "object environment created");
    Rc::new(LexicalEnvironment::new(
        EnvironmentRecord::Object(ObjectEnvironmentRecord::new(binding_object, with_environment)),
        Some(outer.clone()),
    ))
}

/// NewFunctionEnvironment(F, newTarget)
pub fn new_function_environment(
    function_object: ObjectRef,
    new_target: Option<ObjectRef>,
    lexical_this: bool,
    home_object: Option<ObjectRef>,
    outer: &EnvironmentRef,
) -> EnvironmentRef {
    trace!(lexical_this, "function environment created");
    let record = FunctionEnvironmentRecord::new(function_object, new_target, lexical_this, home_object);
    Rc::new(LexicalEnvironment::new(
        EnvironmentRecord::Function(record),
        Some(outer.clone()),
    ))
}

/// NewGlobalEnvironment(G, thisValue)
pub fn new_global_environment(global: ObjectRef, this_value: ObjectRef) -> EnvironmentRef {
    trace!("global environment created");
    Rc::new(LexicalEnvironment::new(
        EnvironmentRecord::Global(GlobalEnvironmentRecord::new(global, this_value)),
        None,
    ))
}

/// Copy a declarative environment for a closure capture; the copy shares
/// the outer chain but its bindings mutate independently
pub fn clone_declarative_environment(env: &EnvironmentRef) -> EnvironmentRef {
    let EnvironmentRecord::Declarative(record) = env.record() else {
        panic!("only declarative environments can be cloned");
    };
    Rc::new(LexicalEnvironment::new(
        EnvironmentRecord::Declarative(record.clone_record()),
        env.outer().cloned(),
    ))
}
