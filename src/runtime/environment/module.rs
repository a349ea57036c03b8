//! Module environment records and the module graph arena
//!
//! Module environments are owned by a [`ModuleGraph`] and addressed by
//! [`ModuleId`]. Import bindings store the exporting module's id and the
//! exported name, and are resolved through the graph on every read, so
//! they observe later assignments and may point at modules whose
//! environment does not exist yet.

use super::declarative::{Binding, BindingFlags, DeclarativeEnvironmentRecord, Slot};
use super::{EnvironmentRecord, EnvironmentRef, LexicalEnvironment};
use crate::error::{messages, Error, Result};
use crate::runtime::{Realm, Value};
use rustc_hash::FxHashMap as HashMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Index of a module in a [`ModuleGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u32);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

/// Linking and evaluation state of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Uninstantiated,
    Instantiating,
    Instantiated,
    Evaluating,
    Evaluated,
}

struct ModuleSlot {
    specifier: Rc<str>,
    status: Cell<ModuleStatus>,
    environment: RefCell<Option<EnvironmentRef>>,
}

/// Arena of modules and their environments
#[derive(Default)]
pub struct ModuleGraph {
    modules: RefCell<Vec<ModuleSlot>>,
    by_specifier: RefCell<HashMap<Rc<str>, ModuleId>>,
}

impl ModuleGraph {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Register a module, returning the existing id for a known specifier
    pub fn add_module(&self, specifier: &str) -> ModuleId {
        if let Some(id) = self.lookup(specifier) {
            return id;
        }
        let mut modules = self.modules.borrow_mut();
        let id = ModuleId(modules.len() as u32);
        let specifier: Rc<str> = Rc::from(specifier);
        modules.push(ModuleSlot {
            specifier: specifier.clone(),
            status: Cell::new(ModuleStatus::Uninstantiated),
            environment: RefCell::new(None),
        });
        self.by_specifier.borrow_mut().insert(specifier, id);
        id
    }

    /// Find a module by specifier
    pub fn lookup(&self, specifier: &str) -> Option<ModuleId> {
        self.by_specifier.borrow().get(specifier).copied()
    }

    pub fn specifier(&self, id: ModuleId) -> Rc<str> {
        self.with_slot(id, |slot| slot.specifier.clone())
    }

    pub fn status(&self, id: ModuleId) -> ModuleStatus {
        self.with_slot(id, |slot| slot.status.get())
    }

    pub fn set_status(&self, id: ModuleId, status: ModuleStatus) {
        self.with_slot(id, |slot| slot.status.set(status));
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The module's environment, once instantiated
    pub fn environment(&self, id: ModuleId) -> Option<EnvironmentRef> {
        self.with_slot(id, |slot| slot.environment.borrow().clone())
    }

    /// NewModuleEnvironment for `id` under `outer`; repeated calls return
    /// the environment created first
    pub fn instantiate(self: &Rc<Self>, id: ModuleId, outer: EnvironmentRef) -> EnvironmentRef {
        if let Some(existing) = self.environment(id) {
            return existing;
        }
        let record = ModuleEnvironmentRecord::new(Rc::downgrade(self));
        let env = Rc::new(LexicalEnvironment::new(EnvironmentRecord::Module(record), Some(outer)));
        self.with_slot(id, |slot| *slot.environment.borrow_mut() = Some(env.clone()));
        debug!(module = %id, specifier = %self.specifier(id), "module environment created");
        env
    }

    fn with_slot<R>(&self, id: ModuleId, f: impl FnOnce(&ModuleSlot) -> R) -> R {
        let modules = self.modules.borrow();
        let slot = modules
            .get(id.index())
            .unwrap_or_else(|| panic!("{id} is not part of this module graph"));
        f(slot)
    }
}

impl fmt::Debug for ModuleGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modules = self.modules.borrow();
        f.debug_list()
            .entries(modules.iter().map(|slot| (&slot.specifier, slot.status.get())))
            .finish()
    }
}

/// Environment record for a module's top-level scope
#[derive(Debug)]
pub struct ModuleEnvironmentRecord {
    declarative: DeclarativeEnvironmentRecord,
    graph: Weak<ModuleGraph>,
}

impl ModuleEnvironmentRecord {
    pub fn new(graph: Weak<ModuleGraph>) -> Self {
        ModuleEnvironmentRecord {
            declarative: DeclarativeEnvironmentRecord::new(),
            graph,
        }
    }

    /// The module's own bindings
    pub fn declarative(&self) -> &DeclarativeEnvironmentRecord {
        &self.declarative
    }

    /// CreateImportBinding(N, M, N2)
    pub fn create_import_binding(&self, name: &str, module: ModuleId, binding_name: &str) {
        debug!(name, %module, binding_name, "import binding created");
        self.declarative.insert_binding(
            name,
            BindingFlags::STRICT,
            Slot::Indirect {
                module,
                name: Rc::from(binding_name),
            },
        );
    }

    /// GetBindingValue(N, S), following import bindings
    pub fn get_binding_value(&self, realm: &Realm, name: &str, strict: bool) -> Result<Value> {
        let Some(Binding {
            slot: Slot::Indirect { module, name: target },
            ..
        }) = self.declarative.binding(name)
        else {
            return self.declarative.get_binding_value(name, strict);
        };
        let env = self
            .graph
            .upgrade()
            .and_then(|graph| graph.environment(module))
            .ok_or_else(|| Error::reference_error(messages::not_defined(name)))?;
        env.record().get_binding_value(realm, &target, true)
    }

    /// DeleteBinding(N) is never reached for module records
    pub fn delete_binding(&self, name: &str) -> bool {
        panic!("module environment binding '{name}' cannot be deleted")
    }

    /// GetThisBinding(): always undefined
    pub fn get_this_binding(&self) -> Value {
        Value::Undefined
    }
}
