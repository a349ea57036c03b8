//! Declarative environment records and the binding table they share
//!
//! Function, global and module records embed a
//! [`DeclarativeEnvironmentRecord`] for their own bindings.

use super::module::ModuleId;
use crate::error::{messages, Error, Result};
use crate::runtime::Value;
use bitflags::bitflags;
use rustc_hash::FxHashMap as HashMap;
use std::cell::RefCell;
use std::rc::Rc;

bitflags! {
    /// Binding attributes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BindingFlags: u8 {
        /// Assignments are allowed after initialization
        const MUTABLE = 1;
        /// `delete` may remove the binding
        const DELETABLE = 1 << 1;
        /// Assignments to an immutable binding throw even in sloppy code
        const STRICT = 1 << 2;
    }
}

/// Storage of a binding
#[derive(Debug, Clone)]
pub enum Slot {
    /// Created but not yet initialized (temporal dead zone)
    Uninitialized,
    /// Holds a value
    Initialized(Value),
    /// Re-resolved on every read through another module's environment
    Indirect { module: ModuleId, name: Rc<str> },
}

/// A named binding
#[derive(Debug, Clone)]
pub struct Binding {
    pub flags: BindingFlags,
    pub slot: Slot,
}

impl Binding {
    /// Check whether the binding may be assigned
    pub fn is_mutable(&self) -> bool {
        self.flags.contains(BindingFlags::MUTABLE)
    }

    /// Check whether the binding has left its temporal dead zone
    pub fn is_initialized(&self) -> bool {
        !matches!(self.slot, Slot::Uninitialized)
    }
}

/// Environment record holding bindings in a table
#[derive(Debug, Default)]
pub struct DeclarativeEnvironmentRecord {
    bindings: RefCell<HashMap<Rc<str>, Binding>>,
}

impl DeclarativeEnvironmentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh record with a copy of this record's bindings
    pub fn clone_record(&self) -> Self {
        DeclarativeEnvironmentRecord {
            bindings: RefCell::new(self.bindings.borrow().clone()),
        }
    }

    /// HasBinding(N)
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// CreateMutableBinding(N, D)
    pub fn create_mutable_binding(&self, name: &str, deletable: bool) {
        let mut flags = BindingFlags::MUTABLE;
        flags.set(BindingFlags::DELETABLE, deletable);
        self.insert_binding(name, flags, Slot::Uninitialized);
    }

    /// CreateImmutableBinding(N, S)
    pub fn create_immutable_binding(&self, name: &str, strict: bool) {
        let mut flags = BindingFlags::empty();
        flags.set(BindingFlags::STRICT, strict);
        self.insert_binding(name, flags, Slot::Uninitialized);
    }

    pub(crate) fn insert_binding(&self, name: &str, flags: BindingFlags, slot: Slot) {
        let mut bindings = self.bindings.borrow_mut();
        assert!(
            !bindings.contains_key(name),
            "binding '{name}' already exists in this environment"
        );
        bindings.insert(Rc::from(name), Binding { flags, slot });
    }

    /// InitializeBinding(N, V)
    pub fn initialize_binding(&self, name: &str, value: Value) {
        let mut bindings = self.bindings.borrow_mut();
        let binding = bindings
            .get_mut(name)
            .unwrap_or_else(|| panic!("binding '{name}' does not exist"));
        assert!(
            matches!(binding.slot, Slot::Uninitialized),
            "binding '{name}' is already initialized"
        );
        binding.slot = Slot::Initialized(value);
    }

    /// SetMutableBinding(N, V, S)
    pub fn set_mutable_binding(&self, name: &str, value: Value, strict: bool) -> Result<()> {
        {
            let mut bindings = self.bindings.borrow_mut();
            if let Some(binding) = bindings.get_mut(name) {
                let strict = strict || binding.flags.contains(BindingFlags::STRICT);
                if matches!(binding.slot, Slot::Uninitialized) {
                    return Err(Error::reference_error(messages::uninitialized_binding(name)));
                }
                if binding.is_mutable() {
                    binding.slot = Slot::Initialized(value);
                } else if strict {
                    return Err(Error::type_error(messages::ASSIGNMENT_TO_CONSTANT));
                }
                return Ok(());
            }
        }
        if strict {
            return Err(Error::reference_error(messages::not_defined(name)));
        }
        self.create_mutable_binding(name, true);
        self.initialize_binding(name, value);
        Ok(())
    }

    /// GetBindingValue(N, S)
    pub fn get_binding_value(&self, name: &str, _strict: bool) -> Result<Value> {
        let bindings = self.bindings.borrow();
        let binding = bindings
            .get(name)
            .unwrap_or_else(|| panic!("binding '{name}' does not exist"));
        match &binding.slot {
            Slot::Initialized(value) => Ok(value.clone()),
            Slot::Uninitialized => Err(Error::reference_error(messages::uninitialized_binding(name))),
            Slot::Indirect { .. } => {
                unreachable!("indirect binding '{name}' outside a module environment")
            }
        }
    }

    /// DeleteBinding(N)
    pub fn delete_binding(&self, name: &str) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.get(name) {
            Some(binding) if !binding.flags.contains(BindingFlags::DELETABLE) => false,
            Some(_) => {
                bindings.remove(name);
                true
            }
            None => true,
        }
    }

    /// A snapshot of one binding
    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.bindings.borrow().get(name).cloned()
    }

    /// Names of all bindings, in no particular order
    pub fn binding_names(&self) -> Vec<Rc<str>> {
        self.bindings.borrow().keys().cloned().collect()
    }
}
