//! Symbol values
//!
//! Symbols are opaque identity tokens. Every symbol carries a per-thread
//! unique id and an optional description; equality and hashing use the id
//! only. Well-known symbols and the `Symbol.for` registry are per-thread
//! singletons, mirroring the single-threaded ownership of the value model.

use rustc_hash::FxHashMap as HashMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A unique symbol identity
#[derive(Clone)]
pub struct Symbol(Rc<SymbolData>);

struct SymbolData {
    id: u64,
    description: Option<Rc<str>>,
}

thread_local! {
    static NEXT_SYMBOL_ID: Cell<u64> = const { Cell::new(1) };
    static WELL_KNOWN: RefCell<HashMap<WellKnownSymbol, Symbol>> = RefCell::new(HashMap::default());
    static REGISTRY: RefCell<SymbolRegistry> = RefCell::new(SymbolRegistry::default());
}

impl Symbol {
    /// Create a fresh symbol, distinct from every other symbol
    pub fn new(description: Option<&str>) -> Self {
        let id = NEXT_SYMBOL_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        Symbol(Rc::new(SymbolData {
            id,
            description: description.map(Rc::from),
        }))
    }

    /// Unique identifier of this symbol
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// The description given at creation time
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// `Symbol.for(key)`: look up or create the registered symbol for `key`
    pub fn for_key(key: &str) -> Symbol {
        REGISTRY.with(|registry| registry.borrow_mut().get_or_create(key))
    }

    /// `Symbol.keyFor(sym)`: the registry key of a registered symbol
    pub fn key_for(symbol: &Symbol) -> Option<Rc<str>> {
        REGISTRY.with(|registry| registry.borrow().key_for(symbol))
    }

    /// SymbolDescriptiveString, e.g. `Symbol(foo)`
    pub fn descriptive_string(&self) -> String {
        format!("Symbol({})", self.description().unwrap_or(""))
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptive_string())
    }
}

/// Registry backing `Symbol.for` and `Symbol.keyFor`
#[derive(Default)]
struct SymbolRegistry {
    by_key: HashMap<Rc<str>, Symbol>,
    by_id: HashMap<u64, Rc<str>>,
}

impl SymbolRegistry {
    fn get_or_create(&mut self, key: &str) -> Symbol {
        if let Some(symbol) = self.by_key.get(key) {
            return symbol.clone();
        }
        let key: Rc<str> = Rc::from(key);
        let symbol = Symbol::new(Some(&*key));
        self.by_id.insert(symbol.id(), key.clone());
        self.by_key.insert(key, symbol.clone());
        symbol
    }

    fn key_for(&self, symbol: &Symbol) -> Option<Rc<str>> {
        self.by_id.get(&symbol.id()).cloned()
    }
}

/// The well-known symbols (`@@iterator`, `@@toPrimitive`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownSymbol {
    AsyncIterator,
    HasInstance,
    IsConcatSpreadable,
    Iterator,
    Match,
    MatchAll,
    Replace,
    Search,
    Species,
    Split,
    ToPrimitive,
    ToStringTag,
    Unscopables,
}

impl WellKnownSymbol {
    /// The description, e.g. `Symbol.iterator`
    pub fn description(self) -> &'static str {
        match self {
            WellKnownSymbol::AsyncIterator => "Symbol.asyncIterator",
            WellKnownSymbol::HasInstance => "Symbol.hasInstance",
            WellKnownSymbol::IsConcatSpreadable => "Symbol.isConcatSpreadable",
            WellKnownSymbol::Iterator => "Symbol.iterator",
            WellKnownSymbol::Match => "Symbol.match",
            WellKnownSymbol::MatchAll => "Symbol.matchAll",
            WellKnownSymbol::Replace => "Symbol.replace",
            WellKnownSymbol::Search => "Symbol.search",
            WellKnownSymbol::Species => "Symbol.species",
            WellKnownSymbol::Split => "Symbol.split",
            WellKnownSymbol::ToPrimitive => "Symbol.toPrimitive",
            WellKnownSymbol::ToStringTag => "Symbol.toStringTag",
            WellKnownSymbol::Unscopables => "Symbol.unscopables",
        }
    }

    /// The per-thread symbol for this well-known name
    pub fn symbol(self) -> Symbol {
        WELL_KNOWN.with(|table| {
            table
                .borrow_mut()
                .entry(self)
                .or_insert_with(|| Symbol::new(Some(self.description())))
                .clone()
        })
    }
}
