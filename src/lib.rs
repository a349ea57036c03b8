//! Quicksilver core: the semantic engine of a JavaScript runtime
//!
//! This crate implements the parts of the language that every interpreter
//! step leans on: the value model, type coercion and comparison, the object
//! protocol, lexical scoping, and adaptive storage for integer-keyed
//! properties. Parsing, bytecode and the built-in library live elsewhere
//! and talk to this crate through [`runtime::JsObject`] and the abstract
//! operations in [`runtime::operations`].
//!
//! # Quick Start
//!
//! ```
//! use quicksilver_core::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let realm = Realm::new();
//!     assert!(abstract_equals(&realm, &Value::from(1.0), &Value::from("1"))?);
//!     assert_eq!(&*to_string(&realm, &Value::from(0.1 + 0.2))?, "0.30000000000000004");
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`runtime`] | [`Value`], [`runtime::Realm`], re-exports |
//! | [`runtime::operations`] | ToPrimitive, ToNumber, equality, Get/Set/Call, iterators |
//! | [`runtime::object`] | the [`runtime::JsObject`] capability, ordinary and array objects |
//! | [`runtime::environment`] | environment records, scope chain, module graph |
//! | [`runtime::indexed`] | dense/sparse storage for integer keys |
//! | [`error`](Error) | language exceptions and message keys |
// Clippy configuration for the core.
//
// - should_implement_trait: PropertyKey::from_str mirrors the abstract operation name
// - new_without_default: records are built through explicit constructors
#![allow(clippy::should_implement_trait)]
#![allow(clippy::new_without_default)]
#![allow(clippy::too_many_arguments)]

pub mod prelude;
pub mod runtime;

mod error;

pub use error::{messages, Error, ErrorKind, Result};
pub use runtime::Value;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
