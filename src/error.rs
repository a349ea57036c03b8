//! Error types for the Quicksilver semantic core
//!
//! Language-level exceptions raised by the core (TypeError, RangeError,
//! ReferenceError, ...) are [`Error::RuntimeError`]. Values thrown by user
//! code travel as [`Error::Thrown`] and are never rewrapped. Both carry a list
//! of suppressed errors, which is where iterator cleanup failures end up when
//! the caller is already unwinding.

use crate::runtime::Value;
use std::fmt;
use thiserror::Error;

/// Main error type for the semantic core
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// Runtime error raised by an abstract operation - TypeError, ReferenceError, etc.
    #[error("{kind}: {message}{}", format_suppressed(suppressed))]
    RuntimeError {
        kind: ErrorKind,
        message: String,
        suppressed: Vec<Error>,
    },

    /// Arbitrary value thrown by user code
    #[error("Uncaught {value:?}{}", format_suppressed(suppressed))]
    Thrown { value: Value, suppressed: Vec<Error> },

    /// Malformed realm configuration
    #[error("ConfigError: {source}")]
    ConfigError {
        #[from]
        source: serde_json::Error,
    },
}

fn format_suppressed(suppressed: &[Error]) -> String {
    suppressed
        .iter()
        .map(|e| format!("\n    suppressed: {}", e))
        .collect()
}

/// JavaScript error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::enum_variant_names)]
pub enum ErrorKind {
    /// TypeError - wrong type for operation
    TypeError,
    /// ReferenceError - unresolvable or uninitialized binding
    ReferenceError,
    /// RangeError - value out of range
    RangeError,
    /// SyntaxError - invalid syntax at runtime (e.g., eval)
    SyntaxError,
    /// EvalError - error in eval()
    EvalError,
    /// URIError - malformed URI
    UriError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::TypeError => write!(f, "TypeError"),
            ErrorKind::ReferenceError => write!(f, "ReferenceError"),
            ErrorKind::RangeError => write!(f, "RangeError"),
            ErrorKind::SyntaxError => write!(f, "SyntaxError"),
            ErrorKind::EvalError => write!(f, "EvalError"),
            ErrorKind::UriError => write!(f, "URIError"),
        }
    }
}

impl Error {
    /// Create a runtime error of the given kind
    pub fn runtime_error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error::RuntimeError {
            kind,
            message: message.into(),
            suppressed: Vec::new(),
        }
    }

    /// Create a TypeError
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::runtime_error(ErrorKind::TypeError, message)
    }

    /// Create a ReferenceError
    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::runtime_error(ErrorKind::ReferenceError, message)
    }

    /// Create a RangeError
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::runtime_error(ErrorKind::RangeError, message)
    }

    /// Wrap a value thrown by user code
    pub fn throw(value: Value) -> Self {
        Error::Thrown {
            value,
            suppressed: Vec::new(),
        }
    }

    /// The error kind, if this error was raised by the core
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::RuntimeError { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The thrown value, if this error carries one
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            Error::Thrown { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The message of a core-raised error
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::RuntimeError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Errors attached to this one while it was propagating
    pub fn suppressed(&self) -> &[Error] {
        match self {
            Error::RuntimeError { suppressed, .. } | Error::Thrown { suppressed, .. } => suppressed,
            Error::ConfigError { .. } => &[],
        }
    }

    /// Attach a secondary error without replacing this one
    pub fn add_suppressed(&mut self, other: Error) {
        match self {
            Error::RuntimeError { suppressed, .. } | Error::Thrown { suppressed, .. } => {
                suppressed.push(other)
            }
            Error::ConfigError { .. } => {}
        }
    }

    /// Check whether this is a core-raised error of the given kind
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }
}

/// Result type alias for the semantic core
pub type Result<T> = std::result::Result<T, Error>;

/// Standardized error message templates
///
/// These constants provide consistent error messages following JavaScript conventions.
/// Use the helper functions below to generate formatted error messages.
pub mod messages {
    pub const NOT_A_FUNCTION: &str = "is not a function";
    pub const NOT_AN_OBJECT: &str = "is not an object";
    pub const NOT_A_CONSTRUCTOR: &str = "is not a constructor";
    pub const NOT_ITERABLE: &str = "is not iterable";

    pub const NOT_PRIMITIVE: &str = "@@toPrimitive returned an object";
    pub const NO_PRIMITIVE_REPRESENTATION: &str = "Cannot convert object to primitive value";
    pub const SYMBOL_TO_NUMBER: &str = "Cannot convert a Symbol value to a number";
    pub const SYMBOL_TO_STRING: &str = "Cannot convert a Symbol value to a string";
    pub const BIGINT_TO_NUMBER: &str = "Cannot convert a BigInt value to a number";
    pub const SIMD_TO_NUMBER: &str = "Cannot convert a SIMD value to a number";
    pub const UNDEFINED_OR_NULL: &str = "Cannot convert undefined or null to object";
    pub const ITERATOR_RESULT_NOT_OBJECT: &str = "Iterator result is not an object";
    pub const ITERATOR_NOT_OBJECT: &str = "Result of the Symbol.iterator method is not an object";
    pub const SPECIES_NOT_CONSTRUCTOR: &str = "object.constructor[Symbol.species] is not a constructor";
    pub const CONSTRUCTOR_NOT_OBJECT: &str = "object.constructor is not an object";
    pub const INSTANCEOF_NOT_OBJECT: &str = "Right-hand side of 'instanceof' is not an object";
    pub const INSTANCEOF_NOT_CALLABLE: &str = "Right-hand side of 'instanceof' is not callable";
    pub const PROTOTYPE_NOT_OBJECT: &str = "Function has non-object prototype in instanceof check";
    pub const INVALID_PROPERTY_DESCRIPTOR: &str =
        "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute";
    pub const PROPERTY_DESCRIPTOR_NOT_OBJECT: &str = "Property description must be an object";
    pub const GETTER_NOT_CALLABLE: &str = "Getter must be a function";
    pub const SETTER_NOT_CALLABLE: &str = "Setter must be a function";
    pub const THIS_NOT_INITIALIZED: &str =
        "Must call super constructor before accessing 'this'";
    pub const GLOBAL_REDECLARATION: &str = "has already been declared";

    pub const INVALID_ARRAY_LENGTH: &str = "Invalid array length";
    pub const INVALID_INDEX: &str = "Invalid index";
    pub const INVALID_ELEMENT_TYPE: &str = "Array-like element has an unexpected type";
    pub const TOO_MANY_ARGUMENTS: &str = "Too many arguments in function call";

    pub const IS_NOT_DEFINED: &str = "is not defined";
    pub const CANNOT_ACCESS_BEFORE_INIT: &str = "before initialization";
    pub const ASSIGNMENT_TO_CONSTANT: &str = "Assignment to constant variable";

    /// Format a "X is not a function" error message
    pub fn not_a_function(name: &str) -> String {
        format!("{} {}", name, NOT_A_FUNCTION)
    }

    /// Format a "X is not an object" error message
    pub fn not_an_object(name: &str) -> String {
        format!("{} {}", name, NOT_AN_OBJECT)
    }

    /// Format a "X is not a constructor" error message
    pub fn not_a_constructor(name: &str) -> String {
        format!("{} {}", name, NOT_A_CONSTRUCTOR)
    }

    /// Format a "X is not iterable" error message
    pub fn not_iterable(name: &str) -> String {
        format!("{} {}", name, NOT_ITERABLE)
    }

    /// Format a "X is not defined" error message
    pub fn not_defined(name: &str) -> String {
        format!("{} {}", name, IS_NOT_DEFINED)
    }

    /// Format a "Cannot access 'X' before initialization" error message
    pub fn uninitialized_binding(name: &str) -> String {
        format!("Cannot access '{}' {}", name, CANNOT_ACCESS_BEFORE_INIT)
    }

    /// Format an "Identifier 'X' has already been declared" error message
    pub fn already_declared(name: &str) -> String {
        format!("Identifier '{}' {}", name, GLOBAL_REDECLARATION)
    }

    /// Format a "Cannot assign to read only property 'X'" error message
    pub fn read_only_property(key: &str) -> String {
        format!("Cannot assign to read only property '{}'", key)
    }

    /// Format a "Cannot redefine property: X" error message
    pub fn cannot_redefine(key: &str) -> String {
        format!("Cannot redefine property: {}", key)
    }

    /// Format a "Cannot delete property 'X'" error message
    pub fn cannot_delete(key: &str) -> String {
        format!("Cannot delete property '{}'", key)
    }

    /// Format a "Cannot define property X, object is not extensible" error message
    pub fn not_extensible(key: &str) -> String {
        format!("Cannot define property {}, object is not extensible", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::type_error("x is not a function");
        assert_eq!(err.to_string(), "TypeError: x is not a function");
        assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    }

    #[test]
    fn test_suppressed_errors() {
        let mut err = Error::throw(Value::Number(1.0));
        err.add_suppressed(Error::range_error("boom"));
        assert_eq!(err.suppressed().len(), 1);
        assert!(err.suppressed()[0].is_kind(ErrorKind::RangeError));
        assert!(err.to_string().contains("suppressed: RangeError: boom"));
        assert!(matches!(err.thrown_value(), Some(Value::Number(n)) if *n == 1.0));
    }

    #[test]
    fn test_message_helpers() {
        assert_eq!(messages::not_defined("x"), "x is not defined");
        assert_eq!(
            messages::uninitialized_binding("y"),
            "Cannot access 'y' before initialization"
        );
    }
}
