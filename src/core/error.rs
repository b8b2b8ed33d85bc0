//! # Errors
//!
//! The failure taxonomy of the crate.
//!
//! All failures are synchronous and local to the operation that raised
//! them; nothing is retried or swallowed. Methods whose contract defines
//! a default-value fallback (`get_or`, `get_nested_or`, `find`) return
//! the fallback instead of an error.

use thiserror::Error;

use crate::core::key::Key;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Direct access to a key that is not present
    #[error("key not found: {0}")]
    KeyNotFound(Key),

    /// `first`/`last`/`min`/`max` on an empty collection
    #[error("operation on empty collection")]
    EmptyCollection,

    /// An access strategy resolved a field that is absent on an element
    #[error("field not found: {0}")]
    FieldNotFound(Key),

    /// An element did not have the shape the operation requires
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// A size, step or mode argument outside the valid range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
