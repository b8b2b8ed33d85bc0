//! # Core types
//!
//! Pure data model, no algorithms.
//! Contains: Key, Value, Record, SortMode, the error taxonomy.

pub mod error;
pub mod key;
pub mod value;

pub use error::{Error, Result};
pub use key::Key;
pub use value::{RawMap, Record, SortMode, Value};
