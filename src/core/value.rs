//! # Value
//!
//! The dynamic value model.
//!
//! A collection holds heterogeneous values: scalars, nested collections
//! (index-style access) and records (property-style access). A single
//! enum keeps nested traversal, flattening and rendering uniform across
//! all of them.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;

use crate::collection::Collection;
use crate::core::key::Key;

/// The raw ordered map a collection wraps.
///
/// The free functions in [`crate::ops`] operate directly on this type;
/// [`Collection`] methods delegate to them.
pub type RawMap = IndexMap<Key, Value>;

/// Comparison mode for value ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Natural per-type ordering with a fixed cross-type rank
    #[default]
    Regular,
    /// Coerce both sides to a number
    Numeric,
    /// Compare rendered string forms
    String,
    /// Compare rendered string forms, case-insensitively
    CaseInsensitive,
}

/// A value with named fields, the target of property-style access.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// A dynamically typed collection element.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Nested collection, addressed index-style
    Coll(Collection),
    /// Named-field value, addressed property-style
    Record(Record),
}

impl Value {
    /// Name of the value's type, for error reporting
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Coll(_) => "collection",
            Value::Record(_) => "record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_coll(&self) -> Option<&Collection> {
        match self {
            Value::Coll(coll) => Some(coll),
            _ => None,
        }
    }

    pub fn as_coll_mut(&mut self) -> Option<&mut Collection> {
        match self {
            Value::Coll(coll) => Some(coll),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Coerces the value to a [`Key`], when it is key-able.
    ///
    /// Non-negative integers and strings convert; everything else
    /// (including negative integers) does not.
    pub fn as_key(&self) -> Option<Key> {
        match self {
            Value::Int(i) if *i >= 0 => Some(Key::Int(*i as u64)),
            Value::Str(s) => Some(Key::Str(s.clone())),
            _ => None,
        }
    }

    /// Numeric coercion used by [`SortMode::Numeric`].
    ///
    /// Non-numeric values coerce to zero; numeric strings parse.
    pub fn numeric(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Int(i) => *i as f64,
            Value::Float(x) => *x,
            Value::Str(s) => s.trim().parse().unwrap_or(0.0),
            Value::Coll(_) | Value::Record(_) => 0.0,
        }
    }

    /// Total ordering of two values under the given mode.
    ///
    /// `Regular` compares same-type values naturally; collections compare
    /// element-wise (so a collection works as a composite sort key) and
    /// mixed types fall back to a fixed type rank.
    pub fn compare(&self, other: &Value, mode: SortMode) -> Ordering {
        match mode {
            SortMode::Regular => self.compare_regular(other),
            SortMode::Numeric => self.numeric().total_cmp(&other.numeric()),
            SortMode::String => self.to_string().cmp(&other.to_string()),
            SortMode::CaseInsensitive => self
                .to_string()
                .to_lowercase()
                .cmp(&other.to_string().to_lowercase()),
        }
    }

    fn compare_regular(&self, other: &Value) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Str(a), Str(b)) => a.cmp(b),
            (Coll(a), Coll(b)) => {
                for (x, y) in a.as_raw().values().zip(b.as_raw().values()) {
                    let ord = x.compare_regular(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Record(a), Record(b)) => {
                for ((an, av), (bn, bv)) in a.iter().zip(b.iter()) {
                    let ord = an.cmp(bn).then_with(|| av.compare_regular(bv));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Str(_) => 3,
            Value::Coll(_) => 4,
            Value::Record(_) => 5,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Coll(coll) => write!(f, "{coll}"),
            Value::Record(record) => write!(f, "{record}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Collection> for Value {
    fn from(coll: Collection) -> Self {
        Value::Coll(coll)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(i) => Value::Int(i as i64),
            Key::Str(s) => Value::Str(s),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}
