//! # Key
//!
//! The key type of an ordered associative sequence.
//!
//! Keys are either non-negative integers or strings. The two kinds never
//! compare equal to each other, and both kinds can coexist in one
//! collection.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::Equivalent;

/// A collection key: a non-negative integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    /// Positional-style key
    Int(u64),
    /// Named key
    Str(String),
}

impl Key {
    /// Returns the integer key, if this is one
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }

    /// Returns the string key, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Str(s) => Some(s),
        }
    }
}

// Hashed without a variant tag so that `&str` and `u64` lookups hash
// identically to the keys they are equivalent to (see the `Equivalent`
// impls below).
impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Int(i) => i.hash(state),
            Key::Str(s) => s.hash(state),
        }
    }
}

impl Equivalent<Key> for str {
    fn equivalent(&self, key: &Key) -> bool {
        matches!(key, Key::Str(s) if s == self)
    }
}

impl Equivalent<Key> for u64 {
    fn equivalent(&self, key: &Key) -> bool {
        matches!(key, Key::Int(i) if i == self)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for Key {
    fn from(i: u64) -> Self {
        Key::Int(i)
    }
}

impl From<u32> for Key {
    fn from(i: u32) -> Self {
        Key::Int(i as u64)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Int(i as u64)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_key_kinds_are_distinct() {
        assert_ne!(Key::from(1u64), Key::from("1"));
        assert_eq!(Key::from(7usize), Key::Int(7));
        assert_eq!(Key::from("a"), Key::Str("a".into()));
    }

    #[test]
    fn test_equivalent_lookup() {
        let mut map: IndexMap<Key, i32> = IndexMap::new();
        map.insert(Key::from("a"), 1);
        map.insert(Key::from(3u64), 2);

        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get(&3u64), Some(&2));
        assert_eq!(map.get("3"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::from(12u64).to_string(), "12");
        assert_eq!(Key::from("foo").to_string(), "foo");
    }
}
