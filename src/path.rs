//! # Key paths
//!
//! Dotted or segmented paths into nested collections.
//!
//! A path is an ordered list of key segments. String paths split on `.`,
//! and all-digit segments become integer keys, so `"a.b.0"` addresses
//! element `0` of the collection at `a → b`. Resolution walks nested
//! collections segment by segment and gives up the moment a segment is
//! absent or the current node is not itself a collection — the get side
//! never fails, it just comes back empty.

use crate::collection::Collection;
use crate::core::key::Key;
use crate::core::value::{RawMap, Value};

/// A path of key segments into a nested structure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Key>,
}

impl Path {
    /// The empty path, addressing the root itself
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Key] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<&str> for Path {
    /// Splits on `.`; all-digit segments parse as integer keys.
    /// The empty string is the root path.
    fn from(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }

        let segments = path
            .split('.')
            .map(|segment| match segment.parse::<u64>() {
                Ok(i) => Key::Int(i),
                Err(_) => Key::Str(segment.to_owned()),
            })
            .collect();

        Self { segments }
    }
}

impl From<String> for Path {
    fn from(path: String) -> Self {
        Path::from(path.as_str())
    }
}

impl From<Vec<Key>> for Path {
    fn from(segments: Vec<Key>) -> Self {
        Self { segments }
    }
}

impl From<&[Key]> for Path {
    fn from(segments: &[Key]) -> Self {
        Self {
            segments: segments.to_vec(),
        }
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Resolves a path against a raw map.
///
/// Returns `None` for the root path (the root is not a value inside
/// itself; callers handle that case) and for any path that leaves the
/// nested structure.
pub fn resolve<'a>(root: &'a RawMap, path: &Path) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = root.get(first)?;

    for segment in rest {
        current = current.as_coll()?.as_raw().get(segment)?;
    }

    Some(current)
}

/// Mutable variant of [`resolve`].
pub fn resolve_mut<'a>(root: &'a mut RawMap, path: &Path) -> Option<&'a mut Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = root.get_mut(first)?;

    for segment in rest {
        current = current.as_coll_mut()?.as_raw_mut().get_mut(segment)?;
    }

    Some(current)
}

/// Inserts `value` at `path`, creating intermediate collections as
/// needed. An intermediate that exists but is not a collection is
/// replaced by a fresh one. Returns the displaced value, if any; the
/// root path is a no-op.
pub fn put(root: &mut RawMap, path: &Path, value: Value) -> Option<Value> {
    let (last, parents) = path.segments().split_last()?;
    let mut current = root;

    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Coll(Collection::new()));
        if slot.as_coll().is_none() {
            *slot = Value::Coll(Collection::new());
        }
        current = match slot {
            Value::Coll(coll) => coll.as_raw_mut(),
            _ => unreachable!(),
        };
    }

    current.insert(last.clone(), value)
}

/// Removes and returns the value at `path`. Order of the containing
/// collection is preserved. Returns `None` when the path does not lead
/// to a value (including the root path).
pub fn remove(root: &mut RawMap, path: &Path) -> Option<Value> {
    let (last, parents) = path.segments().split_last()?;
    let mut current = root;

    for segment in parents {
        current = match current.get_mut(segment) {
            Some(Value::Coll(coll)) => coll.as_raw_mut(),
            _ => return None,
        };
    }

    current.shift_remove(last)
}
