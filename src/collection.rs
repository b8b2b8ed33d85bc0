//! # Collection
//!
//! The ordered associative sequence type.
//!
//! A `Collection` wraps a [`RawMap`] and exposes the full operation
//! surface, delegating every non-trivial algorithm to [`crate::ops`].
//!
//! Mutation discipline: transformations return a *new* collection with
//! fresh backing storage — mutating a result never touches the source.
//! The only in-place operations are the mutator subset (`put`, `remove`,
//! `push`, `pop`, `shift`, `unshift`, `sort`, `shuffle`) and the two
//! contractually side-effecting getters (`get_or_put`, `get_and_delete`).

use std::fmt;

use rand::seq::SliceRandom;

use crate::access::AccessStrategy;
use crate::core::error::{Error, Result};
use crate::core::key::Key;
use crate::core::value::{RawMap, SortMode, Value};
use crate::ops;
use crate::path::{self, Path};
use crate::windows::Windows;

/// Builds a collection literal.
///
/// ```
/// use seqmap::{coll, Value};
///
/// let list = coll![1, 2, 3];
/// let keyed = coll! {"a" => 1, "b" => 2};
///
/// assert_eq!(list.to_string(), "[1, 2, 3]");
/// assert_eq!(keyed.get("a"), Ok(&Value::Int(1)));
/// ```
#[macro_export]
macro_rules! coll {
    () => {
        $crate::Collection::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut coll = $crate::Collection::new();
        $( coll.put($key, $value); )+
        coll
    }};
    ($($value:expr),+ $(,)?) => {
        $crate::Collection::from_values([$($crate::Value::from($value)),+])
    };
}

/// An insertion-ordered key→value collection.
///
/// Keys are unique; re-inserting an existing key overwrites the value
/// without moving it. Iteration always follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    entries: RawMap,
}

impl Collection {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing raw ordered map
    pub fn wrap(raw: RawMap) -> Self {
        Self { entries: raw }
    }

    /// Builds a collection from values, keyed `0..n`
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        values.into_iter().map(Into::into).collect()
    }

    /// An inclusive arithmetic sequence. The sign of `step` is ignored;
    /// direction follows `from` and `to`. A zero step is invalid.
    pub fn range(from: i64, to: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(Error::InvalidArgument("range step must be non-zero".into()));
        }

        let step = step.unsigned_abs();
        let mut values = Vec::new();
        if from <= to {
            let mut x = from;
            while x <= to {
                values.push(Value::Int(x));
                match x.checked_add_unsigned(step) {
                    Some(next) => x = next,
                    None => break,
                }
            }
        } else {
            let mut x = from;
            while x >= to {
                values.push(Value::Int(x));
                match x.checked_sub_unsigned(step) {
                    Some(next) => x = next,
                    None => break,
                }
            }
        }

        Ok(Self::from_values(values))
    }

    /// An inclusive lexicographic character sequence
    pub fn char_range(from: char, to: char) -> Self {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let mut values: Vec<Value> = (lo as u32..=hi as u32)
            .filter_map(char::from_u32)
            .map(|c| Value::Str(c.to_string()))
            .collect();
        if from > to {
            values.reverse();
        }

        Self::from_values(values)
    }

    // ========================================================================
    // CONVERSION & INSPECTION
    // ========================================================================

    pub fn as_raw(&self) -> &RawMap {
        &self.entries
    }

    pub fn as_raw_mut(&mut self) -> &mut RawMap {
        &mut self.entries
    }

    pub fn to_raw(&self) -> RawMap {
        self.entries.clone()
    }

    pub fn into_raw(self) -> RawMap {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(key, value)` pairs in insertion order. Every call starts a
    /// fresh iterator.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.entries.iter()
    }

    /// The keys as a re-indexed collection of values
    pub fn keys(&self) -> Collection {
        Self::from_values(self.entries.keys().cloned().map(Value::from))
    }

    /// The values as a re-indexed collection
    pub fn values(&self) -> Collection {
        Self::from_values(self.entries.values().cloned())
    }

    /// Renders the values joined by `separator`
    pub fn join(&self, separator: &str) -> String {
        self.entries
            .values()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }

    // ========================================================================
    // SINGLE ELEMENT ACCESS
    // ========================================================================

    pub fn get(&self, key: impl Into<Key>) -> Result<&Value> {
        let key = key.into();
        self.entries.get(&key).ok_or(Error::KeyNotFound(key))
    }

    /// The value at `key`, or `default` when absent
    pub fn get_or<'a>(&'a self, key: impl Into<Key>, default: &'a Value) -> &'a Value {
        self.entries.get(&key.into()).unwrap_or(default)
    }

    /// The value at `key`; inserts `default` first when absent
    pub fn get_or_put(&mut self, key: impl Into<Key>, default: impl Into<Value>) -> &Value {
        self.entries
            .entry(key.into())
            .or_insert_with(|| default.into())
    }

    /// Removes and returns the value at `key`, preserving the order of
    /// the remaining entries. An absent key leaves the collection
    /// untouched.
    pub fn get_and_delete(&mut self, key: impl Into<Key>) -> Option<Value> {
        self.entries.shift_remove(&key.into())
    }

    /// Resolves a nested path. The root path has no addressed value;
    /// use [`Collection::get_nested_or`] when the whole collection is an
    /// acceptable result.
    pub fn get_nested(&self, path: impl Into<Path>) -> Option<&Value> {
        path::resolve(&self.entries, &path.into())
    }

    /// Resolves a nested path, falling back to `default` the moment a
    /// segment is absent or a node is not a collection. The root path
    /// returns the whole collection.
    pub fn get_nested_or(&self, path: impl Into<Path>, default: impl Into<Value>) -> Value {
        let path = path.into();
        if path.is_root() {
            return Value::Coll(self.clone());
        }

        path::resolve(&self.entries, &path)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// Inserts a value at a nested path, creating intermediate
    /// collections as needed
    pub fn put_nested(&mut self, path: impl Into<Path>, value: impl Into<Value>) -> &mut Self {
        path::put(&mut self.entries, &path.into(), value.into());
        self
    }

    /// Removes and returns the value at a nested path
    pub fn delete_nested(&mut self, path: impl Into<Path>) -> Option<Value> {
        path::remove(&mut self.entries, &path.into())
    }

    pub fn first(&self) -> Result<&Value> {
        self.entries
            .get_index(0)
            .map(|(_, v)| v)
            .ok_or(Error::EmptyCollection)
    }

    pub fn last(&self) -> Result<&Value> {
        let len = self.entries.len();
        len.checked_sub(1)
            .and_then(|i| self.entries.get_index(i))
            .map(|(_, v)| v)
            .ok_or(Error::EmptyCollection)
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn contains_value(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        self.entries.values().any(|v| *v == value)
    }

    /// Key of the first entry holding `value`
    pub fn index_of(&self, value: impl Into<Value>) -> Option<&Key> {
        ops::index_of(&self.entries, &value.into())
    }

    /// Key of the last entry holding `value`
    pub fn last_index_of(&self, value: impl Into<Value>) -> Option<&Key> {
        ops::last_index_of(&self.entries, &value.into())
    }

    // ========================================================================
    // FINDING
    // ========================================================================

    pub fn find<F>(&self, predicate: F) -> Option<&Value>
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::find(&self.entries, predicate)
    }

    pub fn find_last<F>(&self, predicate: F) -> Option<&Value>
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::find_last(&self.entries, predicate)
    }

    pub fn find_key<F>(&self, predicate: F) -> Option<&Key>
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::find_key(&self.entries, predicate)
    }

    pub fn find_last_key<F>(&self, predicate: F) -> Option<&Key>
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::find_last_key(&self.entries, predicate)
    }

    // ========================================================================
    // SLICING
    // ========================================================================

    /// First `n` entries, or the last `|n|` when `n` is negative
    pub fn take(&self, n: isize) -> Collection {
        Self::wrap(ops::take(&self.entries, n))
    }

    /// All but the first `n` entries, or all but the last `|n|` when
    /// `n` is negative
    pub fn drop(&self, n: isize) -> Collection {
        Self::wrap(ops::drop(&self.entries, n))
    }

    /// Longest prefix satisfying the predicate
    pub fn take_while<F>(&self, predicate: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        Self::wrap(ops::take_while(&self.entries, predicate))
    }

    /// Everything after the longest prefix satisfying the predicate
    pub fn drop_while<F>(&self, predicate: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        Self::wrap(ops::drop_while(&self.entries, predicate))
    }

    /// The values repeated `n` times, re-indexed
    pub fn repeat(&self, n: usize) -> Collection {
        Self::wrap(ops::repeat(&self.entries, n))
    }

    /// Sub-collections of `size` values each; the last may be shorter
    pub fn chunk(&self, size: usize) -> Result<Collection> {
        ops::chunk(&self.entries, size).map(Self::wrap)
    }

    /// A run of up to `length` entries starting at `offset`; negative
    /// offsets count from the end, `None` runs to the end. Integer keys
    /// re-index unless `preserve_keys`; string keys always stay.
    pub fn slice(&self, offset: isize, length: Option<usize>, preserve_keys: bool) -> Collection {
        Self::wrap(ops::slice(&self.entries, offset, length, preserve_keys))
    }

    /// A copy with up to `length` entries at `offset` swapped for
    /// `replacement`'s values. Replacement keys are discarded.
    pub fn spliced(
        &self,
        offset: isize,
        length: Option<usize>,
        replacement: &Collection,
    ) -> Collection {
        Self::wrap(ops::spliced(
            &self.entries,
            offset,
            length,
            &replacement.entries,
        ))
    }

    /// Reversed order. Integer keys re-index unless `preserve_keys`;
    /// string keys always stay.
    pub fn reverse(&self, preserve_keys: bool) -> Collection {
        Self::wrap(ops::reverse(&self.entries, preserve_keys))
    }

    // ========================================================================
    // KEYS-BASED SET OPERATIONS
    // ========================================================================

    /// Entries whose keys are in `keys`
    pub fn only<I>(&self, keys: I) -> Collection
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        Self::wrap(ops::only(&self.entries, &keys))
    }

    /// Entries whose keys are not in `keys`
    pub fn except<I>(&self, keys: I) -> Collection
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        Self::wrap(ops::except(&self.entries, &keys))
    }

    /// Entries whose value also occurs in `other`; this side's keys are
    /// kept
    pub fn intersection(&self, other: &Collection) -> Collection {
        Self::wrap(ops::intersection(&self.entries, &other.entries))
    }

    /// Entries whose value does not occur in `other`
    pub fn difference(&self, other: &Collection) -> Collection {
        Self::wrap(ops::difference(&self.entries, &other.entries))
    }

    // ========================================================================
    // QUANTIFIERS
    // ========================================================================

    pub fn all<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::all(&self.entries, predicate)
    }

    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::any(&self.entries, predicate)
    }

    /// True when exactly one entry satisfies the predicate
    pub fn one<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::exactly(&self.entries, 1, predicate)
    }

    /// True when no entry satisfies the predicate
    pub fn none<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::exactly(&self.entries, 0, predicate)
    }

    /// True when exactly `n` entries satisfy the predicate; stops
    /// scanning once the count exceeds `n`
    pub fn exactly<F>(&self, n: usize, predicate: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        ops::exactly(&self.entries, n, predicate)
    }

    // ========================================================================
    // INDEXING & GROUPING
    // ========================================================================

    /// Re-keys every element by the callback's result; later elements
    /// win on collision
    pub fn index_by<F>(&self, key_fn: F) -> Collection
    where
        F: FnMut(&Value) -> Key,
    {
        Self::wrap(ops::index_by(&self.entries, key_fn))
    }

    /// Re-keys every element by a field, resolved with `strategy`
    pub fn index_by_field(
        &self,
        field: impl Into<Key>,
        strategy: AccessStrategy,
    ) -> Result<Collection> {
        ops::index_by_field(&self.entries, &field.into(), strategy).map(Self::wrap)
    }

    /// Groups elements by the callback's result; each group keeps
    /// original relative order
    pub fn group_by<F>(&self, key_fn: F) -> Collection
    where
        F: FnMut(&Value) -> Key,
    {
        Self::wrap(ops::group_by(&self.entries, key_fn))
    }

    /// Groups elements by a field, resolved with `strategy`
    pub fn group_by_field(
        &self,
        field: impl Into<Key>,
        strategy: AccessStrategy,
    ) -> Result<Collection> {
        ops::group_by_field(&self.entries, &field.into(), strategy).map(Self::wrap)
    }

    // ========================================================================
    // FILTERING & SAMPLING
    // ========================================================================

    /// Entries whose value satisfies the predicate; keys preserved
    pub fn filter<F>(&self, mut predicate: F) -> Collection
    where
        F: FnMut(&Value) -> bool,
    {
        Self::wrap(ops::filter(&self.entries, |v, _| predicate(v)))
    }

    /// Like [`Collection::filter`], passing the key as well
    pub fn filter_with_key<F>(&self, predicate: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        Self::wrap(ops::filter(&self.entries, predicate))
    }

    /// First occurrence of each distinct value; keys preserved
    pub fn unique(&self) -> Collection {
        Self::wrap(ops::unique(&self.entries))
    }

    /// `size` entries chosen uniformly without replacement, keeping
    /// original keys and order
    pub fn sample(&self, size: usize) -> Result<Collection> {
        ops::sample(&self.entries, size).map(Self::wrap)
    }

    /// One value chosen uniformly
    pub fn sample_one(&self) -> Result<Value> {
        ops::sample_one(&self.entries).cloned()
    }

    // ========================================================================
    // MAPPING
    // ========================================================================

    /// Applies the callback to every value; keys preserved
    pub fn map<F>(&self, mut f: F) -> Collection
    where
        F: FnMut(&Value) -> Value,
    {
        Self::wrap(ops::map_values(&self.entries, &mut f))
    }

    /// Like [`Collection::map`], passing the key as well
    pub fn map_with_key<F>(&self, f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> Value,
    {
        Self::wrap(ops::map_with_key(&self.entries, f))
    }

    /// Maps every entry to a collection and concatenates the results,
    /// re-indexed
    pub fn flat_map<F>(&self, f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> Collection,
    {
        Self::wrap(ops::flat_map(&self.entries, f))
    }

    /// Builds a new collection from the `(key, value)` pair the callback
    /// derives for each entry
    pub fn map_to_assoc<F>(&self, f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> (Key, Value),
    {
        Self::wrap(ops::map_to_assoc(&self.entries, f))
    }

    /// Concatenates the values of every element, re-indexed. Every
    /// element must itself be a collection.
    pub fn flatten(&self) -> Result<Collection> {
        ops::flatten(&self.entries).map(Self::wrap)
    }

    /// Picks `value_field` out of every element, preserving keys
    pub fn pluck(&self, value_field: impl Into<Key>, strategy: AccessStrategy) -> Result<Collection> {
        ops::pluck(&self.entries, &value_field.into(), None, strategy).map(Self::wrap)
    }

    /// Picks `value_field` out of every element, re-keyed by `key_field`
    pub fn pluck_keyed(
        &self,
        value_field: impl Into<Key>,
        key_field: impl Into<Key>,
        strategy: AccessStrategy,
    ) -> Result<Collection> {
        ops::pluck(
            &self.entries,
            &value_field.into(),
            Some(&key_field.into()),
            strategy,
        )
        .map(Self::wrap)
    }

    // ========================================================================
    // FOLDING & REDUCTION
    // ========================================================================

    pub fn fold<T, F>(&self, init: T, mut f: F) -> T
    where
        F: FnMut(T, &Value) -> T,
    {
        ops::fold_with_key(&self.entries, init, |acc, v, _| f(acc, v))
    }

    pub fn fold_with_key<T, F>(&self, init: T, f: F) -> T
    where
        F: FnMut(T, &Value, &Key) -> T,
    {
        ops::fold_with_key(&self.entries, init, f)
    }

    /// Folds in reverse order; elements keep their original keys
    pub fn fold_right<T, F>(&self, init: T, mut f: F) -> T
    where
        F: FnMut(T, &Value) -> T,
    {
        ops::fold_right_with_key(&self.entries, init, |acc, v, _| f(acc, v))
    }

    pub fn fold_right_with_key<T, F>(&self, init: T, f: F) -> T
    where
        F: FnMut(T, &Value, &Key) -> T,
    {
        ops::fold_right_with_key(&self.entries, init, f)
    }

    pub fn min(&self) -> Result<&Value> {
        ops::min_by(&self.entries, Value::clone).ok_or(Error::EmptyCollection)
    }

    pub fn max(&self) -> Result<&Value> {
        ops::max_by(&self.entries, Value::clone).ok_or(Error::EmptyCollection)
    }

    /// Element with the smallest derived key
    pub fn min_by<F>(&self, key_fn: F) -> Result<&Value>
    where
        F: FnMut(&Value) -> Value,
    {
        ops::min_by(&self.entries, key_fn).ok_or(Error::EmptyCollection)
    }

    /// Element with the largest derived key
    pub fn max_by<F>(&self, key_fn: F) -> Result<&Value>
    where
        F: FnMut(&Value) -> Value,
    {
        ops::max_by(&self.entries, key_fn).ok_or(Error::EmptyCollection)
    }

    /// Sum of the numeric values; integral until a float is seen
    pub fn sum(&self) -> Value {
        ops::sum(self.entries.values().cloned())
    }

    /// Sum of the callback's results
    pub fn sum_by<F>(&self, f: F) -> Value
    where
        F: FnMut(&Value) -> Value,
    {
        ops::sum(self.entries.values().map(f))
    }

    // ========================================================================
    // SPLITTING & WINDOWING
    // ========================================================================

    /// Splits into `(pass, fail)`; both keep original keys and order
    pub fn partition<F>(&self, predicate: F) -> (Collection, Collection)
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        let (pass, fail) = ops::partition(&self.entries, predicate);
        (Self::wrap(pass), Self::wrap(fail))
    }

    /// Sliding windows of `size` values, stepping one element at a time
    pub fn sliding(&self, size: usize) -> Result<Windows<'_>> {
        self.sliding_step(size, 1)
    }

    /// Sliding windows of `size` values every `step` elements
    pub fn sliding_step(&self, size: usize, step: usize) -> Result<Windows<'_>> {
        if size == 0 {
            return Err(Error::InvalidArgument("window size must be >= 1".into()));
        }
        if step == 0 {
            return Err(Error::InvalidArgument("window step must be >= 1".into()));
        }

        Ok(Windows::new(self, size, step))
    }

    // ========================================================================
    // MERGING & ZIPPING
    // ========================================================================

    /// Appends `other`: integer keys re-indexed positionally, string
    /// keys overwritten last-wins
    pub fn merge(&self, other: &Collection) -> Collection {
        Self::wrap(ops::merge(&self.entries, &other.entries))
    }

    /// [`Collection::merge`] with the operands swapped, so this side's
    /// string-keyed values win
    pub fn reverse_merge(&self, other: &Collection) -> Collection {
        Self::wrap(ops::reverse_merge(&self.entries, &other.entries))
    }

    /// Uses this collection's values as keys for `other`'s values
    pub fn combine(&self, values: &Collection) -> Result<Collection> {
        ops::combine(&self.entries, &values.entries).map(Self::wrap)
    }

    /// Swaps keys and values; duplicate values resolve last-wins
    pub fn flip(&self) -> Result<Collection> {
        ops::flip(&self.entries).map(Self::wrap)
    }

    /// Pairs elements positionally into two-element collections; missing
    /// right-hand slots become null
    pub fn zip(&self, other: &Collection) -> Collection {
        Self::wrap(ops::zip(&self.entries, &other.entries))
    }

    /// Applies the combiner pairwise; missing right-hand slots are null
    pub fn zip_with<F>(&self, other: &Collection, combiner: F) -> Collection
    where
        F: FnMut(&Value, &Value) -> Value,
    {
        Self::wrap(ops::zip_with(&self.entries, &other.entries, combiner))
    }

    // ========================================================================
    // SORTING (PURE)
    // ========================================================================

    /// Values reordered by `mode`; keys kept with `preserve_keys`, else
    /// re-indexed. Stable.
    pub fn sorted(&self, preserve_keys: bool, mode: SortMode) -> Collection {
        Self::wrap(ops::sorted(&self.entries, preserve_keys, mode))
    }

    /// Elements reordered by one derived key each, re-indexed. Ties keep
    /// original relative order.
    pub fn sorted_by<F>(&self, key_fn: F, mode: SortMode) -> Collection
    where
        F: FnMut(&Value, &Key) -> Value,
    {
        Self::wrap(ops::sort_by(&self.entries, key_fn, mode))
    }

    /// [`Collection::sorted_by`] keyed by a field
    pub fn sorted_by_field(
        &self,
        field: impl Into<Key>,
        strategy: AccessStrategy,
        mode: SortMode,
    ) -> Result<Collection> {
        ops::sort_by_field(&self.entries, &field.into(), strategy, mode).map(Self::wrap)
    }

    /// A shuffled, re-indexed copy
    pub fn shuffled(&self) -> Collection {
        let mut copy = self.clone();
        copy.shuffle();
        copy
    }

    // ========================================================================
    // MUTATORS (IN PLACE)
    // ========================================================================

    /// Inserts or overwrites. Overwriting keeps the key's original
    /// position.
    pub fn put(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Removes the entry at `key`, preserving the order of the rest
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        self.entries.shift_remove(&key.into())
    }

    /// Appends a value under the next free integer key
    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        let next = self
            .entries
            .keys()
            .filter_map(Key::as_int)
            .max()
            .map_or(0, |max| max + 1);
        self.entries.insert(Key::Int(next), value.into());
        self
    }

    /// Removes and returns the last value
    pub fn pop(&mut self) -> Option<Value> {
        self.entries.pop().map(|(_, v)| v)
    }

    /// Removes and returns the first value. Integer keys are re-indexed
    /// sequentially; string keys stay.
    pub fn shift(&mut self) -> Option<Value> {
        let (_, value) = self.entries.shift_remove_index(0)?;
        self.entries = ops::renumber_ints(std::mem::take(&mut self.entries));
        Some(value)
    }

    /// Prepends a value under key `0`. Existing integer keys are
    /// re-indexed sequentially; string keys stay.
    pub fn unshift(&mut self, value: impl Into<Value>) -> &mut Self {
        let old = std::mem::take(&mut self.entries);
        self.entries =
            ops::renumber_ints(std::iter::once((Key::Int(0), value.into())).chain(old));
        self
    }

    /// Sorts values in place. With `preserve_keys` entries keep their
    /// keys, otherwise the collection is re-indexed. Stable.
    pub fn sort(&mut self, preserve_keys: bool, mode: SortMode) -> &mut Self {
        let sorted = ops::sorted(&self.entries, preserve_keys, mode);
        self.entries = sorted;
        self
    }

    /// Shuffles values in place and re-indexes
    pub fn shuffle(&mut self) -> &mut Self {
        let mut values: Vec<Value> =
            std::mem::take(&mut self.entries).into_values().collect();
        values.shuffle(&mut rand::thread_rng());
        self.entries = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::Int(i as u64), v))
            .collect();
        self
    }
}

// ============================================================================
// PROTOCOLS
// ============================================================================

/// Order-sensitive equality: same entries in the same order.
impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl From<RawMap> for Collection {
    fn from(raw: RawMap) -> Self {
        Self::wrap(raw)
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::Int(i as u64), v))
                .collect(),
        }
    }
}

impl FromIterator<(Key, Value)> for Collection {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Collection {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl std::ops::Index<&Key> for Collection {
    type Output = Value;

    fn index(&self, key: &Key) -> &Value {
        match self.entries.get(key) {
            Some(value) => value,
            None => panic!("key not found: {key}"),
        }
    }
}

impl std::ops::Index<&str> for Collection {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.entries.get(key) {
            Some(value) => value,
            None => panic!("key not found: {key}"),
        }
    }
}

/// Indexes by integer *key*, not by position.
impl std::ops::Index<usize> for Collection {
    type Output = Value;

    fn index(&self, key: usize) -> &Value {
        match self.entries.get(&(key as u64)) {
            Some(value) => value,
            None => panic!("key not found: {key}"),
        }
    }
}

/// Human-readable nested rendering. A key is shown only when it differs
/// from the entry's natural sequential position, so plain lists render
/// as `[1, 2, 3]` and keyed maps as `[a => 1, b => 2]`.
impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (position, (key, value)) in self.entries.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            let natural = matches!(key, Key::Int(i) if *i == position as u64);
            if natural {
                write!(f, "{value}")?;
            } else {
                write!(f, "{key} => {value}")?;
            }
        }
        write!(f, "]")
    }
}
