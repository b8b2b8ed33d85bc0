//! # Operations over raw ordered maps
//!
//! Every non-trivial algorithm lives here once, as a free function over
//! [`RawMap`]. The [`Collection`](crate::Collection) methods delegate to
//! these, so "call the operation on raw data" and "call it through the
//! chained object" share a single implementation.
//!
//! Conventions:
//! - Predicates and callbacks receive `(value, key)`.
//! - Functions that return a map always build fresh storage; inputs are
//!   never mutated.
//! - "Re-indexed" in a doc comment means the result keys are the
//!   sequential integers `0..n`; everything else preserves original keys
//!   and order.

use rand::seq::index::sample as sample_indices;
use rand::Rng;

use crate::access::{self, AccessStrategy};
use crate::collection::Collection;
use crate::core::error::{Error, Result};
use crate::core::key::Key;
use crate::core::value::{RawMap, SortMode, Value};

/// Re-keys integer entries sequentially while string keys pass through.
/// Duplicate string keys keep their first position with the last value,
/// which is exactly the merge overwrite rule.
pub(crate) fn renumber_ints(entries: impl IntoIterator<Item = (Key, Value)>) -> RawMap {
    let mut next = 0u64;
    entries
        .into_iter()
        .map(|(key, value)| match key {
            Key::Int(_) => {
                let key = Key::Int(next);
                next += 1;
                (key, value)
            }
            Key::Str(_) => (key, value),
        })
        .collect()
}

fn reindex(values: impl IntoIterator<Item = Value>) -> RawMap {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| (Key::Int(i as u64), value))
        .collect()
}

// ----- Slicing -----

/// First `n` entries when `n >= 0`, last `|n|` entries when negative.
/// Keys are preserved.
pub fn take(map: &RawMap, n: isize) -> RawMap {
    let len = map.len();
    if n >= 0 {
        map.iter()
            .take(n as usize)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    } else {
        let keep = (n.unsigned_abs()).min(len);
        map.iter()
            .skip(len - keep)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Everything but the first `n` entries when `n >= 0`; everything but
/// the last `|n|` entries when negative. Keys are preserved.
pub fn drop(map: &RawMap, n: isize) -> RawMap {
    let len = map.len();
    if n >= 0 {
        map.iter()
            .skip(n as usize)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    } else {
        let cut = (n.unsigned_abs()).min(len);
        map.iter()
            .take(len - cut)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Longest prefix of entries satisfying the predicate. Stops at the
/// first failure; later matches are not picked up.
pub fn take_while<F>(map: &RawMap, mut predicate: F) -> RawMap
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter()
        .take_while(|(k, v)| predicate(v, k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn slice_start(len: usize, offset: isize) -> usize {
    if offset >= 0 {
        (offset as usize).min(len)
    } else {
        len.saturating_sub(offset.unsigned_abs())
    }
}

/// A run of up to `length` entries starting at `offset`. A negative
/// offset counts from the end; `None` runs to the end. Integer keys are
/// re-indexed unless `preserve_keys`; string keys always stay.
pub fn slice(map: &RawMap, offset: isize, length: Option<usize>, preserve_keys: bool) -> RawMap {
    let start = slice_start(map.len(), offset);
    let count = length.unwrap_or(map.len());
    let picked = map
        .iter()
        .skip(start)
        .take(count)
        .map(|(k, v)| (k.clone(), v.clone()));

    if preserve_keys {
        picked.collect()
    } else {
        renumber_ints(picked)
    }
}

/// A copy with up to `length` entries at `offset` swapped for
/// `replacement`'s values. A negative offset counts from the end;
/// `None` removes through the end. Replacement keys are discarded;
/// integer keys re-index, string keys stay.
pub fn spliced(
    map: &RawMap,
    offset: isize,
    length: Option<usize>,
    replacement: &RawMap,
) -> RawMap {
    let start = slice_start(map.len(), offset);
    let count = length.unwrap_or(map.len());
    let end = start.saturating_add(count).min(map.len());

    let before = map.iter().take(start).map(|(k, v)| (k.clone(), v.clone()));
    let inserted = replacement.values().map(|v| (Key::Int(0), v.clone()));
    let after = map.iter().skip(end).map(|(k, v)| (k.clone(), v.clone()));

    renumber_ints(before.chain(inserted).chain(after))
}

/// Drops the longest prefix of entries satisfying the predicate and
/// keeps the rest.
pub fn drop_while<F>(map: &RawMap, mut predicate: F) -> RawMap
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter()
        .skip_while(|(k, v)| predicate(v, k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// The values repeated `n` times, re-indexed.
pub fn repeat(map: &RawMap, n: usize) -> RawMap {
    reindex((0..n).flat_map(|_| map.values().cloned()))
}

/// Chunks of `size` values (the last may be shorter), re-indexed inside
/// and out. `size == 0` is invalid.
pub fn chunk(map: &RawMap, size: usize) -> Result<RawMap> {
    if size == 0 {
        return Err(Error::InvalidArgument("chunk size must be >= 1".into()));
    }

    let values: Vec<Value> = map.values().cloned().collect();
    Ok(reindex(values.chunks(size).map(|chunk| {
        Value::Coll(Collection::from_values(chunk.to_vec()))
    })))
}

// ----- Finding -----

/// First value satisfying the predicate, scanning in order.
pub fn find<'a, F>(map: &'a RawMap, mut predicate: F) -> Option<&'a Value>
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter().find(|(k, v)| predicate(v, k)).map(|(_, v)| v)
}

/// Last value satisfying the predicate, scanning in reverse. Keys keep
/// their original identity for the predicate.
pub fn find_last<'a, F>(map: &'a RawMap, mut predicate: F) -> Option<&'a Value>
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter()
        .rev()
        .find(|(k, v)| predicate(v, k))
        .map(|(_, v)| v)
}

/// Key of the first entry satisfying the predicate.
pub fn find_key<'a, F>(map: &'a RawMap, mut predicate: F) -> Option<&'a Key>
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter().find(|(k, v)| predicate(v, k)).map(|(k, _)| k)
}

/// Key of the last entry satisfying the predicate.
pub fn find_last_key<'a, F>(map: &'a RawMap, mut predicate: F) -> Option<&'a Key>
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter()
        .rev()
        .find(|(k, v)| predicate(v, k))
        .map(|(k, _)| k)
}

/// Key of the first entry holding `value`.
pub fn index_of<'a>(map: &'a RawMap, value: &Value) -> Option<&'a Key> {
    map.iter().find(|(_, v)| *v == value).map(|(k, _)| k)
}

/// Key of the last entry holding `value`.
pub fn last_index_of<'a>(map: &'a RawMap, value: &Value) -> Option<&'a Key> {
    map.iter().rev().find(|(_, v)| *v == value).map(|(k, _)| k)
}

// ----- Keys-based set operations -----

/// Entries whose keys are in `keys`, in original order.
pub fn only(map: &RawMap, keys: &[Key]) -> RawMap {
    map.iter()
        .filter(|(k, _)| keys.contains(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Entries whose keys are not in `keys`.
pub fn except(map: &RawMap, keys: &[Key]) -> RawMap {
    map.iter()
        .filter(|(k, _)| !keys.contains(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Entries whose value also occurs in `other`. Comparison is by value;
/// the caller's keys are kept.
pub fn intersection(map: &RawMap, other: &RawMap) -> RawMap {
    map.iter()
        .filter(|(_, v)| other.values().any(|w| w == *v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Entries whose value does not occur in `other`. The caller's keys are
/// kept.
pub fn difference(map: &RawMap, other: &RawMap) -> RawMap {
    map.iter()
        .filter(|(_, v)| !other.values().any(|w| w == *v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// ----- Quantifiers -----

pub fn all<F>(map: &RawMap, mut predicate: F) -> bool
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter().all(|(k, v)| predicate(v, k))
}

pub fn any<F>(map: &RawMap, mut predicate: F) -> bool
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter().any(|(k, v)| predicate(v, k))
}

/// True when exactly `n` entries satisfy the predicate. The scan stops
/// as soon as the match count exceeds `n`.
pub fn exactly<F>(map: &RawMap, n: usize, mut predicate: F) -> bool
where
    F: FnMut(&Value, &Key) -> bool,
{
    let mut found = 0usize;
    for (k, v) in map {
        if predicate(v, k) {
            found += 1;
            if found > n {
                return false;
            }
        }
    }

    found == n
}

// ----- Filtering -----

/// Entries satisfying the predicate; keys and order are preserved.
pub fn filter<F>(map: &RawMap, mut predicate: F) -> RawMap
where
    F: FnMut(&Value, &Key) -> bool,
{
    map.iter()
        .filter(|(k, v)| predicate(v, k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// First occurrence of each distinct value; keys are preserved.
pub fn unique(map: &RawMap) -> RawMap {
    let mut seen: Vec<&Value> = Vec::new();
    let mut result = RawMap::new();
    for (k, v) in map {
        if !seen.contains(&v) {
            seen.push(v);
            result.insert(k.clone(), v.clone());
        }
    }

    result
}

/// `size` entries chosen uniformly without replacement, keeping original
/// keys and relative order. Asking for more than the map holds is
/// invalid.
pub fn sample(map: &RawMap, size: usize) -> Result<RawMap> {
    if size > map.len() {
        return Err(Error::InvalidArgument(format!(
            "sample size {size} exceeds collection length {}",
            map.len()
        )));
    }

    let mut picked = sample_indices(&mut rand::thread_rng(), map.len(), size).into_vec();
    picked.sort();

    Ok(picked
        .into_iter()
        .filter_map(|i| map.get_index(i))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect())
}

/// One value chosen uniformly.
pub fn sample_one(map: &RawMap) -> Result<&Value> {
    if map.is_empty() {
        return Err(Error::EmptyCollection);
    }

    let i = rand::thread_rng().gen_range(0..map.len());
    map.get_index(i)
        .map(|(_, v)| v)
        .ok_or(Error::EmptyCollection)
}

// ----- Indexing and grouping -----

/// Re-keys every element by the callback's result. When two elements
/// derive the same key, the later one wins.
pub fn index_by<F>(map: &RawMap, mut key_fn: F) -> RawMap
where
    F: FnMut(&Value) -> Key,
{
    let mut result = RawMap::new();
    for value in map.values() {
        result.insert(key_fn(value), value.clone());
    }

    result
}

/// Re-keys every element by a field resolved with the given strategy.
/// The field's value must itself be key-able. Later elements win on
/// collision.
pub fn index_by_field(map: &RawMap, field: &Key, strategy: AccessStrategy) -> Result<RawMap> {
    let mut result = RawMap::new();
    for value in map.values() {
        let derived = access::field(value, field, strategy)?;
        let key = derived.as_key().ok_or(Error::TypeMismatch {
            expected: "integer or string key",
            got: derived.type_name(),
        })?;
        result.insert(key, value.clone());
    }

    Ok(result)
}

/// Groups elements by the callback's result. Each group is a re-indexed
/// collection holding its elements in original relative order.
pub fn group_by<F>(map: &RawMap, mut key_fn: F) -> RawMap
where
    F: FnMut(&Value) -> Key,
{
    let mut groups: indexmap::IndexMap<Key, Collection> = indexmap::IndexMap::new();
    for value in map.values() {
        groups.entry(key_fn(value)).or_default().push(value.clone());
    }

    groups
        .into_iter()
        .map(|(key, group)| (key, Value::Coll(group)))
        .collect()
}

/// Groups elements by a field resolved with the given strategy.
pub fn group_by_field(map: &RawMap, field: &Key, strategy: AccessStrategy) -> Result<RawMap> {
    let mut groups: indexmap::IndexMap<Key, Collection> = indexmap::IndexMap::new();
    for value in map.values() {
        let derived = access::field(value, field, strategy)?;
        let key = derived.as_key().ok_or(Error::TypeMismatch {
            expected: "integer or string key",
            got: derived.type_name(),
        })?;
        groups.entry(key).or_default().push(value.clone());
    }

    Ok(groups
        .into_iter()
        .map(|(key, group)| (key, Value::Coll(group)))
        .collect())
}

// ----- Mapping -----

/// Applies the callback to every value; keys are preserved.
pub fn map_values<F>(map: &RawMap, mut f: F) -> RawMap
where
    F: FnMut(&Value) -> Value,
{
    map.iter().map(|(k, v)| (k.clone(), f(v))).collect()
}

/// Like [`map_values`], passing the key as well.
pub fn map_with_key<F>(map: &RawMap, mut f: F) -> RawMap
where
    F: FnMut(&Value, &Key) -> Value,
{
    map.iter().map(|(k, v)| (k.clone(), f(v, k))).collect()
}

/// Applies the callback to every entry and concatenates the resulting
/// collections, re-indexed.
pub fn flat_map<F>(map: &RawMap, mut f: F) -> RawMap
where
    F: FnMut(&Value, &Key) -> Collection,
{
    reindex(
        map.iter()
            .flat_map(|(k, v)| f(v, k).into_raw().into_values()),
    )
}

/// Builds a new map from the `(key, value)` pair the callback derives
/// for each entry. Later duplicate keys overwrite.
pub fn map_to_assoc<F>(map: &RawMap, mut f: F) -> RawMap
where
    F: FnMut(&Value, &Key) -> (Key, Value),
{
    let mut result = RawMap::new();
    for (k, v) in map {
        let (key, value) = f(v, k);
        result.insert(key, value);
    }

    result
}

/// Concatenates the values of every element, re-indexed. Every element
/// must itself be a collection.
pub fn flatten(map: &RawMap) -> Result<RawMap> {
    let mut values = Vec::new();
    for value in map.values() {
        let inner = value.as_coll().ok_or(Error::TypeMismatch {
            expected: "collection",
            got: value.type_name(),
        })?;
        values.extend(inner.as_raw().values().cloned());
    }

    Ok(reindex(values))
}

/// Picks `value_field` out of every element. With `key_field` the result
/// is re-keyed by that field, otherwise original keys are preserved.
pub fn pluck(
    map: &RawMap,
    value_field: &Key,
    key_field: Option<&Key>,
    strategy: AccessStrategy,
) -> Result<RawMap> {
    let mut result = RawMap::new();
    for (k, element) in map {
        let value = access::field(element, value_field, strategy)?.clone();
        let key = match key_field {
            Some(kf) => {
                let derived = access::field(element, kf, strategy)?;
                derived.as_key().ok_or(Error::TypeMismatch {
                    expected: "integer or string key",
                    got: derived.type_name(),
                })?
            }
            None => k.clone(),
        };
        result.insert(key, value);
    }

    Ok(result)
}

// ----- Folding and reduction -----

pub fn fold_with_key<T, F>(map: &RawMap, init: T, mut f: F) -> T
where
    F: FnMut(T, &Value, &Key) -> T,
{
    let mut acc = init;
    for (k, v) in map {
        acc = f(acc, v, k);
    }

    acc
}

/// Folds in reverse of insertion order. Each element still reports its
/// original key, not a renumbered position.
pub fn fold_right_with_key<T, F>(map: &RawMap, init: T, mut f: F) -> T
where
    F: FnMut(T, &Value, &Key) -> T,
{
    let mut acc = init;
    for (k, v) in map.iter().rev() {
        acc = f(acc, v, k);
    }

    acc
}

/// Element with the smallest derived key. First wins on ties.
pub fn min_by<'a, F>(map: &'a RawMap, mut key_fn: F) -> Option<&'a Value>
where
    F: FnMut(&Value) -> Value,
{
    let mut best: Option<(Value, &Value)> = None;
    for value in map.values() {
        let derived = key_fn(value);
        let better = match &best {
            Some((current, _)) => {
                derived.compare(current, SortMode::Regular) == std::cmp::Ordering::Less
            }
            None => true,
        };
        if better {
            best = Some((derived, value));
        }
    }

    best.map(|(_, value)| value)
}

/// Element with the largest derived key. First wins on ties.
pub fn max_by<'a, F>(map: &'a RawMap, mut key_fn: F) -> Option<&'a Value>
where
    F: FnMut(&Value) -> Value,
{
    let mut best: Option<(Value, &Value)> = None;
    for value in map.values() {
        let derived = key_fn(value);
        let better = match &best {
            Some((current, _)) => {
                derived.compare(current, SortMode::Regular) == std::cmp::Ordering::Greater
            }
            None => true,
        };
        if better {
            best = Some((derived, value));
        }
    }

    best.map(|(_, value)| value)
}

/// Sums the numeric values. The result stays an integer until a float
/// value is seen; non-numeric values contribute nothing.
pub fn sum(values: impl IntoIterator<Item = Value>) -> Value {
    let mut int_total: i64 = 0;
    let mut float_total: f64 = 0.0;
    let mut saw_float = false;

    for value in values {
        match value {
            Value::Int(i) => int_total += i,
            Value::Float(x) => {
                saw_float = true;
                float_total += x;
            }
            _ => {}
        }
    }

    if saw_float {
        Value::Float(float_total + int_total as f64)
    } else {
        Value::Int(int_total)
    }
}

// ----- Splitting -----

/// Splits into `(pass, fail)` by the predicate. Both halves keep their
/// original keys and relative order; together they hold exactly the
/// input's entries.
pub fn partition<F>(map: &RawMap, mut predicate: F) -> (RawMap, RawMap)
where
    F: FnMut(&Value, &Key) -> bool,
{
    let mut pass = RawMap::new();
    let mut fail = RawMap::new();
    for (k, v) in map {
        if predicate(v, k) {
            pass.insert(k.clone(), v.clone());
        } else {
            fail.insert(k.clone(), v.clone());
        }
    }

    (pass, fail)
}

// ----- Merging -----

/// Appends `other` after `map`: integer keys are re-indexed
/// positionally, string keys overwrite last-wins (keeping the first
/// occurrence's position).
pub fn merge(map: &RawMap, other: &RawMap) -> RawMap {
    renumber_ints(
        map.iter()
            .chain(other.iter())
            .map(|(k, v)| (k.clone(), v.clone())),
    )
}

/// [`merge`] with the operands swapped, so the receiver's string-keyed
/// values win.
pub fn reverse_merge(map: &RawMap, other: &RawMap) -> RawMap {
    merge(other, map)
}

/// Pairs the receiver's values as keys with `values`' values. Lengths
/// must match and every receiver value must be key-able.
pub fn combine(map: &RawMap, values: &RawMap) -> Result<RawMap> {
    if map.len() != values.len() {
        return Err(Error::InvalidArgument(format!(
            "combine requires equal lengths, got {} and {}",
            map.len(),
            values.len()
        )));
    }

    let mut result = RawMap::new();
    for (key_value, value) in map.values().zip(values.values()) {
        let key = key_value.as_key().ok_or(Error::TypeMismatch {
            expected: "integer or string key",
            got: key_value.type_name(),
        })?;
        result.insert(key, value.clone());
    }

    Ok(result)
}

/// Swaps keys and values. Every value must be key-able; duplicate
/// values resolve last-wins.
pub fn flip(map: &RawMap) -> Result<RawMap> {
    let mut result = RawMap::new();
    for (k, v) in map {
        let key = v.as_key().ok_or(Error::TypeMismatch {
            expected: "integer or string key",
            got: v.type_name(),
        })?;
        result.insert(key, Value::from(k.clone()));
    }

    Ok(result)
}

/// Reversed order. Integer keys are re-indexed unless `preserve_keys`;
/// string keys always stay.
pub fn reverse(map: &RawMap, preserve_keys: bool) -> RawMap {
    let reversed = map.iter().rev().map(|(k, v)| (k.clone(), v.clone()));
    if preserve_keys {
        reversed.collect()
    } else {
        renumber_ints(reversed)
    }
}

// ----- Zipping -----

/// Pairs elements positionally into two-element collections, re-indexed.
/// Length follows the receiver; missing right-hand slots become null.
pub fn zip(map: &RawMap, other: &RawMap) -> RawMap {
    reindex(map.values().enumerate().map(|(i, a)| {
        let b = other
            .get_index(i)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Null);
        Value::Coll(Collection::from_values([a.clone(), b]))
    }))
}

/// Applies the combiner pairwise, re-indexed. Length follows the
/// receiver; missing right-hand slots are passed as null.
pub fn zip_with<F>(map: &RawMap, other: &RawMap, mut combiner: F) -> RawMap
where
    F: FnMut(&Value, &Value) -> Value,
{
    reindex(map.values().enumerate().map(|(i, a)| {
        let b = other.get_index(i).map(|(_, v)| v);
        combiner(a, b.unwrap_or(&Value::Null))
    }))
}

// ----- Sorting -----

/// Reorders elements by one derived key per element, re-indexed. The
/// sort is stable: ties keep original relative order.
pub fn sort_by<F>(map: &RawMap, mut key_fn: F, mode: SortMode) -> RawMap
where
    F: FnMut(&Value, &Key) -> Value,
{
    let mut decorated: Vec<(Value, &Value)> =
        map.iter().map(|(k, v)| (key_fn(v, k), v)).collect();
    // sort_by is stable; sort_unstable_by would break the tie-break contract
    decorated.sort_by(|a, b| a.0.compare(&b.0, mode));

    reindex(decorated.into_iter().map(|(_, v)| v.clone()))
}

/// [`sort_by`] keyed by a field resolved with the given strategy.
pub fn sort_by_field(
    map: &RawMap,
    field: &Key,
    strategy: AccessStrategy,
    mode: SortMode,
) -> Result<RawMap> {
    let mut decorated: Vec<(Value, &Value)> = Vec::with_capacity(map.len());
    for value in map.values() {
        decorated.push((access::field(value, field, strategy)?.clone(), value));
    }
    decorated.sort_by(|a, b| a.0.compare(&b.0, mode));

    Ok(reindex(decorated.into_iter().map(|(_, v)| v.clone())))
}

/// Reorders entries by value. With `preserve_keys` the entries keep
/// their keys, otherwise the result is re-indexed. Stable.
pub fn sorted(map: &RawMap, preserve_keys: bool, mode: SortMode) -> RawMap {
    let mut entries: Vec<(&Key, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.1.compare(b.1, mode));

    if preserve_keys {
        entries
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    } else {
        reindex(entries.into_iter().map(|(_, v)| v.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coll;

    fn five() -> RawMap {
        Collection::from_values([1, 2, 3, 4, 5]).into_raw()
    }

    fn people() -> RawMap {
        coll![
            coll! {"foo" => 1, "bar" => 2},
            coll! {"foo" => 2, "bar" => 4},
            coll! {"foo" => 3, "bar" => 6},
            coll! {"foo" => 1, "bar" => 8},
            coll! {"foo" => 2, "bar" => 10},
            coll! {"foo" => 3, "bar" => 12},
        ]
        .into_raw()
    }

    fn values(map: &RawMap) -> Vec<Value> {
        map.values().cloned().collect()
    }

    #[test]
    fn test_take_signed() {
        assert_eq!(take(&five(), 0), RawMap::new());
        assert_eq!(values(&take(&five(), 2)), vec![1.into(), 2.into()]);
        assert_eq!(take(&five(), 5), five());
        assert_eq!(values(&take(&five(), -2)), vec![4.into(), 5.into()]);
        assert_eq!(take(&five(), -5), five());
    }

    #[test]
    fn test_drop_signed() {
        assert_eq!(drop(&five(), 0), five());
        assert_eq!(values(&drop(&five(), 2)), vec![3.into(), 4.into(), 5.into()]);
        assert_eq!(drop(&five(), 5), RawMap::new());
        assert_eq!(values(&drop(&five(), -2)), vec![1.into(), 2.into(), 3.into()]);
        assert_eq!(drop(&five(), -5), RawMap::new());
    }

    #[test]
    fn test_take_while_stops_at_first_failure() {
        // Not a filter: the 1 after the 3 must not reappear.
        let map = Collection::from_values([1, 2, 3, 1, 2]).into_raw();
        let prefix = take_while(&map, |v, _| v.as_int().unwrap() < 3);
        assert_eq!(values(&prefix), vec![1.into(), 2.into()]);

        let rest = drop_while(&map, |v, _| v.as_int().unwrap() < 3);
        assert_eq!(values(&rest), vec![3.into(), 1.into(), 2.into()]);
    }

    #[test]
    fn test_find_last_sees_original_keys() {
        let map = five();
        let mut seen = Vec::new();
        find_last(&map, |_, k| {
            seen.push(k.clone());
            false
        });
        assert_eq!(seen.first(), Some(&Key::Int(4)));

        let key = find_last_key(&map, |v, _| v.as_int().unwrap() < 3);
        assert_eq!(key, Some(&Key::Int(1)));
    }

    #[test]
    fn test_only_and_except() {
        let map = coll! {0usize => 1, 1usize => 2, "key" => "val", 123usize => 456}.into_raw();

        let kept = only(&map, &[Key::from("key"), Key::from(123u64)]);
        assert_eq!(kept, coll! {"key" => "val", 123usize => 456}.into_raw());

        let rest = except(&map, &[Key::from(123u64), Key::from(0u64)]);
        assert_eq!(rest, coll! {1usize => 2, "key" => "val"}.into_raw());
    }

    #[test]
    fn test_intersection_difference_keep_caller_keys() {
        let map = coll! {"a" => 1, "b" => 2, "c" => 3}.into_raw();
        let other = coll![2, 3, 4].into_raw();

        assert_eq!(intersection(&map, &other), coll! {"b" => 2, "c" => 3}.into_raw());
        assert_eq!(difference(&map, &other), coll! {"a" => 1}.into_raw());
    }

    #[test]
    fn test_exactly_short_circuits() {
        let map = five();
        let mut calls = 0;
        let result = exactly(&map, 1, |v, _| {
            calls += 1;
            v.as_int().unwrap() <= 2
        });
        assert!(!result);
        // Second match is the third element; scanning stops right there.
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_quantifiers() {
        let map = five();
        assert!(all(&map, |v, _| v.as_int().unwrap() > 0));
        assert!(any(&map, |v, _| v.as_int().unwrap() == 3));
        assert!(exactly(&map, 1, |v, _| v.as_int().unwrap() == 3));
        assert!(exactly(&map, 0, |v, _| v.as_int().unwrap() > 9));
        assert!(!exactly(&map, 2, |v, _| v.as_int().unwrap() == 3));
    }

    #[test]
    fn test_index_by_last_write_wins() {
        let map = Collection::from_values(1..=9).into_raw();
        let indexed = index_by(&map, |v| {
            let x = v.as_int().unwrap();
            if x % 3 == 0 {
                Key::from("foo")
            } else if x % 2 == 0 {
                Key::from("bar")
            } else {
                Key::from("baz")
            }
        });

        assert_eq!(indexed.get("foo"), Some(&Value::Int(9)));
        assert_eq!(indexed.get("bar"), Some(&Value::Int(8)));
        assert_eq!(indexed.get("baz"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_index_by_field() {
        let indexed = index_by_field(&people(), &Key::from("foo"), AccessStrategy::Index).unwrap();
        assert_eq!(indexed.len(), 3);
        assert_eq!(
            indexed.get(&1u64),
            Some(&Value::Coll(coll! {"foo" => 1, "bar" => 8}))
        );
    }

    #[test]
    fn test_group_by_stable() {
        let grouped = group_by_field(&people(), &Key::from("foo"), AccessStrategy::Index).unwrap();

        let ones = grouped.get(&1u64).unwrap().as_coll().unwrap();
        assert_eq!(
            values(ones.as_raw()),
            vec![
                Value::Coll(coll! {"foo" => 1, "bar" => 2}),
                Value::Coll(coll! {"foo" => 1, "bar" => 8}),
            ]
        );
    }

    #[test]
    fn test_group_by_covers_every_element() {
        let map = people();
        let grouped = group_by(&map, |v| {
            Key::from(format!("{}", v.as_coll().unwrap().as_raw().get("foo").unwrap()))
        });

        let total: usize = grouped
            .values()
            .map(|g| g.as_coll().unwrap().len())
            .sum();
        assert_eq!(total, map.len());
    }

    #[test]
    fn test_flatten() {
        let map = coll![coll![3, 4, 5], coll![4, 6, 5]].into_raw();
        let flat = flatten(&map).unwrap();
        assert_eq!(flat, coll![3, 4, 5, 4, 6, 5].into_raw());
    }

    #[test]
    fn test_flatten_rejects_scalars() {
        let map = coll![coll![1], 2].into_raw();
        let err = flatten(&map).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "collection",
                got: "int"
            }
        );
    }

    #[test]
    fn test_pluck() {
        let map = coll![
            coll! {"name" => "Bob", "age" => 23},
            coll! {"name" => "Alice", "age" => 32},
        ]
        .into_raw();

        let names = pluck(&map, &Key::from("name"), None, AccessStrategy::Index).unwrap();
        assert_eq!(values(&names), vec!["Bob".into(), "Alice".into()]);

        let by_name = pluck(
            &map,
            &Key::from("age"),
            Some(&Key::from("name")),
            AccessStrategy::Index,
        )
        .unwrap();
        assert_eq!(by_name, coll! {"Bob" => 23, "Alice" => 32}.into_raw());
    }

    #[test]
    fn test_fold_right_reports_original_keys() {
        let map = coll!["foo", "bar", "baz"].into_raw();
        let out = fold_right_with_key(&map, String::new(), |acc, v, k| {
            format!("{acc} {k}:{v}")
        });
        assert_eq!(out, " 2:baz 1:bar 0:foo");
    }

    #[test]
    fn test_min_max_by() {
        let map = people();
        let min = min_by(&map, |v| {
            v.as_coll().unwrap().as_raw().get("bar").unwrap().clone()
        });
        assert_eq!(min, Some(&Value::Coll(coll! {"foo" => 1, "bar" => 2})));

        let max = max_by(&map, |v| {
            v.as_coll().unwrap().as_raw().get("bar").unwrap().clone()
        });
        assert_eq!(max, Some(&Value::Coll(coll! {"foo" => 3, "bar" => 12})));
    }

    #[test]
    fn test_sum_stays_integral_until_float() {
        assert_eq!(sum(five().into_values()), Value::Int(15));
        assert_eq!(
            sum(vec![Value::Int(1), Value::Float(0.5)]),
            Value::Float(1.5)
        );
        assert_eq!(sum(Vec::new()), Value::Int(0));
    }

    #[test]
    fn test_partition_reunites_to_input() {
        let map = five();
        let (pass, fail) = partition(&map, |v, _| v.as_int().unwrap() % 2 == 1);

        assert_eq!(values(&pass), vec![1.into(), 3.into(), 5.into()]);
        assert_eq!(values(&fail), vec![2.into(), 4.into()]);
        assert_eq!(pass.len() + fail.len(), map.len());
        for (k, v) in &map {
            assert_eq!(pass.get(k).or_else(|| fail.get(k)), Some(v));
        }
    }

    #[test]
    fn test_merge_and_reverse_merge() {
        let a = coll! {"a" => 1, "b" => 2}.into_raw();
        let b = coll! {"b" => 3, "c" => 4}.into_raw();

        assert_eq!(merge(&a, &b), coll! {"a" => 1, "b" => 3, "c" => 4}.into_raw());
        assert_eq!(
            reverse_merge(&a, &b),
            coll! {"b" => 2, "c" => 4, "a" => 1}.into_raw()
        );
    }

    #[test]
    fn test_merge_renumbers_integer_keys() {
        let a = coll![1, 2].into_raw();
        let b = coll![3, 4].into_raw();
        assert_eq!(merge(&a, &b), coll![1, 2, 3, 4].into_raw());
    }

    #[test]
    fn test_combine_and_flip() {
        let keys = coll!["a", "b"].into_raw();
        let vals = coll![1, 2].into_raw();
        assert_eq!(
            combine(&keys, &vals).unwrap(),
            coll! {"a" => 1, "b" => 2}.into_raw()
        );
        assert!(combine(&keys, &coll![1].into_raw()).is_err());

        let flipped = flip(&coll! {"a" => 1, "b" => 2}.into_raw()).unwrap();
        assert_eq!(flipped, coll! {1usize => "a", 2usize => "b"}.into_raw());
    }

    #[test]
    fn test_zip_with_sums() {
        let a = coll![1, 2, 3].into_raw();
        let b = coll![4, 5, 6].into_raw();
        let summed = zip_with(&a, &b, |x, y| {
            Value::Int(x.as_int().unwrap() + y.as_int().unwrap())
        });
        assert_eq!(summed, coll![5, 7, 9].into_raw());
    }

    #[test]
    fn test_zip_pads_with_null() {
        let a = coll![1, 2, 3].into_raw();
        let b = coll![4].into_raw();
        let zipped = zip(&a, &b);

        assert_eq!(zipped.len(), 3);
        let last = zipped.get_index(2).unwrap().1.as_coll().unwrap();
        assert_eq!(values(last.as_raw()), vec![Value::Int(3), Value::Null]);
    }

    #[test]
    fn test_sort_by_callback_and_field() {
        let sorted_desc = sort_by(
            &people(),
            |v, _| Value::Int(-v.as_coll().unwrap().as_raw().get("bar").unwrap().as_int().unwrap()),
            SortMode::Regular,
        );
        let first = sorted_desc.get_index(0).unwrap().1;
        assert_eq!(first, &Value::Coll(coll! {"foo" => 3, "bar" => 12}));

        let by_field =
            sort_by_field(&people(), &Key::from("bar"), AccessStrategy::Index, SortMode::Regular)
                .unwrap();
        let bars: Vec<i64> = by_field
            .values()
            .map(|v| v.as_coll().unwrap().as_raw().get("bar").unwrap().as_int().unwrap())
            .collect();
        assert_eq!(bars, vec![2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn test_sort_by_composite_key_is_stable() {
        // Sorting by (foo, bar) pairs: equal foo ties break by bar because
        // the composite key covers it, and stability keeps insert order
        // otherwise.
        let sorted = sort_by(
            &people(),
            |v, _| {
                let row = v.as_coll().unwrap();
                Value::Coll(Collection::from_values([
                    row.as_raw().get("foo").unwrap().clone(),
                    row.as_raw().get("bar").unwrap().clone(),
                ]))
            },
            SortMode::Regular,
        );

        let pairs: Vec<(i64, i64)> = sorted
            .values()
            .map(|v| {
                let row = v.as_coll().unwrap().as_raw();
                (
                    row.get("foo").unwrap().as_int().unwrap(),
                    row.get("bar").unwrap().as_int().unwrap(),
                )
            })
            .collect();
        assert_eq!(pairs, vec![(1, 2), (1, 8), (2, 4), (2, 10), (3, 6), (3, 12)]);
    }

    #[test]
    fn test_sorted_idempotent() {
        let once = sorted(&coll![3, 1, 2].into_raw(), false, SortMode::Regular);
        let twice = sorted(&once, false, SortMode::Regular);
        assert_eq!(once, twice);
        assert_eq!(values(&once), vec![1.into(), 2.into(), 3.into()]);
    }

    #[test]
    fn test_sorted_preserve_keys() {
        let map = coll! {5usize => 1, 4usize => 2, 3usize => 3}.into_raw();
        let kept = sorted(&map, true, SortMode::Regular);
        let keys: Vec<Key> = kept.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Int(5), Key::Int(4), Key::Int(3)]);
    }

    #[test]
    fn test_unique_idempotent() {
        let map = coll![1, 2, 1, 3, 2].into_raw();
        let once = unique(&map);
        assert_eq!(values(&once), vec![1.into(), 2.into(), 3.into()]);
        assert_eq!(unique(&once), once);
    }

    #[test]
    fn test_sample_bounds() {
        let map = five();
        let sampled = sample(&map, 3).unwrap();
        assert_eq!(sampled.len(), 3);
        // Original keys and order survive sampling.
        let indices: Vec<u64> = sampled.keys().map(|k| k.as_int().unwrap()).collect();
        let mut sorted_indices = indices.clone();
        sorted_indices.sort();
        assert_eq!(indices, sorted_indices);

        assert!(sample(&map, 6).is_err());
        assert!(sample_one(&RawMap::new()).is_err());
    }

    #[test]
    fn test_repeat_and_chunk() {
        let map = coll![1, 2, 3].into_raw();
        assert_eq!(repeat(&map, 3).len(), 9);
        assert_eq!(repeat(&map, 0), RawMap::new());

        let chunks = chunk(&coll![1, 2, 3, 4, 5, 6].into_raw(), 2).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks.get_index(1).unwrap().1,
            &Value::Coll(coll![3, 4])
        );
        assert!(chunk(&map, 0).is_err());
    }

    #[test]
    fn test_reverse_reindexes_unless_preserving() {
        let map = coll! {0usize => "a", "k" => "v", 1usize => "b"}.into_raw();

        let reindexed = reverse(&map, false);
        assert_eq!(
            reindexed,
            coll! {0usize => "b", "k" => "v", 1usize => "a"}.into_raw()
        );
        assert_eq!(
            reindexed.keys().collect::<Vec<_>>(),
            vec![&Key::Int(0), &Key::from("k"), &Key::Int(1)]
        );

        let preserved = reverse(&map, true);
        assert_eq!(
            preserved.keys().collect::<Vec<_>>(),
            vec![&Key::Int(1), &Key::from("k"), &Key::Int(0)]
        );
    }

    #[test]
    fn test_slice_offset_and_length() {
        let map = coll!["a", "b", "c", "d", "e"].into_raw();

        assert_eq!(slice(&map, 1, Some(2), false), coll!["b", "c"].into_raw());
        assert_eq!(slice(&map, 2, None, false), coll!["c", "d", "e"].into_raw());
        assert_eq!(slice(&map, -2, None, false), coll!["d", "e"].into_raw());
        assert_eq!(slice(&map, 10, Some(3), false), RawMap::new());

        // Preserving keeps the original integer keys
        let preserved = slice(&map, 1, Some(2), true);
        assert_eq!(
            preserved.keys().collect::<Vec<_>>(),
            vec![&Key::Int(1), &Key::Int(2)]
        );
    }

    #[test]
    fn test_slice_keeps_string_keys() {
        let map = coll! {0usize => 1, "k" => 2, 1usize => 3}.into_raw();
        let sliced = slice(&map, 1, None, false);
        assert_eq!(sliced, coll! {"k" => 2, 0usize => 3}.into_raw());
    }

    #[test]
    fn test_spliced_replace_remove_insert() {
        let map = coll![1, 2, 3, 4].into_raw();

        // Replace a middle run
        let replaced = spliced(&map, 1, Some(2), &coll!["x", "y", "z"].into_raw());
        assert_eq!(replaced, coll![1, "x", "y", "z", 4].into_raw());

        // Remove without replacing
        let removed = spliced(&map, 1, Some(2), &RawMap::new());
        assert_eq!(removed, coll![1, 4].into_raw());

        // Zero-length splice inserts
        let inserted = spliced(&map, 2, Some(0), &coll!["x"].into_raw());
        assert_eq!(inserted, coll![1, 2, "x", 3, 4].into_raw());

        // Negative offset counts from the end; None removes to the end
        let tail = spliced(&map, -1, None, &coll!["x"].into_raw());
        assert_eq!(tail, coll![1, 2, 3, "x"].into_raw());
    }
}
