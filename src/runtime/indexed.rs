//! Adaptive storage for integer-keyed properties
//!
//! [`IndexedMap`] maps integer keys in `0..MAX_LENGTH` to values and picks a
//! backing representation from the occupancy of the key space:
//!
//! - `Empty`: nothing has been stored yet.
//! - `Dense`: a growable vector of optional slots, holes are `None`.
//! - `Sparse`: an ordered map from key to value.
//!
//! Dense storage switches to sparse when the would-be capacity grows past
//! [`MIN_SPARSE_LENGTH`] while fewer than one in [`SPARSE_DENSE_RATIO`]
//! slots are occupied. Keys above the dense ceiling always go sparse. Sparse
//! storage only returns to dense through [`IndexedMap::make_dense`].
//! The representation is never observable through the map's API.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// Exclusive upper bound of integer keys, `2^53 - 1`
pub const MAX_LENGTH: u64 = 0x1F_FFFF_FFFF_FFFF;

/// Largest key that may still be stored densely
pub const MAX_DENSE_LENGTH: u64 = 0x7FFF_FFFF >> 4;

/// Capacity above which dense storage may switch to sparse
pub const MIN_SPARSE_LENGTH: u64 = 32;

/// Dense storage needs at least one occupied slot in this many
pub const SPARSE_DENSE_RATIO: u64 = 8;

const COMPACT_THRESHOLD: usize = 32;
const COMPACT_RATIO: usize = 4;
const MIN_CAPACITY: usize = 8;

/// Check whether `index` is a valid integer key
#[inline]
pub fn is_index(index: u64) -> bool {
    index < MAX_LENGTH
}

/// Parse a canonical integer key ("0", "17", never "017" or "+1")
pub fn parse_index(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || bytes.len() > 16 {
        return None;
    }
    if bytes[0] == b'0' {
        return if bytes.len() == 1 { Some(0) } else { None };
    }
    let mut value: u64 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u64::from(b - b'0');
    }
    if is_index(value) {
        Some(value)
    } else {
        None
    }
}

fn next_capacity(min_index: usize) -> usize {
    let highest_one_bit = if min_index == 0 {
        0
    } else {
        1usize << (usize::BITS - 1 - min_index.leading_zeros())
    };
    (highest_one_bit << 1).max(MIN_CAPACITY)
}

/// Representation tag, exposed for diagnostics and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Empty,
    Dense,
    Sparse,
}

struct DenseElements<V> {
    slots: Vec<Option<V>>,
    count: usize,
}

impl<V> DenseElements<V> {
    fn with_index(index: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(next_capacity(index), || None);
        DenseElements { slots, count: 0 }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Last occupied slot + 1
    fn length(&self) -> usize {
        self.slots
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1)
    }

    fn put(&mut self, index: usize, value: V) {
        if index >= self.slots.len() {
            let capacity = next_capacity(index);
            self.slots.resize_with(capacity, || None);
        }
        if self.slots[index].replace(value).is_none() {
            self.count += 1;
        }
    }

    fn remove(&mut self, index: usize) -> Option<V> {
        let removed = self.slots.get_mut(index).and_then(Option::take);
        if removed.is_some() {
            self.count -= 1;
        }
        removed
    }

    /// Drop trailing holes when they make up more than a quarter of a long array.
    /// Returns true if the backing vector shrank.
    fn remove_trailing_holes(&mut self) -> bool {
        let len = self.slots.len();
        if len <= COMPACT_THRESHOLD {
            return false;
        }
        let used = self.length();
        let trailing = len - used;
        if trailing * COMPACT_RATIO > len {
            self.slots.truncate(used.max(MIN_CAPACITY));
            self.slots.shrink_to_fit();
            true
        } else {
            false
        }
    }

    fn into_sparse(self) -> BTreeMap<u64, V> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|v| (i as u64, v)))
            .collect()
    }
}

enum Elements<V> {
    Empty,
    Dense(DenseElements<V>),
    Sparse(BTreeMap<u64, V>),
}

impl<V> Elements<V> {
    fn count(&self) -> usize {
        match self {
            Elements::Empty => 0,
            Elements::Dense(dense) => dense.count,
            Elements::Sparse(map) => map.len(),
        }
    }

    fn length(&self) -> u64 {
        match self {
            Elements::Empty => 0,
            Elements::Dense(dense) => dense.length() as u64,
            Elements::Sparse(map) => map.keys().next_back().map_or(0, |&last| last + 1),
        }
    }

    fn get(&self, index: u64) -> Option<&V> {
        match self {
            Elements::Empty => None,
            Elements::Dense(dense) => dense.slots.get(index as usize).and_then(Option::as_ref),
            Elements::Sparse(map) => map.get(&index),
        }
    }

    fn get_mut(&mut self, index: u64) -> Option<&mut V> {
        match self {
            Elements::Empty => None,
            Elements::Dense(dense) => dense.slots.get_mut(index as usize).and_then(Option::as_mut),
            Elements::Sparse(map) => map.get_mut(&index),
        }
    }

    fn remove(&mut self, index: u64) -> Option<V> {
        match self {
            Elements::Empty => None,
            Elements::Dense(dense) => usize::try_from(index).ok().and_then(|i| dense.remove(i)),
            Elements::Sparse(map) => map.remove(&index),
        }
    }
}

/// Adaptive map from integer keys to values
pub struct IndexedMap<V> {
    length: u64,
    elements: Elements<V>,
}

impl<V> Default for IndexedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IndexedMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        IndexedMap {
            length: 0,
            elements: Elements::Empty,
        }
    }

    /// Create an empty map whose length is already widened to `length`
    pub fn with_length(length: u64) -> Self {
        assert!(length <= MAX_LENGTH, "length {} out of range", length);
        IndexedMap {
            length,
            elements: Elements::Empty,
        }
    }

    /// Last stored key + 1, or the explicitly widened length
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Number of stored entries
    pub fn count(&self) -> usize {
        self.elements.count()
    }

    /// Check whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Current backing representation
    pub fn representation(&self) -> Representation {
        match self.elements {
            Elements::Empty => Representation::Empty,
            Elements::Dense(_) => Representation::Dense,
            Elements::Sparse(_) => Representation::Sparse,
        }
    }

    /// Check whether the map uses sparse storage
    pub fn is_sparse(&self) -> bool {
        self.representation() == Representation::Sparse
    }

    /// Check whether some key below `length` has no entry
    pub fn has_holes(&self) -> bool {
        (self.count() as u64) < self.length
    }

    /// Check whether `index` has an entry
    pub fn has(&self, index: u64) -> bool {
        self.get(index).is_some()
    }

    /// Value stored at `index`
    pub fn get(&self, index: u64) -> Option<&V> {
        if index < self.length {
            self.elements.get(index)
        } else {
            None
        }
    }

    /// Mutable access to the value stored at `index`
    pub fn get_mut(&mut self, index: u64) -> Option<&mut V> {
        if index < self.length {
            self.elements.get_mut(index)
        } else {
            None
        }
    }

    /// Store `value` at `index`, returning the previous value.
    ///
    /// Panics if `index` is not below [`MAX_LENGTH`].
    pub fn put(&mut self, index: u64, value: V) -> Option<V> {
        assert!(is_index(index), "index {} out of range", index);
        if index <= MAX_DENSE_LENGTH {
            self.small_put(index, value)
        } else {
            self.large_put(index, value)
        }
    }

    fn small_put(&mut self, index: u64, value: V) -> Option<V> {
        if let Elements::Empty = self.elements {
            self.elements = if index < MIN_SPARSE_LENGTH {
                Elements::Dense(DenseElements::with_index(index as usize))
            } else {
                Elements::Sparse(BTreeMap::new())
            };
        }
        if index >= self.length {
            let new_length = index + 1;
            let count = self.elements.count() as u64;
            if matches!(self.elements, Elements::Dense(_))
                && new_length > MIN_SPARSE_LENGTH
                && count * SPARSE_DENSE_RATIO < new_length
            {
                self.to_sparse_or_shrink();
            }
            self.length = self.length.max(new_length);
        }
        self.raw_put(index, value)
    }

    fn large_put(&mut self, index: u64, value: V) -> Option<V> {
        self.to_sparse();
        self.length = self.length.max(index + 1);
        self.raw_put(index, value)
    }

    fn raw_put(&mut self, index: u64, value: V) -> Option<V> {
        match &mut self.elements {
            Elements::Dense(dense) => {
                let i = index as usize;
                let previous = dense.slots.get_mut(i).and_then(Option::take);
                if previous.is_some() {
                    dense.count -= 1;
                }
                dense.put(i, value);
                previous
            }
            Elements::Sparse(map) => map.insert(index, value),
            Elements::Empty => unreachable!("elements are allocated before the first put"),
        }
    }

    /// Delete the entry at `index` and recompute the length
    pub fn remove(&mut self, index: u64) -> Option<V> {
        let removed = self.remove_unchecked(index);
        if removed.is_some() {
            self.update_length();
        }
        removed
    }

    /// Delete the entry at `index` and keep the current length
    pub fn remove_unchecked(&mut self, index: u64) -> Option<V> {
        if index < self.length {
            self.elements.remove(index)
        } else {
            None
        }
    }

    /// Delete every entry in `from..to`, keeping the current length
    pub fn remove_range(&mut self, from: u64, to: u64) {
        let keys: Vec<u64> = self.indices(from, to).collect();
        for key in keys {
            self.elements.remove(key);
        }
    }

    /// Widen or truncate the length. Truncation deletes entries at or above `length`.
    pub fn set_length(&mut self, length: u64) {
        assert!(length <= MAX_LENGTH, "length {} out of range", length);
        if length < self.length {
            self.remove_range(length, self.length);
            self.length = length;
            self.update_representation();
        } else {
            self.length = length;
        }
    }

    fn update_length(&mut self) {
        self.update_representation();
        self.length = self.elements.length();
    }

    fn update_representation(&mut self) {
        if let Elements::Dense(dense) = &self.elements {
            let capacity = dense.capacity() as u64;
            let count = dense.count as u64;
            if capacity > MIN_SPARSE_LENGTH && count * SPARSE_DENSE_RATIO < capacity {
                self.to_sparse_or_shrink();
            }
        }
    }

    fn to_sparse_or_shrink(&mut self) {
        let Elements::Dense(dense) = &mut self.elements else {
            return;
        };
        if dense.remove_trailing_holes() {
            let capacity = dense.capacity() as u64;
            let count = dense.count as u64;
            if !(capacity > MIN_SPARSE_LENGTH && count * SPARSE_DENSE_RATIO < capacity) {
                trace!(capacity, count, "indexed storage shrunk");
                return;
            }
        }
        self.to_sparse();
    }

    fn to_sparse(&mut self) {
        let elements = std::mem::replace(&mut self.elements, Elements::Empty);
        self.elements = match elements {
            Elements::Empty => Elements::Sparse(BTreeMap::new()),
            Elements::Dense(dense) => {
                trace!(count = dense.count, "indexed storage switched to sparse");
                Elements::Sparse(dense.into_sparse())
            }
            sparse @ Elements::Sparse(_) => sparse,
        };
    }

    /// Rebuild sparse storage as dense storage.
    ///
    /// Returns false if the stored keys do not fit dense storage.
    pub fn make_dense(&mut self) -> bool {
        let Elements::Sparse(map) = &self.elements else {
            return true;
        };
        let length = map.keys().next_back().map_or(0, |&last| last + 1);
        if length > MAX_DENSE_LENGTH + 1 {
            return false;
        }
        let Elements::Sparse(map) = std::mem::replace(&mut self.elements, Elements::Empty) else {
            unreachable!()
        };
        let mut dense = DenseElements::with_index(length.saturating_sub(1) as usize);
        for (index, value) in map {
            dense.put(index as usize, value);
        }
        trace!(count = dense.count, "indexed storage switched to dense");
        self.elements = Elements::Dense(dense);
        true
    }

    /// Iterate all entries in ascending key order
    pub fn iter(&self) -> Iter<'_, V> {
        self.range(0, self.length)
    }

    /// Iterate the entries with keys in `from..to`.
    /// Reverse the iterator for descending order.
    ///
    /// Panics if `from > to`.
    pub fn range(&self, from: u64, to: u64) -> Iter<'_, V> {
        assert!(from <= to, "invalid range {}..{}", from, to);
        let to = to.min(self.length);
        if from >= to {
            return Iter { inner: IterInner::Empty };
        }
        let inner = match &self.elements {
            Elements::Empty => IterInner::Empty,
            Elements::Dense(dense) => {
                let end = (to as usize).min(dense.slots.len());
                let start = (from as usize).min(end);
                IterInner::Dense {
                    slots: &dense.slots,
                    front: start,
                    back: end,
                }
            }
            Elements::Sparse(map) => IterInner::Sparse(map.range(from..to)),
        };
        Iter { inner }
    }

    /// Keys with entries in `from..to`, ascending
    pub fn indices(&self, from: u64, to: u64) -> impl DoubleEndedIterator<Item = u64> + '_ {
        self.range(from, to).map(|(index, _)| index)
    }

    /// All keys with entries, ascending
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = u64> + '_ {
        self.iter().map(|(index, _)| index)
    }

    /// All values, in ascending key order
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }
}

impl<V: fmt::Debug> fmt::Debug for IndexedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedMap")
            .field("length", &self.length)
            .field("representation", &self.representation())
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, V>(&'a IndexedMap<V>);

impl<V: fmt::Debug> fmt::Debug for DebugEntries<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// Ordered iterator over `(key, value)` entries
pub struct Iter<'a, V> {
    inner: IterInner<'a, V>,
}

enum IterInner<'a, V> {
    Empty,
    Dense {
        slots: &'a [Option<V>],
        front: usize,
        back: usize,
    },
    Sparse(btree_map::Range<'a, u64, V>),
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Empty => None,
            IterInner::Dense { slots, front, back } => {
                let slots: &'a [Option<V>] = *slots;
                while *front < *back {
                    let index = *front;
                    *front += 1;
                    if let Some(value) = &slots[index] {
                        return Some((index as u64, value));
                    }
                }
                None
            }
            IterInner::Sparse(range) => range.next().map(|(&k, v)| (k, v)),
        }
    }
}

impl<'a, V> DoubleEndedIterator for Iter<'a, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Empty => None,
            IterInner::Dense { slots, front, back } => {
                let slots: &'a [Option<V>] = *slots;
                while *front < *back {
                    *back -= 1;
                    if let Some(value) = &slots[*back] {
                        return Some((*back as u64, value));
                    }
                }
                None
            }
            IterInner::Sparse(range) => range.next_back().map(|(&k, v)| (k, v)),
        }
    }
}
