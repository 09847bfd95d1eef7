//! An ordered map on top of [`RbTree`].
//!
//! `RbMap` stores `(key, value)` pairs in a red-black tree keyed by the first
//! element. Keys are unique: inserting an existing key keeps the stored value.
//! Positions are exposed as [`NodeIndex`] handles which stay valid until their
//! own element is erased.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::Index;

use compare::{natural, Compare, Natural};

use crate::entry::{Entry, OccupiedEntry, VacantEntry};
use crate::error::{Error, Result};
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::{self, Cursor};
use crate::key::{SelectFirst, ValueCompare};
use crate::tree::{RbTree, Slot};

/// An ordered key-value map with unique keys.
pub struct RbMap<K, V, C = Natural<K>, Ix = DefaultIx> {
    /// The tree storing the pairs
    pub(crate) tree: RbTree<(K, V), SelectFirst, C, Ix>,
}

impl<K: Ord, V> RbMap<K, V> {
    /// Create an empty `RbMap` ordered by `K: Ord`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }

    /// Creates a new `RbMap` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RbMap {
            tree: RbTree::with_capacity_and_parts(capacity, SelectFirst, natural()),
        }
    }
}

impl<K, V, C, Ix> RbMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    /// Create an empty `RbMap` ordered by `compare`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map: RbMap<i32, &str, _> = RbMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, "one");
    /// map.insert(3, "three");
    /// map.insert(2, "two");
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, vec![3, 2, 1]);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(compare: C) -> Self {
        RbMap {
            tree: RbTree::with_parts(SelectFirst, compare),
        }
    }

    /// Build a map ordered by `compare` from `(key, value)` pairs. Later
    /// duplicates of a key are ignored.
    pub fn from_iter_with_comparator<I>(iter: I, compare: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_comparator(compare);
        map.extend(iter);
        map
    }

    /// Insert a key-value pair unless the key is already present.
    ///
    /// Returns the handle of the element stored under `key` and whether the
    /// pair was inserted. An existing value is never overwritten.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map = RbMap::new();
    /// let (first, inserted) = map.insert(1, "a");
    /// assert!(inserted);
    /// let (again, inserted) = map.insert(1, "b");
    /// assert!(!inserted);
    /// assert_eq!(first, again);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> (NodeIndex<Ix>, bool) {
        self.tree.insert((key, value))
    }

    /// Like [`insert`](Self::insert) but reports allocation failure as an
    /// error, leaving the map untouched.
    #[inline]
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(NodeIndex<Ix>, bool)> {
        self.tree.try_insert((key, value))
    }

    /// Insert with a position hint. The hint is not used, the pair goes to
    /// its ordered position.
    #[inline]
    pub fn insert_with_hint(&mut self, _hint: NodeIndex<Ix>, key: K, value: V) -> NodeIndex<Ix> {
        self.insert(key, value).0
    }

    /// Remove `key`, returning how many elements were removed (0 or 1).
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map = RbMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.erase(&3), 0);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.erase(&2), 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn erase(&mut self, key: &K) -> usize {
        self.tree.erase(key)
    }

    /// Remove `key` from the map, returning its value if it was present.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map = RbMap::new();
    /// map.insert("k", 7);
    /// assert_eq!(map.remove(&"k"), Some(7));
    /// assert_eq!(map.remove(&"k"), None);
    /// ```
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.remove(key).map(|(_, v)| v)
    }

    /// Remove `key`, returning the stored pair.
    #[inline]
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.tree.remove(key)
    }

    /// Remove the element at `handle` and return the handle after it.
    #[inline]
    pub fn erase_at(&mut self, handle: NodeIndex<Ix>) -> NodeIndex<Ix> {
        self.tree.erase_at(handle)
    }

    /// Remove the elements in `[first, last)`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map: RbMap<i32, ()> = (0..10).map(|k| (k, ())).collect();
    /// let (first, last) = (map.lower_bound(&3), map.lower_bound(&7));
    /// map.erase_range(first, last);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, vec![0, 1, 2, 7, 8, 9]);
    /// ```
    #[inline]
    pub fn erase_range(&mut self, first: NodeIndex<Ix>, last: NodeIndex<Ix>) {
        self.tree.erase_range(first, last);
    }

    /// Return reference to the value corresponding to the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map = RbMap::new();
    /// map.insert(1, 1);
    /// map.insert(7, 4);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.get(&7), Some(&4));
    /// assert_eq!(map.get(&5), None);
    /// ```
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(key).map(|(_, v)| v)
    }

    /// Return a mutable reference to the value corresponding to the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map = RbMap::new();
    /// map.insert(3, 0);
    /// map.get_mut(&3).map(|v| *v += 1);
    /// assert_eq!(map.get(&3), Some(&1));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.tree.find(key);
        self.tree.get_at_mut(idx).map(|(_, v)| v)
    }

    /// Return the stored key and value for `key`.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(key).map(|(k, v)| (k, v))
    }

    /// Checked access: the value for `key` or [`Error::KeyNotFound`].
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::{Error, RbMap};
    ///
    /// let mut map = RbMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    /// ```
    #[inline]
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Checked mutable access.
    #[inline]
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Return the value for `key`, inserting `V::default()` first if absent.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map: RbMap<char, usize> = RbMap::new();
    /// for c in "hello".chars() {
    ///     *map.get_or_insert_default(c) += 1;
    /// }
    /// assert_eq!(map.get(&'l'), Some(&2));
    /// assert_eq!(map.len(), 4);
    /// ```
    #[inline]
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Get the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::{Entry, RbMap};
    ///
    /// let mut map = RbMap::new();
    ///
    /// assert!(matches!(map.entry(1), Entry::Vacant(_)));
    /// map.entry(1).or_insert(0);
    /// assert!(matches!(map.entry(1), Entry::Occupied(_)));
    /// map.entry(1).and_modify(|v| *v += 1);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    #[inline]
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, Ix> {
        match self.tree.locate(&key) {
            Slot::Occupied(node_idx) => Entry::Occupied(OccupiedEntry {
                map_ref: self,
                node_idx,
            }),
            slot @ Slot::Vacant { .. } => Entry::Vacant(VacantEntry {
                map_ref: self,
                key,
                slot,
            }),
        }
    }

    /// Returns `true` if the map holds `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Number of elements with `key`, 0 or 1.
    #[inline]
    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    /// Handle of `key`, or [`end`](Self::end).
    #[inline]
    pub fn find(&self, key: &K) -> NodeIndex<Ix> {
        self.tree.find(key)
    }

    /// Handle of the first element whose key is not less than `key`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let map: RbMap<i32, ()> = [10, 20, 30].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.entry_at(map.lower_bound(&20)), Some((&20, &())));
    /// assert_eq!(map.entry_at(map.lower_bound(&21)), Some((&30, &())));
    /// assert_eq!(map.lower_bound(&31), map.end());
    /// ```
    #[inline]
    pub fn lower_bound(&self, key: &K) -> NodeIndex<Ix> {
        self.tree.lower_bound(key)
    }

    /// Handle of the first element whose key is greater than `key`.
    #[inline]
    pub fn upper_bound(&self, key: &K) -> NodeIndex<Ix> {
        self.tree.upper_bound(key)
    }

    /// `(lower_bound(key), upper_bound(key))`, found in one descent.
    #[inline]
    pub fn equal_range(&self, key: &K) -> (NodeIndex<Ix>, NodeIndex<Ix>) {
        self.tree.equal_range(key)
    }

    /// The pair with the smallest key.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.entry_at(self.begin())
    }

    /// The pair with the largest key.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.entry_at(self.rbegin())
    }
}

impl<K, V, C, Ix> RbMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Handle of the first element, or the end handle.
    #[inline]
    pub fn begin(&self) -> NodeIndex<Ix> {
        self.tree.begin()
    }

    /// The past-the-end handle.
    #[inline]
    pub fn end(&self) -> NodeIndex<Ix> {
        self.tree.end()
    }

    /// Handle of the last element, or the end handle.
    #[inline]
    pub fn rbegin(&self) -> NodeIndex<Ix> {
        self.tree.rbegin()
    }

    /// Handle after `handle` in key order.
    #[inline]
    pub fn next(&self, handle: NodeIndex<Ix>) -> NodeIndex<Ix> {
        self.tree.successor(handle)
    }

    /// Handle before `handle` in key order.
    #[inline]
    pub fn prev(&self, handle: NodeIndex<Ix>) -> NodeIndex<Ix> {
        self.tree.predecessor(handle)
    }

    /// The pair at `handle`, `None` for the end handle.
    #[inline]
    pub fn entry_at(&self, handle: NodeIndex<Ix>) -> Option<(&K, &V)> {
        self.tree.get_at(handle).map(|(k, v)| (k, v))
    }

    /// Mutable value at `handle`.
    #[inline]
    pub fn value_at_mut(&mut self, handle: NodeIndex<Ix>) -> Option<&mut V> {
        self.tree.get_at_mut(handle).map(|(_, v)| v)
    }

    /// A cursor over the stored pairs, positioned at `handle`.
    #[inline]
    pub fn cursor(&self, handle: NodeIndex<Ix>) -> Cursor<'_, (K, V), SelectFirst, C, Ix> {
        self.tree.cursor(handle)
    }

    /// Get an iterator over the entries of the map, sorted by key.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, C, Ix> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Iterate the entries in the handle range `[first, last)`.
    #[inline]
    pub fn range_between(&self, first: NodeIndex<Ix>, last: NodeIndex<Ix>) -> Iter<'_, K, V, C, Ix> {
        Iter {
            inner: self.tree.range_between(first, last),
        }
    }

    /// Get an iterator over the keys of the map, in order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V, C, Ix> {
        Keys { inner: self.iter() }
    }

    /// Get an iterator over the values of the map, in key order.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V, C, Ix> {
        Values { inner: self.iter() }
    }

    /// Remove all elements from the map
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange the contents of two maps.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Return the number of elements in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Return `true` if the map contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Upper bound on the number of elements the map can hold.
    #[inline]
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// The key comparator.
    #[inline]
    pub fn key_comp(&self) -> &C {
        self.tree.key_comp()
    }

    /// A comparator over stored `(key, value)` pairs that looks at keys only.
    ///
    /// # Example
    /// ```rust
    /// use compare::Compare;
    /// use rb_ordered_map::RbMap;
    ///
    /// let map: RbMap<i32, &str> = RbMap::new();
    /// assert!(map.value_comp().compares_lt(&(1, "z"), &(2, "a")));
    /// ```
    #[inline]
    pub fn value_comp(&self) -> ValueCompare<C, SelectFirst>
    where
        C: Clone,
    {
        ValueCompare::new(self.tree.key_comp().clone(), SelectFirst)
    }
}

impl<K, V, C, Ix> Default for RbMap<K, V, C, Ix>
where
    C: Compare<K> + Default,
    Ix: IndexType,
{
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C, Ix> Clone for RbMap<K, V, C, Ix>
where
    K: Clone,
    V: Clone,
    C: Clone,
    Ix: IndexType,
{
    fn clone(&self) -> Self {
        RbMap {
            tree: self.tree.clone(),
        }
    }
}

impl<K, V, C, Ix> fmt::Debug for RbMap<K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, Ix> PartialEq for RbMap<K, V, C, Ix>
where
    K: PartialEq,
    V: PartialEq,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C, Ix: IndexType> Eq for RbMap<K, V, C, Ix> {}

impl<K, V, C, Ix> PartialOrd for RbMap<K, V, C, Ix>
where
    K: PartialOrd,
    V: PartialOrd,
    Ix: IndexType,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<K: Ord, V: Ord, C, Ix: IndexType> Ord for RbMap<K, V, C, Ix> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<K: Hash, V: Hash, C, Ix: IndexType> Hash for RbMap<K, V, C, Ix> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<K, V, C, Ix> Index<&K> for RbMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{}", Error::KeyNotFound),
        }
    }
}

impl<K, V, C, Ix> Extend<(K, V)> for RbMap<K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<K, V, C, Ix> FromIterator<(K, V)> for RbMap<K, V, C, Ix>
where
    C: Compare<K> + Default,
    Ix: IndexType,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C, Ix> IntoIterator for RbMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.tree.into_iter(),
        }
    }
}

impl<'a, K, V, C, Ix> IntoIterator for &'a RbMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a `RbMap`.
pub struct Iter<'a, K, V, C, Ix> {
    inner: iter::Iter<'a, (K, V), SelectFirst, C, Ix>,
}

impl<K, V, C, Ix: IndexType> Clone for Iter<'_, K, V, C, Ix> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, Ix: IndexType> fmt::Debug for Iter<'_, K, V, C, Ix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C, Ix: IndexType> Iterator for Iter<'a, K, V, C, Ix> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, Ix: IndexType> DoubleEndedIterator for Iter<'_, K, V, C, Ix> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V, C, Ix: IndexType> FusedIterator for Iter<'_, K, V, C, Ix> {}

/// An owning iterator over the entries of a `RbMap`.
#[derive(Debug)]
pub struct IntoIter<K, V, C, Ix> {
    inner: iter::IntoIter<(K, V), SelectFirst, C, Ix>,
}

impl<K, V, C, Ix: IndexType> Iterator for IntoIter<K, V, C, Ix> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, Ix: IndexType> DoubleEndedIterator for IntoIter<K, V, C, Ix> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V, C, Ix: IndexType> ExactSizeIterator for IntoIter<K, V, C, Ix> {}

impl<K, V, C, Ix: IndexType> FusedIterator for IntoIter<K, V, C, Ix> {}

/// An iterator over the keys of a `RbMap`.
pub struct Keys<'a, K, V, C, Ix> {
    inner: Iter<'a, K, V, C, Ix>,
}

impl<'a, K, V, C, Ix: IndexType> Iterator for Keys<'a, K, V, C, Ix> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K, V, C, Ix: IndexType> DoubleEndedIterator for Keys<'_, K, V, C, Ix> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `RbMap`.
pub struct Values<'a, K, V, C, Ix> {
    inner: Iter<'a, K, V, C, Ix>,
}

impl<'a, K, V, C, Ix: IndexType> Iterator for Values<'a, K, V, C, Ix> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<K, V, C, Ix: IndexType> DoubleEndedIterator for Values<'_, K, V, C, Ix> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}
