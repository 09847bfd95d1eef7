use compare::Compare;

use crate::index::{IndexType, NodeIndex};
use crate::map::RbMap;
use crate::node::Node;
use crate::tree::Slot;

/// A view into a single entry in a map, which may either be vacant or occupied.
#[derive(Debug)]
pub enum Entry<'a, K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C, Ix>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C, Ix>),
}

/// A view into an occupied entry in a `RbMap`.
/// It is part of the [`Entry`] enum.
#[derive(Debug)]
pub struct OccupiedEntry<'a, K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    /// Reference to the map
    pub(crate) map_ref: &'a mut RbMap<K, V, C, Ix>,
    /// The entry node
    pub(crate) node_idx: NodeIndex<Ix>,
}

/// A view into a vacant entry in a `RbMap`.
/// It is part of the [`Entry`] enum.
#[derive(Debug)]
pub struct VacantEntry<'a, K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    /// Mutable reference to the map
    pub(crate) map_ref: &'a mut RbMap<K, V, C, Ix>,
    /// The key of this entry
    pub(crate) key: K,
    /// Where the key will be linked
    pub(crate) slot: Slot<Ix>,
}

impl<'a, K, V, C, Ix> Entry<'a, K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::{Entry, RbMap};
    ///
    /// let mut map = RbMap::new();
    /// assert!(matches!(map.entry(1), Entry::Vacant(_)));
    /// map.entry(1).or_insert(3);
    /// assert!(matches!(map.entry(1), Entry::Occupied(_)));
    /// assert_eq!(map.get(&1), Some(&3));
    /// ```
    #[inline]
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Like [`or_insert`](Self::or_insert), computing the value only when the
    /// entry is vacant.
    #[inline]
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::{Entry, RbMap};
    ///
    /// let mut map = RbMap::new();
    ///
    /// map.insert("a", 3);
    /// assert!(matches!(map.entry("a"), Entry::Occupied(_)));
    /// map.entry("a").and_modify(|v| *v += 1);
    /// assert_eq!(map.get(&"a"), Some(&4));
    /// ```
    #[inline]
    #[must_use]
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Self::Occupied(entry)
            }
            Entry::Vacant(entry) => Self::Vacant(entry),
        }
    }

    /// The key of this entry.
    #[inline]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V, C, Ix> Entry<'a, K, V, C, Ix>
where
    V: Default,
    C: Compare<K>,
    Ix: IndexType,
{
    /// Ensures a value is in the entry by inserting `V::default()` if empty.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_map::RbMap;
    ///
    /// let mut map: RbMap<&str, u32> = RbMap::new();
    /// *map.entry("x").or_default() += 2;
    /// *map.entry("x").or_default() += 2;
    /// assert_eq!(map.get(&"x"), Some(&4));
    /// ```
    #[inline]
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

impl<'a, K, V, C, Ix> OccupiedEntry<'a, K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    #[inline]
    pub fn key(&self) -> &K {
        &self.map_ref.tree.node_ref(self.node_idx, Node::value).0
    }

    /// Handle of the entry's element.
    #[inline]
    pub fn index(&self) -> NodeIndex<Ix> {
        self.node_idx
    }

    #[inline]
    pub fn get(&self) -> &V {
        &self.map_ref.tree.node_ref(self.node_idx, Node::value).1
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.map_ref.tree.node_mut(self.node_idx, Node::value_mut).1
    }

    /// Converts the entry into a mutable reference bound to the map.
    #[inline]
    pub fn into_mut(self) -> &'a mut V {
        &mut self.map_ref.tree.node_mut(self.node_idx, Node::value_mut).1
    }

    /// Replace the value of the entry, returning the old one.
    #[inline]
    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }

    /// Take the entry out of the map.
    #[inline]
    pub fn remove_entry(self) -> Option<(K, V)> {
        self.map_ref.tree.remove_at(self.node_idx)
    }

    /// Take the value out of the map.
    #[inline]
    pub fn remove(self) -> Option<V> {
        self.remove_entry().map(|(_, v)| v)
    }
}

impl<'a, K, V, C, Ix> VacantEntry<'a, K, V, C, Ix>
where
    C: Compare<K>,
    Ix: IndexType,
{
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Insert the value under the entry's key and return a mutable
    /// reference to it.
    #[inline]
    pub fn insert(self, value: V) -> &'a mut V {
        let map_ref = self.map_ref;
        let node_idx = map_ref.tree.insert_at(self.slot, (self.key, value));
        &mut map_ref.tree.node_mut(node_idx, Node::value_mut).1
    }
}
