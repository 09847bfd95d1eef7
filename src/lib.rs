//! `rb_ordered_map` is an ordered, unique-key container based on a red-black tree.
//!
//! It fully implements the insertion and deletion functionality of a red-black tree,
//! so each modification needs at most O(log N) comparisons and a constant number of
//! rotations.
//!
//! Nodes are stored in an arena and linked by indices instead of pointers. Slot 0 of
//! the arena is a sentinel: its left link is the root, the root's parent is the
//! sentinel, and its handle is the past-the-end position. The first position after
//! the end is the smallest element and the position before it is the largest, so
//! bidirectional walks wrap around through the end. Handles of other elements never
//! move while the tree is modified, which keeps them valid until their own element is
//! erased. Since there are no raw pointers the tree is `Send` and `Unpin` whenever its
//! values are.
//!
//! [`RbTree`] is the engine: it stores values, extracts keys from them with a
//! [`KeyOfValue`] and orders keys with a [`compare::Compare`]. [`RbMap`] wraps it
//! for `(key, value)` pairs. Both default to [`compare::Natural`], the order of
//! `Ord`.
//!
//! # Example
//!
//! ```rust
//! use rb_ordered_map::RbMap;
//!
//! let mut map = RbMap::new();
//! map.insert(3, "c");
//! map.insert(1, "a");
//! map.insert(2, "b");
//! assert_eq!(map.get(&2), Some(&"b"));
//! let keys: Vec<_> = map.keys().copied().collect();
//! assert_eq!(keys, vec![1, 2, 3]);
//! ```
//!

mod entry;
mod error;
mod index;
mod iter;
mod key;
pub mod map;
mod node;
mod tree;

#[cfg(feature = "graphviz")]
mod graphviz;

#[cfg(test)]
mod tests;

pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::{Error, Result};
pub use index::{DefaultIx, IndexType, NodeIndex};
pub use iter::{Cursor, IntoIter, Iter};
pub use key::{Identity, KeyOfValue, SelectFirst, ValueCompare};
pub use map::RbMap;
pub use tree::RbTree;
