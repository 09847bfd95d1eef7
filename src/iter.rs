use std::fmt::Debug;
use std::iter::FusedIterator;

use crate::index::{IndexType, NodeIndex};
use crate::key::KeyOfValue;
use crate::node::Node;
use crate::tree::RbTree;

/// A double-ended iterator over the values of a `RbTree`, in key order.
///
/// Walks the half-open handle range `[front, back)` with successor and
/// predecessor links, so no stack is kept.
pub struct Iter<'a, V, KoV, C, Ix> {
    /// Reference to the tree
    tree_ref: &'a RbTree<V, KoV, C, Ix>,
    /// Next handle to yield from the front
    front: NodeIndex<Ix>,
    /// One past the next handle to yield from the back
    back: NodeIndex<Ix>,
    /// Upper bound on the elements left
    remaining: usize,
}

impl<'a, V, KoV, C, Ix> Iter<'a, V, KoV, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(
        tree_ref: &'a RbTree<V, KoV, C, Ix>,
        front: NodeIndex<Ix>,
        back: NodeIndex<Ix>,
        remaining: usize,
    ) -> Self {
        Iter {
            tree_ref,
            front,
            back,
            remaining,
        }
    }
}

impl<V, KoV, C, Ix: IndexType> Clone for Iter<'_, V, KoV, C, Ix> {
    fn clone(&self) -> Self {
        Iter {
            tree_ref: self.tree_ref,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<V, KoV, C, Ix> Debug for Iter<'_, V, KoV, C, Ix>
where
    V: Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, V, KoV, C, Ix> Iterator for Iter<'a, V, KoV, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back || self.front.is_sentinel() {
            return None;
        }
        let x = self.front;
        self.front = self.tree_ref.successor(x);
        self.remaining = self.remaining.saturating_sub(1);
        self.tree_ref.get_at(x)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.front == self.back || self.front.is_sentinel() {
            (0, Some(0))
        } else {
            (1, Some(self.remaining))
        }
    }
}

impl<V, KoV, C, Ix> DoubleEndedIterator for Iter<'_, V, KoV, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let x = self.tree_ref.predecessor(self.back);
        if x.is_sentinel() {
            return None;
        }
        self.back = x;
        self.remaining = self.remaining.saturating_sub(1);
        self.tree_ref.get_at(x)
    }
}

impl<V, KoV, C, Ix> FusedIterator for Iter<'_, V, KoV, C, Ix> where Ix: IndexType {}

/// An owning iterator over the values of a `RbTree`, in key order.
pub struct IntoIter<V, KoV, C, Ix> {
    tree: RbTree<V, KoV, C, Ix>,
    front: NodeIndex<Ix>,
    back: NodeIndex<Ix>,
}

impl<V, KoV, C, Ix> IntoIter<V, KoV, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree: RbTree<V, KoV, C, Ix>) -> Self {
        IntoIter {
            front: tree.begin(),
            back: tree.end(),
            tree,
        }
    }

    /// Values are taken out of their nodes but links are left alone, so the
    /// successor walk stays valid.
    fn take(&mut self, x: NodeIndex<Ix>) -> Option<V> {
        self.tree.len = self.tree.len.saturating_sub(1);
        self.tree.node_mut(x, Node::take_value)
    }
}

impl<V, KoV, C, Ix> Debug for IntoIter<V, KoV, C, Ix> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntoIter").finish_non_exhaustive()
    }
}

impl<V, KoV, C, Ix> Iterator for IntoIter<V, KoV, C, Ix>
where
    Ix: IndexType,
{
    type Item = V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back || self.front.is_sentinel() {
            return None;
        }
        let x = self.front;
        self.front = self.tree.successor(x);
        self.take(x)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len, Some(self.tree.len))
    }
}

impl<V, KoV, C, Ix> DoubleEndedIterator for IntoIter<V, KoV, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let x = self.tree.predecessor(self.back);
        if x.is_sentinel() {
            return None;
        }
        self.back = x;
        self.take(x)
    }
}

impl<V, KoV, C, Ix> ExactSizeIterator for IntoIter<V, KoV, C, Ix> where Ix: IndexType {}

impl<V, KoV, C, Ix> FusedIterator for IntoIter<V, KoV, C, Ix> where Ix: IndexType {}

/// A bidirectional position in a `RbTree`.
///
/// Besides the elements there is one extra position, the end, which sits
/// between the last and the first element. Moving forward from the end lands
/// on the first element and moving backward lands on the last one.
pub struct Cursor<'a, V, KoV, C, Ix> {
    tree_ref: &'a RbTree<V, KoV, C, Ix>,
    current: NodeIndex<Ix>,
}

impl<V, KoV, C, Ix: IndexType> Clone for Cursor<'_, V, KoV, C, Ix> {
    fn clone(&self) -> Self {
        Cursor {
            tree_ref: self.tree_ref,
            current: self.current,
        }
    }
}

impl<V, KoV, C, Ix> Debug for Cursor<'_, V, KoV, C, Ix>
where
    V: Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, V, KoV, C, Ix> Cursor<'a, V, KoV, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree_ref: &'a RbTree<V, KoV, C, Ix>, current: NodeIndex<Ix>) -> Self {
        Cursor { tree_ref, current }
    }

    /// The handle the cursor points at.
    #[inline]
    pub fn index(&self) -> NodeIndex<Ix> {
        self.current
    }

    /// Returns `true` when the cursor is at the end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.current.is_sentinel()
    }

    /// The value under the cursor, `None` at the end position.
    #[inline]
    pub fn get(&self) -> Option<&'a V> {
        self.tree_ref.get_at(self.current)
    }

    /// Key of the value under the cursor.
    #[inline]
    pub fn key(&self) -> Option<&'a KoV::Key>
    where
        KoV: KeyOfValue<V>,
    {
        let key_of = self.tree_ref.key_of();
        self.get().map(|v| key_of.key(v))
    }

    #[inline]
    pub fn move_next(&mut self) {
        self.current = self.tree_ref.successor(self.current);
    }

    #[inline]
    pub fn move_prev(&mut self) {
        self.current = self.tree_ref.predecessor(self.current);
    }

    /// The value after the cursor, without moving it.
    #[inline]
    pub fn peek_next(&self) -> Option<&'a V> {
        self.tree_ref.get_at(self.tree_ref.successor(self.current))
    }

    /// The value before the cursor, without moving it.
    #[inline]
    pub fn peek_prev(&self) -> Option<&'a V> {
        self.tree_ref.get_at(self.tree_ref.predecessor(self.current))
    }
}
