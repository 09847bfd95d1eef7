use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use compare::{natural, Compare, Natural};
use log::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::{Cursor, IntoIter, Iter};
use crate::key::{Identity, KeyOfValue};
use crate::node::{Color, Dir, Node};

/// Where a key lives in the tree, or where it would be linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot<Ix> {
    /// A node with an equal key exists.
    Occupied(NodeIndex<Ix>),
    /// The key is absent and belongs in the `dir` child of `parent`.
    Vacant { parent: NodeIndex<Ix>, dir: Dir },
}

/// An ordered, unique-key red-black tree.
///
/// Nodes live in an arena and are addressed by [`NodeIndex`] handles. Slot 0 is
/// the sentinel: its left link is the root and its handle is the end position.
/// Erased slots are recycled by later insertions, other handles never move.
pub struct RbTree<V, KoV = Identity, C = Natural<V>, Ix = DefaultIx> {
    /// Vector that stores nodes, the sentinel first
    pub(crate) nodes: Vec<Node<V, Ix>>,
    /// Recycled slots
    pub(crate) free: Vec<NodeIndex<Ix>>,
    /// Smallest node, the sentinel when empty
    pub(crate) leftmost: NodeIndex<Ix>,
    /// Largest node
    pub(crate) rightmost: Option<NodeIndex<Ix>>,
    /// Number of elements in the tree
    pub(crate) len: usize,
    key_of: KoV,
    compare: C,
}

impl<V, KoV, C, Ix> RbTree<V, KoV, C, Ix>
where
    Ix: IndexType,
{
    /// Creates an empty tree ordering keys extracted by `key_of` with `compare`.
    #[inline]
    #[must_use]
    pub fn with_parts(key_of: KoV, compare: C) -> Self {
        Self::with_capacity_and_parts(0, key_of, compare)
    }

    /// Creates an empty tree with room for `capacity` elements.
    #[inline]
    #[must_use]
    pub fn with_capacity_and_parts(capacity: usize, key_of: KoV, compare: C) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node::vacant());
        RbTree {
            nodes,
            free: Vec::new(),
            leftmost: NodeIndex::sentinel(),
            rightmost: None,
            len: 0,
            key_of,
            compare,
        }
    }

    /// Return the number of elements in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the tree contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Upper bound on the number of elements this tree can ever hold.
    #[inline]
    #[must_use]
    pub fn max_size(&self) -> usize {
        let by_index = <Ix as IndexType>::max().index().saturating_sub(1);
        let by_memory = isize::MAX as usize / mem::size_of::<Node<V, Ix>>().max(1);
        by_index.min(by_memory)
    }

    /// The comparator ordering the keys.
    #[inline]
    pub fn key_comp(&self) -> &C {
        &self.compare
    }

    /// The key extractor.
    #[inline]
    pub fn key_of(&self) -> &KoV {
        &self.key_of
    }

    /// Handle of the smallest element, or [`end`](Self::end) when empty.
    #[inline]
    pub fn begin(&self) -> NodeIndex<Ix> {
        self.leftmost
    }

    /// The past-the-end handle.
    #[inline]
    pub fn end(&self) -> NodeIndex<Ix> {
        NodeIndex::sentinel()
    }

    /// Handle of the largest element, or [`end`](Self::end) when empty.
    #[inline]
    pub fn rbegin(&self) -> NodeIndex<Ix> {
        self.rightmost.unwrap_or_else(NodeIndex::sentinel)
    }

    /// Value stored at `handle`, `None` for the end handle or an erased slot.
    #[inline]
    pub fn get_at(&self, handle: NodeIndex<Ix>) -> Option<&V> {
        self.nodes.get(handle.index()).and_then(Node::value_opt)
    }

    /// Returns `true` when `handle` lies outside the arena, as handles taken
    /// before a [`clear`](Self::clear) may.
    #[inline]
    fn is_out_of_range(&self, handle: NodeIndex<Ix>) -> bool {
        handle.index() >= self.nodes.len()
    }

    /// Mutable value stored at `handle`. Callers must not change the key.
    #[inline]
    pub(crate) fn get_at_mut(&mut self, handle: NodeIndex<Ix>) -> Option<&mut V> {
        self.nodes.get_mut(handle.index()).and_then(Node::value_opt_mut)
    }

    /// Returns `true` when `handle` names a live element of this tree.
    #[inline]
    pub fn contains_handle(&self, handle: NodeIndex<Ix>) -> bool {
        self.nodes
            .get(handle.index())
            .is_some_and(|node| !node.is_vacant())
    }

    /// Next handle in key order. The end handle is followed by the first
    /// element, so a walk from any handle eventually visits every position.
    /// A handle outside the arena is followed by the end handle.
    pub fn successor(&self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        if x.is_sentinel() {
            return self.leftmost;
        }
        if self.is_out_of_range(x) {
            return self.end();
        }
        if let Some(right) = self.node_ref(x, Node::right) {
            return self.tree_minimum(right);
        }
        let mut x = x;
        let mut p = self.node_ref(x, Node::parent);
        while !p.is_sentinel() && self.node_ref(p, Node::right) == Some(x) {
            x = p;
            p = self.node_ref(p, Node::parent);
        }
        p
    }

    /// Previous handle in key order. The end handle is preceded by the last
    /// element and the first element is preceded by the end handle.
    /// A handle outside the arena is preceded by the end handle.
    pub fn predecessor(&self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        if x.is_sentinel() {
            return self.rbegin();
        }
        if self.is_out_of_range(x) {
            return self.end();
        }
        if let Some(left) = self.node_ref(x, Node::left) {
            return self.tree_maximum(left);
        }
        let mut x = x;
        let mut p = self.node_ref(x, Node::parent);
        while !p.is_sentinel() && self.node_ref(p, Node::left) == Some(x) {
            x = p;
            p = self.node_ref(p, Node::parent);
        }
        p
    }

    /// Get an iterator over the values of the tree, sorted by key.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V, KoV, C, Ix> {
        Iter::new(self, self.begin(), self.end(), self.len)
    }

    /// Iterate the half-open handle range `[first, last)`.
    ///
    /// `last` must be reachable from `first` by successive
    /// [`successor`](Self::successor) calls.
    #[inline]
    pub fn range_between(
        &self,
        first: NodeIndex<Ix>,
        last: NodeIndex<Ix>,
    ) -> Iter<'_, V, KoV, C, Ix> {
        Iter::new(self, first, last, self.len)
    }

    /// A cursor positioned at `handle`.
    #[inline]
    pub fn cursor(&self, handle: NodeIndex<Ix>) -> Cursor<'_, V, KoV, C, Ix> {
        Cursor::new(self, handle)
    }

    /// Remove all elements from the tree
    pub fn clear(&mut self) {
        debug!("clearing tree with {} elements", self.len);
        self.nodes.clear();
        self.nodes.push(Node::vacant());
        self.free.clear();
        self.reset_extrema();
        self.len = 0;
    }

    /// Exchange the contents of two trees, comparators included.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        debug!("swapping trees of {} and {} elements", self.len, other.len);
        mem::swap(self, other);
    }

    pub(crate) fn root(&self) -> Option<NodeIndex<Ix>> {
        self.nodes[0].left
    }

    fn reset_extrema(&mut self) {
        self.nodes[0].left = None;
        self.leftmost = NodeIndex::sentinel();
        self.rightmost = None;
    }

    /// Find the node with the smallest key in the subtree of `x`.
    fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while let Some(left) = self.node_ref(x, Node::left) {
            x = left;
        }
        x
    }

    /// Find the node with the largest key in the subtree of `x`.
    fn tree_maximum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while let Some(right) = self.node_ref(x, Node::right) {
            x = right;
        }
        x
    }

    /// Which child slot of its parent `x` occupies. The root is the left
    /// child of the sentinel.
    fn dir_of(&self, x: NodeIndex<Ix>) -> Dir {
        if self.parent_ref(x, Node::left) == Some(x) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// `x` if it is a red node. Absent children count as black.
    fn red_node(&self, x: Option<NodeIndex<Ix>>) -> Option<NodeIndex<Ix>> {
        x.filter(|&x| self.node_ref(x, Node::is_red))
    }

    /// Take a slot for `value`, recycling an erased one when possible.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    fn alloc_node(&mut self, value: V) -> NodeIndex<Ix> {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx.index()] = Node::new(value);
            return idx;
        }
        // check for max capacity, except if we use usize
        assert!(
            <Ix as IndexType>::max().index() == !0
                || self.nodes.len() < <Ix as IndexType>::max().index(),
            "Reached maximum number of nodes"
        );
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node::new(value));
        idx
    }

    /// Fallible [`alloc_node`](Self::alloc_node): nothing is modified on error.
    fn try_alloc_node(&mut self, value: V) -> Result<NodeIndex<Ix>> {
        if self.free.is_empty() {
            if <Ix as IndexType>::max().index() != !0
                && self.nodes.len() >= <Ix as IndexType>::max().index()
            {
                return Err(Error::CapacityExceeded);
            }
            if let Err(err) = self.nodes.try_reserve(1) {
                warn!("node allocation failed with {} elements: {err}", self.len);
                return Err(err.into());
            }
        }
        Ok(self.alloc_node(value))
    }

    /// Release the slot of an unlinked node and hand back its value.
    fn free_node(&mut self, x: NodeIndex<Ix>) -> Option<V> {
        let mut node = mem::replace(&mut self.nodes[x.index()], Node::vacant());
        self.free.push(x);
        node.take_value()
    }

    /// Link the fresh node `z` as the `dir` child of `parent` and rebalance.
    fn link_node(&mut self, z: NodeIndex<Ix>, parent: NodeIndex<Ix>, dir: Dir) {
        self.node_mut(z, Node::set_parent(parent));
        self.node_mut(parent, Node::set_child(dir, Some(z)));
        if parent.is_sentinel() {
            self.leftmost = z;
            self.rightmost = Some(z);
        } else if dir == Dir::Left && parent == self.leftmost {
            self.leftmost = z;
        } else if dir == Dir::Right && Some(parent) == self.rightmost {
            self.rightmost = Some(z);
        }

        self.insert_fixup(z);

        self.len = self.len.wrapping_add(1);
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        loop {
            let p = self.node_ref(z, Node::parent);
            if p.is_sentinel() || self.node_ref(p, Node::is_black) {
                break;
            }
            let g = self.node_ref(p, Node::parent);
            if g.is_sentinel() {
                break;
            }
            let p_dir = self.dir_of(p);
            let uncle = self.node_ref(g, |gn| gn.child(p_dir.opposite()));
            if let Some(u) = self.red_node(uncle) {
                self.node_mut(p, Node::set_color(Color::Black));
                self.node_mut(u, Node::set_color(Color::Black));
                self.node_mut(g, Node::set_color(Color::Red));
                trace!("insert fix-up: red uncle, continuing at {g:?}");
                z = g;
                continue;
            }
            // Inner grandchild: straighten it into the outer shape first.
            let mut top = p;
            if self.dir_of(z) != p_dir {
                self.rotate(p, p_dir);
                top = z;
            }
            self.swap_colors(top, g);
            self.rotate(g, p_dir.opposite());
            break;
        }
        if let Some(root) = self.root() {
            self.node_mut(root, Node::set_color(Color::Black));
            self.node_mut(root, Node::set_parent(NodeIndex::sentinel()));
        }
    }

    /// Unlink the node `z` from the tree and return its value.
    fn remove_node(&mut self, z: NodeIndex<Ix>) -> Option<V> {
        let was_leftmost = z == self.leftmost;
        let was_rightmost = Some(z) == self.rightmost;

        if let (Some(_), Some(right)) = self.node_ref(z, |zn| (zn.left, zn.right)) {
            let s = self.tree_minimum(right);
            self.swap_positions(z, s);
        }

        let parent = self.node_ref(z, Node::parent);
        let dir = self.dir_of(z);
        match self.node_ref(z, |zn| zn.left.or(zn.right)) {
            Some(c) => {
                self.node_mut(parent, Node::set_child(dir, Some(c)));
                self.node_mut(c, Node::set_parent(parent));
                if self.node_ref(z, Node::is_black) && self.node_ref(c, Node::is_black) {
                    self.remove_fixup(c);
                } else {
                    self.node_mut(c, Node::set_color(Color::Black));
                }
            }
            None => {
                if !parent.is_sentinel() && self.node_ref(z, Node::is_black) {
                    self.remove_fixup(z);
                }
                // The fix-up only rotates above `z`, it stays the `dir` child of `parent`.
                self.node_mut(parent, Node::set_child(dir, None));
            }
        }

        self.len = self.len.wrapping_sub(1);
        match self.root() {
            None => self.reset_extrema(),
            Some(root) => {
                if was_leftmost {
                    self.leftmost = self.tree_minimum(root);
                }
                if was_rightmost {
                    self.rightmost = Some(self.tree_maximum(root));
                }
            }
        }
        self.free_node(z)
    }

    /// Restore red-black tree properties around the doubly black node `x`.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>) {
        loop {
            let p = self.node_ref(x, Node::parent);
            if p.is_sentinel() {
                break;
            }
            let x_dir = self.dir_of(x);
            let s_dir = x_dir.opposite();
            let Some(s) = self.node_ref(p, |pn| pn.child(s_dir)) else {
                trace!("remove fix-up: no sibling, escalating to {p:?}");
                x = p;
                continue;
            };
            if self.node_ref(s, Node::is_red) {
                self.node_mut(s, Node::set_color(Color::Black));
                self.node_mut(p, Node::set_color(Color::Red));
                self.rotate(p, x_dir);
                continue;
            }
            let near = self.node_ref(s, |sn| sn.child(x_dir));
            let far = self.node_ref(s, |sn| sn.child(s_dir));
            if let Some(far) = self.red_node(far) {
                self.node_mut(far, Node::set_color(Color::Black));
                self.node_mut(s, Node::set_color(self.node_ref(p, Node::color)));
                self.rotate(p, x_dir);
            } else if let Some(near) = self.red_node(near) {
                self.node_mut(near, Node::set_color(self.node_ref(p, Node::color)));
                self.rotate(s, s_dir);
                self.rotate(p, x_dir);
            } else {
                self.node_mut(s, Node::set_color(Color::Red));
                if self.node_ref(p, Node::is_black) {
                    trace!("remove fix-up: black sibling without red child, escalating to {p:?}");
                    x = p;
                    continue;
                }
            }
            self.node_mut(p, Node::set_color(Color::Black));
            break;
        }
    }

    /// Exchange the structural positions and colors of `a` and `b`, where `b`
    /// lies in the right subtree of `a`. Values stay in their nodes.
    fn swap_positions(&mut self, a: NodeIndex<Ix>, b: NodeIndex<Ix>) {
        let a_dir = self.dir_of(a);
        let b_dir = self.dir_of(b);
        let (a_parent, a_left, a_right, a_color) =
            self.node_ref(a, |n| (n.parent, n.left, n.right, n.color));
        let (b_parent, b_left, b_right, b_color) =
            self.node_ref(b, |n| (n.parent, n.left, n.right, n.color));

        self.node_mut(a_parent, Node::set_child(a_dir, Some(b)));
        if b_parent == a {
            self.node_mut(b, |n| {
                n.parent = a_parent;
                match b_dir {
                    Dir::Left => {
                        n.left = Some(a);
                        n.right = a_right;
                    }
                    Dir::Right => {
                        n.left = a_left;
                        n.right = Some(a);
                    }
                }
            });
            self.node_mut(a, Node::set_parent(b));
        } else {
            self.node_mut(b_parent, Node::set_child(b_dir, Some(a)));
            self.node_mut(b, |n| {
                n.parent = a_parent;
                n.left = a_left;
                n.right = a_right;
            });
            self.node_mut(a, Node::set_parent(b_parent));
        }
        self.node_mut(a, |n| {
            n.left = b_left;
            n.right = b_right;
            n.color = b_color;
        });
        self.node_mut(b, Node::set_color(a_color));

        for c in [b_left, b_right].into_iter().flatten() {
            self.node_mut(c, Node::set_parent(a));
        }
        let (new_left, new_right) = self.node_ref(b, |n| (n.left, n.right));
        for c in [new_left, new_right].into_iter().flatten() {
            self.node_mut(c, Node::set_parent(b));
        }
    }

    fn swap_colors(&mut self, a: NodeIndex<Ix>, b: NodeIndex<Ix>) {
        let a_color = self.node_ref(a, Node::color);
        let b_color = self.node_ref(b, Node::color);
        self.node_mut(a, Node::set_color(b_color));
        self.node_mut(b, Node::set_color(a_color));
    }

    /// Binary tree left rotate.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) {
        let Some(y) = self.node_ref(x, Node::right) else {
            return;
        };
        let y_left = self.node_ref(y, Node::left);
        self.node_mut(x, Node::set_right(y_left));
        if let Some(y_left) = y_left {
            self.node_mut(y_left, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_left(Some(x)));
    }

    /// Binary tree right rotate.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) {
        let Some(y) = self.node_ref(x, Node::left) else {
            return;
        };
        let y_right = self.node_ref(y, Node::right);
        self.node_mut(x, Node::set_left(y_right));
        if let Some(y_right) = y_right {
            self.node_mut(y_right, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_right(Some(x)));
    }

    /// Rotate `x` down towards `dir`.
    fn rotate(&mut self, x: NodeIndex<Ix>, dir: Dir) {
        trace!("rotating {x:?} down to the {dir:?}");
        match dir {
            Dir::Left => self.left_rotate(x),
            Dir::Right => self.right_rotate(x),
        }
    }

    /// Replace parent during a rotation. A root is re-anchored under the
    /// sentinel through the same child slot.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        let p = self.node_ref(x, Node::parent);
        let x_dir = self.dir_of(x);
        self.node_mut(y, Node::set_parent(p));
        self.node_mut(p, Node::set_child(x_dir, Some(y)));
        self.node_mut(x, Node::set_parent(y));
    }
}

impl<V, KoV, C, Ix> RbTree<V, KoV, C, Ix>
where
    KoV: KeyOfValue<V>,
    C: Compare<KoV::Key>,
    Ix: IndexType,
{
    /// Insert `value` unless an element with an equal key exists.
    ///
    /// Returns the handle of the element with that key and whether `value`
    /// was inserted. An existing element is never overwritten.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    #[inline]
    pub fn insert(&mut self, value: V) -> (NodeIndex<Ix>, bool) {
        let slot = self.locate(self.key_of.key(&value));
        match slot {
            Slot::Occupied(existing) => (existing, false),
            Slot::Vacant { parent, dir } => {
                let z = self.alloc_node(value);
                self.link_node(z, parent, dir);
                (z, true)
            }
        }
    }

    /// Like [`insert`](Self::insert) but reports allocation failure instead of
    /// aborting. The tree is unchanged when an error is returned.
    #[inline]
    pub fn try_insert(&mut self, value: V) -> Result<(NodeIndex<Ix>, bool)> {
        let slot = self.locate(self.key_of.key(&value));
        match slot {
            Slot::Occupied(existing) => Ok((existing, false)),
            Slot::Vacant { parent, dir } => {
                let z = self.try_alloc_node(value)?;
                self.link_node(z, parent, dir);
                Ok((z, true))
            }
        }
    }

    /// Insert into a slot previously returned by `locate`, with no mutation in
    /// between.
    pub(crate) fn insert_at(&mut self, slot: Slot<Ix>, value: V) -> NodeIndex<Ix> {
        match slot {
            Slot::Occupied(existing) => existing,
            Slot::Vacant { parent, dir } => {
                let z = self.alloc_node(value);
                self.link_node(z, parent, dir);
                z
            }
        }
    }

    /// Remove the element with `key`, returning how many were removed.
    #[inline]
    pub fn erase(&mut self, key: &KoV::Key) -> usize {
        let z = self.lower_bound(key);
        if z.is_sentinel() || self.compare.compares_lt(key, self.key(z)) {
            return 0;
        }
        let _ignore = self.remove_node(z);
        1
    }

    /// Remove the element with `key` and return it.
    #[inline]
    pub fn remove(&mut self, key: &KoV::Key) -> Option<V> {
        let z = self.find(key);
        if z.is_sentinel() {
            return None;
        }
        self.remove_node(z)
    }

    /// Remove the element at `handle`, returning the handle of its successor.
    /// The end handle and stale handles remove nothing and return the end.
    pub fn erase_at(&mut self, handle: NodeIndex<Ix>) -> NodeIndex<Ix> {
        if !self.contains_handle(handle) {
            return self.end();
        }
        let next = self.successor(handle);
        let _ignore = self.remove_node(handle);
        next
    }

    /// Remove the element at `handle` and return it.
    pub fn remove_at(&mut self, handle: NodeIndex<Ix>) -> Option<V> {
        if !self.contains_handle(handle) {
            return None;
        }
        self.remove_node(handle)
    }

    /// Remove every element in `[first, last)`.
    pub fn erase_range(&mut self, mut first: NodeIndex<Ix>, last: NodeIndex<Ix>) {
        if first == self.begin() && last == self.end() {
            self.clear();
            return;
        }
        while first != last && !first.is_sentinel() {
            first = self.erase_at(first);
        }
    }

    /// Handle of the element with `key`, or the end handle.
    pub fn find(&self, key: &KoV::Key) -> NodeIndex<Ix> {
        match self.locate(key) {
            Slot::Occupied(x) => x,
            Slot::Vacant { .. } => self.end(),
        }
    }

    /// Reference to the element with `key`.
    #[inline]
    pub fn get(&self, key: &KoV::Key) -> Option<&V> {
        self.get_at(self.find(key))
    }

    /// Number of elements with `key`, 0 or 1.
    #[inline]
    pub fn count(&self, key: &KoV::Key) -> usize {
        usize::from(!self.find(key).is_sentinel())
    }

    /// Returns `true` if an element with `key` is stored.
    #[inline]
    pub fn contains(&self, key: &KoV::Key) -> bool {
        !self.find(key).is_sentinel()
    }

    /// Handle of the first element whose key is not less than `key`.
    #[inline]
    pub fn lower_bound(&self, key: &KoV::Key) -> NodeIndex<Ix> {
        self.lower_bound_from(self.root(), self.end(), key)
    }

    /// Handle of the first element whose key is greater than `key`.
    #[inline]
    pub fn upper_bound(&self, key: &KoV::Key) -> NodeIndex<Ix> {
        self.upper_bound_from(self.root(), self.end(), key)
    }

    /// The handle range of elements equal to `key`, computed in one descent.
    pub fn equal_range(&self, key: &KoV::Key) -> (NodeIndex<Ix>, NodeIndex<Ix>) {
        let mut x = self.root();
        let mut y = self.end();
        while let Some(n) = x {
            match self.compare.compare(self.key(n), key) {
                Ordering::Less => x = self.node_ref(n, Node::right),
                Ordering::Greater => {
                    y = n;
                    x = self.node_ref(n, Node::left);
                }
                Ordering::Equal => {
                    let (left, right) = self.node_ref(n, |nn| (nn.left, nn.right));
                    return (
                        self.lower_bound_from(left, n, key),
                        self.upper_bound_from(right, y, key),
                    );
                }
            }
        }
        (y, y)
    }

    /// Search for `key`: the node holding it or the slot it would fill.
    pub(crate) fn locate(&self, key: &KoV::Key) -> Slot<Ix> {
        let mut parent = self.end();
        let mut dir = Dir::Left;
        let mut x = self.root();
        while let Some(n) = x {
            parent = n;
            dir = match self.compare.compare(key, self.key(n)) {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => return Slot::Occupied(n),
            };
            x = self.node_ref(n, |nn| nn.child(dir));
        }
        Slot::Vacant { parent, dir }
    }

    fn lower_bound_from(
        &self,
        mut x: Option<NodeIndex<Ix>>,
        mut y: NodeIndex<Ix>,
        key: &KoV::Key,
    ) -> NodeIndex<Ix> {
        while let Some(n) = x {
            if self.compare.compares_lt(self.key(n), key) {
                x = self.node_ref(n, Node::right);
            } else {
                y = n;
                x = self.node_ref(n, Node::left);
            }
        }
        y
    }

    fn upper_bound_from(
        &self,
        mut x: Option<NodeIndex<Ix>>,
        mut y: NodeIndex<Ix>,
        key: &KoV::Key,
    ) -> NodeIndex<Ix> {
        while let Some(n) = x {
            if self.compare.compares_lt(key, self.key(n)) {
                y = n;
                x = self.node_ref(n, Node::left);
            } else {
                x = self.node_ref(n, Node::right);
            }
        }
        y
    }

    /// Key of the live node `x`.
    pub(crate) fn key(&self, x: NodeIndex<Ix>) -> &KoV::Key {
        self.key_of.key(self.node_ref(x, Node::value))
    }
}

impl<V: Ord> RbTree<V> {
    /// Create an empty `RbTree` ordered by `V: Ord`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(Identity, natural())
    }

    /// Create an empty `RbTree` with room for `capacity` elements.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_parts(capacity, Identity, natural())
    }
}

impl<V, KoV, C, Ix> Default for RbTree<V, KoV, C, Ix>
where
    KoV: Default,
    C: Default,
    Ix: IndexType,
{
    #[inline]
    fn default() -> Self {
        Self::with_parts(KoV::default(), C::default())
    }
}

impl<V, KoV, C, Ix> Clone for RbTree<V, KoV, C, Ix>
where
    V: Clone,
    KoV: Clone,
    C: Clone,
    Ix: IndexType,
{
    /// Deep copy into a compact arena. Handles of `self` do not carry over.
    fn clone(&self) -> Self {
        debug!("cloning tree with {} elements", self.len);
        let mut tree =
            Self::with_capacity_and_parts(self.len, self.key_of.clone(), self.compare.clone());
        let Some(root) = self.root() else {
            return tree;
        };
        let mut stack = vec![(root, NodeIndex::sentinel(), Dir::Left)];
        while let Some((src, parent, dir)) = stack.pop() {
            let idx = NodeIndex::new(tree.nodes.len());
            let (left, right, color, value) =
                self.node_ref(src, |n| (n.left, n.right, n.color, n.value.clone()));
            tree.nodes.push(Node {
                left: None,
                right: None,
                parent,
                color,
                value,
            });
            tree.node_mut(parent, Node::set_child(dir, Some(idx)));
            if let Some(right) = right {
                stack.push((right, idx, Dir::Right));
            }
            if let Some(left) = left {
                stack.push((left, idx, Dir::Left));
            }
        }
        if let Some(root) = tree.root() {
            tree.leftmost = tree.tree_minimum(root);
            tree.rightmost = Some(tree.tree_maximum(root));
        }
        tree.len = self.len;
        tree
    }
}

impl<V, KoV, C, Ix> fmt::Debug for RbTree<V, KoV, C, Ix>
where
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<V, KoV, C, Ix> PartialEq for RbTree<V, KoV, C, Ix>
where
    V: PartialEq,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<V, KoV, C, Ix> Eq for RbTree<V, KoV, C, Ix>
where
    V: Eq,
    Ix: IndexType,
{
}

impl<V, KoV, C, Ix> PartialOrd for RbTree<V, KoV, C, Ix>
where
    V: PartialOrd,
    Ix: IndexType,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<V, KoV, C, Ix> Ord for RbTree<V, KoV, C, Ix>
where
    V: Ord,
    Ix: IndexType,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<V, KoV, C, Ix> Hash for RbTree<V, KoV, C, Ix>
where
    V: Hash,
    Ix: IndexType,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<V, KoV, C, Ix> Extend<V> for RbTree<V, KoV, C, Ix>
where
    KoV: KeyOfValue<V>,
    C: Compare<KoV::Key>,
    Ix: IndexType,
{
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            let _ignore = self.insert(value);
        }
    }
}

impl<V, KoV, C, Ix> FromIterator<V> for RbTree<V, KoV, C, Ix>
where
    KoV: KeyOfValue<V> + Default,
    C: Compare<KoV::Key> + Default,
    Ix: IndexType,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<V, KoV, C, Ix> IntoIterator for RbTree<V, KoV, C, Ix>
where
    Ix: IndexType,
{
    type Item = V;
    type IntoIter = IntoIter<V, KoV, C, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, V, KoV, C, Ix> IntoIterator for &'a RbTree<V, KoV, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a V;
    type IntoIter = Iter<'a, V, KoV, C, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Convenient methods for reference or mutate current/parent node
impl<'a, V, KoV, C, Ix> RbTree<V, KoV, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<V, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<V, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }

    fn parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&self.nodes[idx])
    }
}
