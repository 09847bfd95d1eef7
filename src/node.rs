use crate::index::{IndexType, NodeIndex};

/// Node of the red-black tree
#[derive(Debug, Clone)]
pub struct Node<V, Ix> {
    /// Left child, owned
    pub left: Option<NodeIndex<Ix>>,
    /// Right child, owned
    pub right: Option<NodeIndex<Ix>>,
    /// Parent, navigation only. The root points at the sentinel.
    pub parent: NodeIndex<Ix>,
    /// Color of the node
    pub color: Color,
    /// Value of the node, `None` for the sentinel and for recycled slots
    pub value: Option<V>,
}

// Convenient getter/setter methods
impl<V, Ix> Node<V, Ix>
where
    Ix: IndexType,
{
    /// An unlinked black node without a value.
    pub fn vacant() -> Self {
        Node {
            left: None,
            right: None,
            parent: NodeIndex::sentinel(),
            color: Color::Black,
            value: None,
        }
    }

    /// A fresh red node, not yet linked into the tree.
    pub fn new(value: V) -> Self {
        Node {
            left: None,
            right: None,
            parent: NodeIndex::sentinel(),
            color: Color::Red,
            value: Some(value),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn left(&self) -> Option<NodeIndex<Ix>> {
        self.left
    }

    pub fn right(&self) -> Option<NodeIndex<Ix>> {
        self.right
    }

    pub fn parent(&self) -> NodeIndex<Ix> {
        self.parent
    }

    pub fn child(&self, dir: Dir) -> Option<NodeIndex<Ix>> {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    pub fn is_vacant(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_black(&self) -> bool {
        matches!(self.color, Color::Black)
    }

    pub fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    /// # Panics
    ///
    /// Panics when called on the sentinel or on a recycled slot.
    pub fn value(&self) -> &V {
        self.value
            .as_ref()
            .expect("sentinel and recycled nodes carry no value")
    }

    /// # Panics
    ///
    /// Panics when called on the sentinel or on a recycled slot.
    pub fn value_mut(&mut self) -> &mut V {
        self.value
            .as_mut()
            .expect("sentinel and recycled nodes carry no value")
    }

    pub fn value_opt(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn value_opt_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    pub fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }

    pub fn set_color(color: Color) -> impl FnOnce(&mut Node<V, Ix>) {
        move |node: &mut Node<V, Ix>| {
            node.color = color;
        }
    }

    pub fn set_left(left: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<V, Ix>) {
        move |node: &mut Node<V, Ix>| {
            node.left = left;
        }
    }

    pub fn set_right(right: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<V, Ix>) {
        move |node: &mut Node<V, Ix>| {
            node.right = right;
        }
    }

    pub fn set_child(dir: Dir, child: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<V, Ix>) {
        move |node: &mut Node<V, Ix>| match dir {
            Dir::Left => node.left = child,
            Dir::Right => node.right = child,
        }
    }

    pub fn set_parent(parent: NodeIndex<Ix>) -> impl FnOnce(&mut Node<V, Ix>) {
        move |node: &mut Node<V, Ix>| {
            node.parent = parent;
        }
    }
}

/// The color of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node
    Red,
    /// Black node
    Black,
}

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    pub fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}
