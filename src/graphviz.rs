use std::fmt::Debug;
use std::fs::OpenOptions;
use std::io::{BufWriter, Result, Write};

use crate::index::{IndexType, NodeIndex};
use crate::key::KeyOfValue;
use crate::map::RbMap;
use crate::node::{Color, Node};
use crate::tree::RbTree;

impl<V, KoV, C, Ix> RbTree<V, KoV, C, Ix>
where
    V: Debug,
    KoV: KeyOfValue<V>,
    KoV::Key: Debug,
    Ix: IndexType,
{
    /// Write the tree to `path` as a graphviz digraph, one labeled node per
    /// element.
    pub fn draw(&self, path: &str) -> Result<()> {
        self.draw_with(path, |v| format!("{v:?}"))
    }

    /// Like [`draw`](Self::draw) but label nodes with their keys only.
    pub fn draw_without_value(&self, path: &str) -> Result<()> {
        self.draw_with(path, |v| format!("{:?}", self.key_of().key(v)))
    }

    fn draw_with(&self, path: &str, label: impl Fn(&V) -> String) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut out = BufWriter::new(file);
        writeln!(out, "digraph {{")?;
        writeln!(out, "    node [style=filled, fontcolor=white];")?;
        if let Some(root) = self.root() {
            self.draw_node(&mut out, root, &label)?;
        }
        writeln!(out, "}}")?;
        out.flush()
    }

    fn draw_node(
        &self,
        out: &mut impl Write,
        x: NodeIndex<Ix>,
        label: &impl Fn(&V) -> String,
    ) -> Result<()> {
        let fill = match self.node_ref(x, Node::color) {
            Color::Red => "red",
            Color::Black => "black",
        };
        let text = label(self.node_ref(x, Node::value)).replace('"', "\\\"");
        writeln!(
            out,
            "    n{} [label=\"{text}\", fillcolor={fill}];",
            x.index()
        )?;
        let (left, right) = self.node_ref(x, |n| (n.left(), n.right()));
        for child in [left, right].into_iter().flatten() {
            writeln!(out, "    n{} -> n{};", x.index(), child.index())?;
            self.draw_node(out, child, label)?;
        }
        Ok(())
    }
}

impl<K, V, C, Ix> RbMap<K, V, C, Ix>
where
    K: Debug,
    V: Debug,
    Ix: IndexType,
{
    /// Write the map to `path` as a graphviz digraph labeled `(key, value)`.
    pub fn draw(&self, path: &str) -> Result<()> {
        self.tree.draw(path)
    }

    /// Write the map to `path` as a graphviz digraph labeled by key.
    pub fn draw_without_value(&self, path: &str) -> Result<()> {
        self.tree.draw_without_value(path)
    }
}
