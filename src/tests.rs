use std::collections::{BTreeSet, HashSet};

use compare::{natural, Compare, Natural, Rev};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use simplelog::{Config, LevelFilter, TestLogger};

use index::NodeIndex;
use node::{Color, Node};

use super::*;

fn init_logger() {
    let _ignore = TestLogger::init(LevelFilter::Trace, Config::default());
}

struct KeyGenerator {
    rng: StdRng,
    unique: HashSet<i32>,
    limit: i32,
}

impl KeyGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: i32 = 10_000;
        Self {
            rng: SeedableRng::from_seed(seed),
            unique: HashSet::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> i32 {
        self.rng.gen_range(0..self.limit)
    }

    fn next_unique(&mut self) -> i32 {
        let mut key = self.next();
        while self.unique.contains(&key) {
            key = self.next();
        }
        self.unique.insert(key);
        key
    }

    fn shuffle(&mut self, keys: &mut [i32]) {
        keys.shuffle(&mut self.rng);
    }
}

impl<V, KoV, C> RbTree<V, KoV, C>
where
    KoV: KeyOfValue<V>,
    C: Compare<KoV::Key>,
{
    /// 1. Every node is either red or black.
    /// 2. The root is black.
    /// 3. Every leaf (NIL) is black.
    /// 4. If a node is red, then both its children are black.
    /// 5. For each node, all simple paths from the node to descendant leaves contain the
    /// same number of black nodes.
    ///
    /// Also checks the sentinel, the parent links, the key order and the
    /// cached extrema and length.
    fn check_rb_properties(&self) {
        let sentinel = NodeIndex::sentinel();
        assert!(self.node_ref(sentinel, Node::is_vacant));
        assert_eq!(self.node_ref(sentinel, Node::right), None);
        let Some(root) = self.root() else {
            assert_eq!(self.len(), 0);
            assert_eq!(self.begin(), self.end());
            assert_eq!(self.rbegin(), self.end());
            return;
        };
        assert_eq!(self.node_ref(root, Node::parent), sentinel);
        assert!(matches!(self.node_ref(root, Node::color), Color::Black));
        self.check_children_color(Some(root));
        let _ignore = self.check_black_height(Some(root));
        assert_eq!(self.check_links(root), self.len());
        self.check_order();
        assert_eq!(self.begin(), self.tree_min_of(root));
        assert_eq!(self.rbegin(), self.tree_max_of(root));
        for &slot in &self.free {
            assert!(self.node_ref(slot, Node::is_vacant));
        }
    }

    fn check_children_color(&self, x: Option<NodeIndex<u32>>) {
        let Some(x) = x else {
            return;
        };
        let (left, right) = self.node_ref(x, |n| (n.left(), n.right()));
        self.check_children_color(left);
        self.check_children_color(right);
        if self.node_ref(x, Node::is_red) {
            for child in [left, right].into_iter().flatten() {
                assert!(matches!(self.node_ref(child, Node::color), Color::Black));
            }
        }
    }

    fn check_black_height(&self, x: Option<NodeIndex<u32>>) -> usize {
        let Some(x) = x else {
            return 0;
        };
        let lefth = self.check_black_height(self.node_ref(x, Node::left));
        let righth = self.check_black_height(self.node_ref(x, Node::right));
        assert_eq!(lefth, righth);
        if self.node_ref(x, Node::is_black) {
            return lefth + 1;
        }
        lefth
    }

    /// Returns the number of nodes under `x`.
    fn check_links(&self, x: NodeIndex<u32>) -> usize {
        assert!(!self.node_ref(x, Node::is_vacant));
        let mut count = 1;
        let (left, right) = self.node_ref(x, |n| (n.left(), n.right()));
        for child in [left, right].into_iter().flatten() {
            assert_eq!(self.node_ref(child, Node::parent), x);
            count += self.check_links(child);
        }
        count
    }

    fn check_order(&self) {
        let mut x = self.begin();
        let mut steps = 0;
        while !x.is_sentinel() {
            let next = self.successor(x);
            if !next.is_sentinel() {
                assert!(self.key_comp().compares_lt(self.key(x), self.key(next)));
            }
            assert_eq!(self.predecessor(next), x);
            x = next;
            steps += 1;
        }
        assert_eq!(steps, self.len());
    }

    fn tree_min_of(&self, mut x: NodeIndex<u32>) -> NodeIndex<u32> {
        while let Some(left) = self.node_ref(x, Node::left) {
            x = left;
        }
        x
    }

    fn tree_max_of(&self, mut x: NodeIndex<u32>) -> NodeIndex<u32> {
        while let Some(right) = self.node_ref(x, Node::right) {
            x = right;
        }
        x
    }
}

fn with_tree_and_generator(test_fn: impl Fn(RbTree<i32>, KeyGenerator)) {
    init_logger();
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for seed in seeds {
        let gen = KeyGenerator::new(seed);
        let tree = RbTree::new();
        test_fn(tree, gen);
    }
}

fn keys_of(tree: &RbTree<i32>) -> Vec<i32> {
    tree.iter().copied().collect()
}

#[test]
fn red_black_tree_properties_is_satisfied() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in keys {
            let _ignore = tree.insert(k);
            tree.check_rb_properties();
        }
        assert_eq!(tree.len(), 1000);
    });
}

#[test]
fn red_black_tree_properties_hold_after_every_erase() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for &k in &keys {
            let _ignore = tree.insert(k);
        }
        gen.shuffle(&mut keys);
        for (removed, k) in keys.iter().enumerate() {
            assert_eq!(tree.erase(k), 1);
            tree.check_rb_properties();
            assert_eq!(tree.len(), 1000 - removed - 1);
        }
        assert!(tree.is_empty());
    });
}

#[test]
fn mixed_operations_agree_with_btree_set() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut model = BTreeSet::new();
        for step in 0..5000 {
            let k = gen.next() % 500;
            if step % 2 == 0 {
                assert_eq!(tree.insert(k).1, model.insert(k));
            } else {
                assert_eq!(tree.erase(&k), usize::from(model.remove(&k)));
            }
            if step % 100 == 0 {
                tree.check_rb_properties();
            }
        }
        tree.check_rb_properties();
        assert_eq!(keys_of(&tree), model.into_iter().collect::<Vec<_>>());
    });
}

#[test]
fn tree_len_will_update() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(100)
            .collect();
        for &k in &keys {
            let _ignore = tree.insert(k);
        }
        assert_eq!(tree.len(), 100);
        for k in keys {
            let _ignore = tree.remove(&k);
        }
        assert_eq!(tree.len(), 0);
    });
}

#[test]
fn remove_non_exist_key_will_do_nothing() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in keys {
            let _ignore = tree.insert(k);
        }
        assert_eq!(tree.len(), 1000);
        let to_remove: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in to_remove {
            assert_eq!(tree.erase(&k), 0);
            assert_eq!(tree.remove(&k), None);
        }
        assert_eq!(tree.len(), 1000);
        tree.check_rb_properties();
    });
}

#[test]
fn iterate_through_tree_is_sorted() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for &k in &keys {
            let _ignore = tree.insert(k);
        }
        keys.sort_unstable();
        assert_eq!(keys_of(&tree), keys);
        keys.reverse();
        assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), keys);
    });
}

#[test]
fn bounds_are_consistent_with_find() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique() * 2)
            .take(300)
            .collect();
        for k in keys {
            let _ignore = tree.insert(k);
        }
        for _ in 0..1000 {
            let target = gen.next() * 2 + gen.next() % 2 - 1;
            let (lower, upper) = tree.equal_range(&target);
            assert_eq!(lower, tree.lower_bound(&target));
            assert_eq!(upper, tree.upper_bound(&target));
            if tree.contains(&target) {
                assert_eq!(lower, tree.find(&target));
                assert_eq!(upper, tree.successor(lower));
                assert_eq!(tree.count(&target), 1);
            } else {
                assert_eq!(lower, upper);
                assert_eq!(tree.find(&target), tree.end());
                assert_eq!(tree.count(&target), 0);
            }
            if let Some(&v) = tree.get_at(lower) {
                assert!(v >= target);
            }
            let before = tree.predecessor(lower);
            if let Some(&v) = tree.get_at(before) {
                assert!(v < target);
            }
        }
    });
}

#[test]
fn sample_keys_build_a_valid_tree() {
    init_logger();
    let mut tree: RbTree<i32> = RbTree::new();
    for k in [5, 3, 8, 1, 4, 7, 9, 2, 6, 0] {
        assert!(tree.insert(k).1);
        tree.check_rb_properties();
    }
    assert_eq!(keys_of(&tree), (0..10).collect::<Vec<_>>());
    assert_eq!(tree.len(), 10);
    assert_eq!(tree.find(&11), tree.end());
    assert_eq!(tree.get_at(tree.begin()), Some(&0));
    assert_eq!(tree.get_at(tree.rbegin()), Some(&9));

    assert_eq!(tree.erase(&5), 1);
    tree.check_rb_properties();
    assert_eq!(keys_of(&tree), vec![0, 1, 2, 3, 4, 6, 7, 8, 9]);
}

#[test]
fn erasing_the_root_until_empty() {
    init_logger();
    let mut tree: RbTree<i32> = (0..64).collect();
    while let Some(root) = tree.root() {
        let key = *tree.key(root);
        assert_eq!(tree.erase(&key), 1);
        assert!(!tree.contains(&key));
        tree.check_rb_properties();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.begin(), tree.end());
}

#[test]
fn duplicate_insert_is_rejected() {
    let mut tree: RbTree<i32> = RbTree::new();
    let (first, inserted) = tree.insert(7);
    assert!(inserted);
    let (again, inserted) = tree.insert(7);
    assert!(!inserted);
    assert_eq!(first, again);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.try_insert(7), Ok((first, false)));
}

#[test]
fn handles_survive_unrelated_modifications() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(500)
            .collect();
        let handles: Vec<_> = keys.iter().map(|&k| tree.insert(k).0).collect();
        // erase every other key, the rest must still resolve through their handles
        for k in keys.iter().step_by(2) {
            assert_eq!(tree.erase(k), 1);
        }
        for _ in 0..200 {
            let _ignore = tree.insert(gen.next_unique());
        }
        for (k, h) in keys.iter().zip(handles).skip(1).step_by(2) {
            assert_eq!(tree.get_at(h), Some(k));
        }
        tree.check_rb_properties();
    });
}

#[test]
fn erasing_one_child_root_keeps_the_child_handle() {
    let mut tree: RbTree<i32> = RbTree::new();
    let (root, _) = tree.insert(1);
    let (child, _) = tree.insert(2);
    assert_eq!(tree.root(), Some(root));
    assert_eq!(tree.erase(&1), 1);
    assert_eq!(tree.root(), Some(child));
    assert_eq!(tree.get_at(child), Some(&2));
    assert!(!tree.contains_handle(root));
    tree.check_rb_properties();
}

#[test]
fn erasing_two_child_node_keeps_the_successor_handle() {
    let mut tree: RbTree<i32> = (1..=7).collect();
    let successor = tree.find(&5);
    let three = tree.find(&3);
    let next = tree.erase_at(tree.find(&4));
    assert_eq!(next, successor);
    assert_eq!(tree.get_at(successor), Some(&5));
    assert_eq!(tree.get_at(three), Some(&3));
    tree.check_rb_properties();
}

#[test]
fn erased_slots_are_recycled() {
    let mut tree: RbTree<i32> = (0..10).collect();
    let slots = tree.nodes.len();
    let stale = tree.find(&4);
    assert_eq!(tree.remove(&4), Some(4));
    assert_eq!(tree.get_at(stale), None);
    let (reused, _) = tree.insert(40);
    assert_eq!(reused, stale);
    assert_eq!(tree.nodes.len(), slots);
    tree.check_rb_properties();
}

#[test]
fn traversal_wraps_through_the_end() {
    let tree: RbTree<i32> = (1..=3).collect();
    let end = tree.end();
    assert_eq!(tree.get_at(tree.successor(end)), Some(&1));
    assert_eq!(tree.get_at(tree.predecessor(end)), Some(&3));
    assert_eq!(tree.successor(tree.rbegin()), end);
    assert_eq!(tree.predecessor(tree.begin()), end);

    let empty: RbTree<i32> = RbTree::new();
    assert_eq!(empty.successor(empty.end()), empty.end());
    assert_eq!(empty.predecessor(empty.end()), empty.end());
}

#[test]
fn handles_outside_the_arena_lead_to_the_end() {
    let mut tree: RbTree<i32> = (0..50).collect();
    let stale = tree.find(&40);
    tree.clear();
    let _ignore = tree.insert(7);
    assert_eq!(tree.successor(stale), tree.end());
    assert_eq!(tree.predecessor(stale), tree.end());
    assert!(!tree.contains_handle(stale));
    assert_eq!(tree.get_at(stale), None);
    assert_eq!(tree.remove_at(stale), None);
    assert_eq!(tree.range_between(stale, tree.end()).count(), 0);
    tree.check_rb_properties();
}

#[test]
fn tree_clear_is_ok() {
    let mut tree: RbTree<i32> = (0..3).collect();
    assert_eq!(tree.len(), 3);
    tree.clear();
    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert_eq!(tree.nodes.len(), 1);
    assert!(tree.nodes[0].is_vacant());
    assert!(tree.free.is_empty());
    tree.check_rb_properties();
    let _ignore = tree.insert(1);
    tree.check_rb_properties();
}

#[test]
fn clone_is_a_valid_independent_copy() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(300)
            .collect();
        for &k in &keys {
            let _ignore = tree.insert(k);
        }
        for k in keys.iter().take(100) {
            let _ignore = tree.erase(k);
        }
        let mut copy = tree.clone();
        copy.check_rb_properties();
        assert_eq!(copy, tree);
        assert!(copy.free.is_empty());
        assert_eq!(copy.nodes.len(), copy.len() + 1);
        for k in keys.iter().skip(100).take(100) {
            let _ignore = copy.erase(k);
        }
        assert_eq!(tree.len(), 200);
        assert_eq!(copy.len(), 100);
        tree.check_rb_properties();
    });

    let empty: RbTree<i32> = RbTree::new();
    let copy = empty.clone();
    copy.check_rb_properties();
    assert!(copy.is_empty());
}

#[test]
fn swap_with_empty_tree() {
    let mut a: RbTree<i32> = (0..5).collect();
    let mut b: RbTree<i32> = RbTree::new();
    a.swap(&mut b);
    assert!(a.is_empty());
    assert_eq!(keys_of(&b), vec![0, 1, 2, 3, 4]);
    a.check_rb_properties();
    b.check_rb_properties();
    a.swap(&mut b);
    assert_eq!(a.len(), 5);
    assert!(b.is_empty());
}

#[test]
fn erase_range_removes_half_open_range() {
    let mut tree: RbTree<i32> = (0..20).collect();
    let first = tree.lower_bound(&5);
    let last = tree.upper_bound(&14);
    tree.erase_range(first, last);
    tree.check_rb_properties();
    assert_eq!(keys_of(&tree), vec![0, 1, 2, 3, 4, 15, 16, 17, 18, 19]);
    let (first, last) = tree.equal_range(&10);
    tree.erase_range(first, last);
    assert_eq!(tree.len(), 10);
    tree.erase_range(tree.begin(), tree.end());
    assert!(tree.is_empty());
    tree.check_rb_properties();
}

#[test]
fn trees_compare_lexicographically() {
    let a: RbTree<i32> = [1, 2, 3].into_iter().collect();
    let b: RbTree<i32> = [3, 2, 1].into_iter().collect();
    let c: RbTree<i32> = [1, 2, 4].into_iter().collect();
    let d: RbTree<i32> = [1, 2].into_iter().collect();
    assert_eq!(a, b);
    assert!(a < c);
    assert!(d < a);
    assert_ne!(a, d);
}

#[test]
fn custom_comparator_keeps_properties() {
    let mut tree: RbTree<i32, Identity, Rev<Natural<i32>>> =
        RbTree::with_parts(Identity, natural().rev());
    for k in 0..100 {
        let _ignore = tree.insert(k);
    }
    tree.check_rb_properties();
    assert_eq!(tree.get_at(tree.begin()), Some(&99));
    assert_eq!(tree.get_at(tree.lower_bound(&50)), Some(&50));
    assert_eq!(tree.get_at(tree.upper_bound(&50)), Some(&49));
}

#[cfg(feature = "graphviz")]
#[test]
fn tree_draw_is_ok() {
    let tree: RbTree<i32> = [16, 8, 0, 5, 6, 15, 17, 25, 26, 19].into_iter().collect();
    let path = std::env::temp_dir().join("rb_ordered_map_tree.dot");
    let path = path.to_str().unwrap();
    tree.draw(path).unwrap();
    let dot = std::fs::read_to_string(path).unwrap();
    assert!(dot.starts_with("digraph {"));
    assert_eq!(dot.matches("fillcolor").count(), 10);
    assert_eq!(dot.matches("->").count(), 9);

    let mut map = RbMap::new();
    map.insert(1, "one");
    map.insert(2, "two");
    map.draw_without_value(path).unwrap();
    let dot = std::fs::read_to_string(path).unwrap();
    assert!(dot.contains("label=\"2\""));
    assert!(!dot.contains("two"));
    map.draw(path).unwrap();
    let dot = std::fs::read_to_string(path).unwrap();
    assert!(dot.contains("two"));
}
