use std::collections::HashMap;
use std::fmt::Debug;

use crate::iter::Iter;
use crate::node::Node;
use crate::prefix::Prefix;

/// Maximum key length the tree accepts (spec: byte strings of length 1-255).
pub const MAX_KEY_LEN: usize = 255;

#[derive(Debug)]
pub struct NodeStats {
    pub width: usize,
    pub total_nodes: usize,
    pub total_children: usize,
    pub density: f64,
}

#[derive(Debug)]
pub struct TreeStats {
    pub node_stats: HashMap<usize, NodeStats>,
    pub num_leaves: usize,
    pub num_values: usize,
    pub num_inner_nodes: usize,
    pub total_density: f64,
    pub max_height: usize,
}

/// An adaptive radix tree mapping byte-string keys (length 1-255) to values.
///
/// The root is always a concrete node (never absent): it starts out as an
/// empty, valueless `Single` and is only ever mutated in place, never
/// replaced by `Option::take`/`swap` dances — growing, shrinking, splitting
/// and merging all happen through `&mut Node<V>` in place, so there is no
/// separate "propagate replacement to caller" step.
pub struct AdaptiveRadixTree<V> {
    root: Node<V>,
}

impl<V> Default for AdaptiveRadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_len(key: &[u8]) -> bool {
    !key.is_empty() && key.len() <= MAX_KEY_LEN
}

impl<V> AdaptiveRadixTree<V> {
    pub fn new() -> Self {
        Self {
            root: Node::new_inner(Prefix::empty()),
        }
    }

    /// Looks up `key`. Out-of-range lengths silently return `None`.
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        if !valid_len(key) {
            return None;
        }
        Self::get_iterate(&self.root, key)
    }

    /// Descends the tree matching `key` against each node's prefix.
    ///
    /// A node is the answer only when its prefix exactly consumes the
    /// remaining key (`prefix.len() == remaining key length`) -- not merely
    /// whenever no further child exists. Node prefixes redundantly repeat the
    /// branch byte that led to them (see `AdaptiveRadixTree::split`), so
    /// `depth` only ever advances by a node's own prefix length, never by
    /// prefix length + 1.
    fn get_iterate<'a>(start: &'a Node<V>, key: &[u8]) -> Option<&'a V> {
        let mut cur = start;
        let mut depth = 0;
        loop {
            let matched = cur.prefix.check(key, depth);
            if matched != cur.prefix.len() {
                return None;
            }
            let remaining = key.len() - depth;
            if cur.prefix.len() == remaining {
                return cur.value();
            }
            let k = key[depth + cur.prefix.len()];
            let next = cur.seek_child(k)?;
            depth += cur.prefix.len();
            cur = next;
        }
    }

    /// Inserts `key` -> `value`, returning the previous value if any.
    /// Out-of-range lengths are silent no-ops returning `None`.
    pub fn put(&mut self, key: &[u8], value: V) -> Option<V> {
        if !valid_len(key) {
            return None;
        }
        Self::insert_recurse(&mut self.root, key, value, 0)
    }

    fn insert_recurse(node: &mut Node<V>, key: &[u8], value: V, depth: usize) -> Option<V> {
        let common = node.prefix.check(key, depth);

        if common != node.prefix.len() {
            Self::split(node, key, value, depth, common);
            return None;
        }

        let new_depth = depth + node.prefix.len();
        if new_depth == key.len() {
            return node.value.replace(value);
        }

        let k = key[new_depth];
        if let Some(child) = node.seek_child_mut(k) {
            return Self::insert_recurse(child, key, value, new_depth);
        }

        let leaf = Node::new_leaf(Prefix::from_slice(&key[new_depth..]), value);
        node.add_child(k, leaf);
        None
    }

    /// Breaks `node` in two at the point where `key` diverges from its
    /// prefix, `common` bytes in. The shared bytes become a new parent; the
    /// old node (its prefix shifted left by `common`, keeping the branch
    /// byte) and, if the key has bytes left, a new leaf become its children.
    fn split(node: &mut Node<V>, key: &[u8], value: V, depth: usize, common: usize) {
        let old_prefix = node.prefix.clone();
        let shared = old_prefix.before(common);
        let remainder = old_prefix.after(common);
        let branch_byte = remainder.idx(0);

        let mut old_node = std::mem::replace(node, Node::new_inner(shared));
        old_node.prefix = remainder;

        let tail = &key[depth + common..];
        if tail.is_empty() {
            node.value = Some(value);
        } else {
            let new_leaf = Node::new_leaf(Prefix::from_slice(tail), value);
            node.add_child(tail[0], new_leaf);
        }
        node.add_child(branch_byte, old_node);
    }

    /// Removes `key`, returning whether a value was actually removed.
    /// Out-of-range lengths are silent no-ops returning `false`.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        if !valid_len(key) {
            return false;
        }
        let removed = Self::remove_recurse(&mut self.root, key, 0).is_some();
        if removed && self.root.is_leaf() && self.root.value().is_none() {
            // The root collapsed to an empty Leaf. A Leaf with a value is a
            // legitimate root (the merge cascade can leave the last
            // surviving key sitting directly on the root), so only reset
            // when it's genuinely empty rather than whenever it's a Leaf.
            self.root = Node::new_inner(Prefix::empty());
        }
        removed
    }

    /// Returns `Some(should_prune)` if a value was removed under `node`,
    /// where `should_prune` tells the caller whether `node` is now
    /// structurally empty (or was merged into its sole child) and so the
    /// caller should drop/keep its own edge to it accordingly. Returns `None`
    /// if `key` was not found anywhere under `node`.
    fn remove_recurse(node: &mut Node<V>, key: &[u8], depth: usize) -> Option<bool> {
        let matched = node.prefix.check(key, depth);
        if matched != node.prefix.len() {
            return None;
        }

        let remaining = key.len() - depth;
        if node.prefix.len() == remaining {
            node.value.take()?;
            return Some(node.collapse_if_needed());
        }

        let k = key[depth + node.prefix.len()];
        let child_depth = depth + node.prefix.len();
        let child = node.seek_child_mut(k)?;
        let child_should_prune = Self::remove_recurse(child, key, child_depth)?;
        if child_should_prune {
            node.delete_child(k);
        }
        Some(node.collapse_if_needed())
    }

    /// Full-tree iteration in byte-lexicographic key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root)
    }

    /// Every `(key, value)` whose key begins with `prefix`.
    ///
    /// Answers the gap left by the source's declared-but-undefined
    /// `artGetWithPrefix`: finds the node (if any) whose accumulated path
    /// prefix-matches `prefix` in either direction, then yields everything
    /// beneath it.
    pub fn prefix_scan(&self, prefix: &[u8]) -> Iter<'_, V> {
        let Some((node, node_depth)) = Self::find_prefix_node(&self.root, prefix, 0) else {
            return Iter::empty();
        };
        Iter::new_scoped(node, prefix[..node_depth].to_vec())
    }

    fn find_prefix_node<'a>(
        node: &'a Node<V>,
        prefix: &[u8],
        depth: usize,
    ) -> Option<(&'a Node<V>, usize)> {
        let remaining = &prefix[depth..];
        let matched = node.prefix.check(prefix, depth);

        if matched == remaining.len() {
            // The query prefix ends inside (or exactly at) this node's own
            // prefix: everything under this node qualifies.
            return Some((node, depth));
        }
        if matched != node.prefix.len() {
            // Node's prefix diverges from the query before either runs out.
            return None;
        }

        let next_depth = depth + node.prefix.len();
        let k = prefix[next_depth];
        let child = node.seek_child(k)?;
        Self::find_prefix_node(child, prefix, next_depth)
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            node_stats: HashMap::new(),
            num_leaves: 0,
            num_values: 0,
            num_inner_nodes: 0,
            total_density: 0.0,
            max_height: 0,
        };
        Self::stats_recurse(&self.root, &mut stats, 1);

        let mut total_children = 0;
        let mut total_width = 0;
        let mut total_inner_nodes = 0;
        for ns in stats.node_stats.values_mut() {
            total_children += ns.total_children;
            total_width += ns.width * ns.total_nodes;
            total_inner_nodes += ns.total_nodes;
            ns.density = ns.total_children as f64 / (ns.width * ns.total_nodes) as f64;
        }
        stats.num_inner_nodes = total_inner_nodes;
        stats.total_density = if total_width == 0 {
            0.0
        } else {
            total_children as f64 / total_width as f64
        };
        stats
    }

    fn stats_recurse(node: &Node<V>, stats: &mut TreeStats, height: usize) {
        if height > stats.max_height {
            stats.max_height = height;
        }
        if node.value().is_some() {
            stats.num_values += 1;
        }
        if node.is_leaf() {
            stats.num_leaves += 1;
        } else {
            let entry = stats
                .node_stats
                .entry(node.capacity())
                .or_insert_with(|| NodeStats {
                    width: node.capacity(),
                    total_nodes: 0,
                    total_children: 0,
                    density: 0.0,
                });
            entry.total_nodes += 1;
            entry.total_children += node.num_children();
        }
        for (_, child) in node.iter() {
            Self::stats_recurse(child, stats, height + 1);
        }
    }

    /// Approximate live memory footprint of the tree, counting node headers
    /// and any heap-allocated (over-length) prefixes. Computed on demand by
    /// walking the tree rather than maintained as a running counter -- see
    /// DESIGN.md for why this crate scopes it per-instance.
    pub fn memory_bytes(&self) -> usize {
        Self::memory_bytes_recurse(&self.root)
    }

    fn memory_bytes_recurse(node: &Node<V>) -> usize {
        let mut total = std::mem::size_of::<Node<V>>() + node.prefix.heap_bytes();
        for (_, child) in node.iter() {
            total += Self::memory_bytes_recurse(child);
        }
        total
    }

    pub fn print_tree(&self)
    where
        V: Debug,
    {
        Self::print_tree_recurse(&self.root, 0);
    }

    fn print_tree_recurse(node: &Node<V>, depth: usize)
    where
        V: Debug,
    {
        let indent = "  ".repeat(depth);
        eprintln!(
            "{}{} prefix={:?} value={:?} children={}",
            indent,
            node.node_type_name(),
            node.prefix.as_slice(),
            node.value(),
            node.num_children()
        );
        for (k, child) in node.iter() {
            eprintln!("{}  ({:02x}) =>", indent, k);
            Self::print_tree_recurse(child, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::SliceRandom;
    use rand::{thread_rng, Rng};
    use std::collections::BTreeMap;

    #[test]
    fn test_scenario_a_nested_prefixes() {
        let mut t = AdaptiveRadixTree::new();
        t.put(b"a", 1);
        t.put(b"ab", 2);
        t.put(b"abc", 3);
        assert_eq!(t.get(b"a"), Some(&1));
        assert_eq!(t.get(b"ab"), Some(&2));
        assert_eq!(t.get(b"abc"), Some(&3));
        assert_eq!(t.get(b"abcd"), None);
    }

    #[test]
    fn test_scenario_b_split() {
        let mut t = AdaptiveRadixTree::new();
        t.put(b"abcxyz", 1);
        t.put(b"abcuvw", 2);
        assert_eq!(t.get(b"abcxyz"), Some(&1));
        assert_eq!(t.get(b"abcuvw"), Some(&2));
        assert_eq!(t.get(b"abc"), None);
    }

    #[test]
    fn test_scenario_c_all_single_byte_keys() {
        let mut t = AdaptiveRadixTree::new();
        for b in 0..=255u16 {
            t.put(&[b as u8], (b + 1) as u16);
        }
        for b in 0..=255u16 {
            assert_eq!(t.get(&[b as u8]), Some(&((b + 1) as u16)));
        }
        assert_eq!(t.root.node_type_name(), "Radix");
    }

    #[test]
    fn test_scenario_d_remove_prefix_key() {
        let mut t = AdaptiveRadixTree::new();
        t.put(b"cat", 1);
        t.put(b"car", 2);
        t.put(b"cart", 3);
        assert!(t.remove(b"car"));
        assert_eq!(t.get(b"cat"), Some(&1));
        assert_eq!(t.get(b"cart"), Some(&3));
        assert_eq!(t.get(b"car"), None);
    }

    #[test]
    fn test_scenario_e_double_remove() {
        let mut t = AdaptiveRadixTree::new();
        t.put(b"x", 1);
        assert!(t.remove(b"x"));
        assert!(!t.remove(b"x"));
        assert_eq!(t.get(b"x"), None);
    }

    #[test]
    fn test_put_overwrites() {
        let mut t = AdaptiveRadixTree::new();
        assert_eq!(t.put(b"k", 1), None);
        assert_eq!(t.put(b"k", 2), Some(1));
        assert_eq!(t.get(b"k"), Some(&2));
    }

    #[test]
    fn test_independence_on_remove() {
        let mut t = AdaptiveRadixTree::new();
        t.put(b"alpha", 1);
        t.put(b"beta", 2);
        t.remove(b"alpha");
        assert_eq!(t.get(b"beta"), Some(&2));
    }

    #[test]
    fn test_rejects_out_of_range_lengths() {
        let mut t: AdaptiveRadixTree<i32> = AdaptiveRadixTree::new();
        assert_eq!(t.put(b"", 1), None);
        assert_eq!(t.get(b""), None);
        assert!(!t.remove(b""));
        let too_long = vec![b'a'; 256];
        assert_eq!(t.put(&too_long, 1), None);
        assert_eq!(t.get(&too_long), None);
    }

    #[test]
    fn test_memory_neutral_after_full_cycle() {
        let mut t = AdaptiveRadixTree::new();
        let baseline = t.memory_bytes();
        let keys: Vec<Vec<u8>> = (0u32..2000)
            .map(|i| format!("key-{i}").into_bytes())
            .collect();
        for (i, k) in keys.iter().enumerate() {
            t.put(k, i);
        }
        for k in &keys {
            assert!(t.remove(k));
        }
        assert_eq!(t.memory_bytes(), baseline);
    }

    #[test]
    fn test_bulk_random_bytes_against_btreemap_oracle() {
        let mut tree = AdaptiveRadixTree::new();
        let mut oracle: BTreeMap<Vec<u8>, u32> = BTreeMap::new();
        let mut rng = thread_rng();

        let mut keys: Vec<Vec<u8>> = Vec::new();
        for _ in 0..10_000 {
            let len = rng.gen_range(1..=64);
            let key: Vec<u8> = (0..len).map(|_| rng.gen::<u8>()).collect();
            keys.push(key);
        }
        keys.shuffle(&mut rng);

        for (i, k) in keys.iter().enumerate() {
            tree.put(k, i as u32);
            oracle.insert(k.clone(), i as u32);
        }
        for k in &keys {
            assert_eq!(tree.get(k), oracle.get(k));
        }

        keys.reverse();
        for k in &keys {
            let oracle_had = oracle.remove(k).is_some();
            assert_eq!(tree.remove(k), oracle_had);
            assert_eq!(tree.get(k), None);
        }
    }

    #[test]
    fn test_tree_stats_tracks_value_count() {
        let mut t = AdaptiveRadixTree::new();
        for i in 0u32..100 {
            t.put(&i.to_be_bytes(), i);
        }
        let stats = t.stats();
        assert_eq!(stats.num_values, 100);
    }
}
