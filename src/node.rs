use crate::mapping::direct_mapping::DirectMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::mapping::keyed_mapping::KeyedMapping;
use crate::prefix::Prefix;

/// A single tree node: a compressed path (`prefix`), an optional value, and a
/// child-indexing representation that adapts to fan-out (`ntype`).
///
/// Every variant carries its own value slot, including `Leaf` — a node whose
/// key terminates here but that also has descendants (because another key is
/// a byte-extension of this one) still needs somewhere to keep that value.
pub(crate) struct Node<V> {
    pub(crate) prefix: Prefix,
    pub(crate) value: Option<V>,
    pub(crate) ntype: NodeType<V>,
}

/// Shared interface over the five child-indexing representations. Implemented
/// by each mapping in `crate::mapping`.
pub(crate) trait NodeMapping<N> {
    fn add_child(&mut self, key: u8, node: N);
    fn replace_child(&mut self, key: u8, node: N);
    fn seek_child(&self, key: u8) -> Option<&N>;
    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N>;
    fn delete_child(&mut self, key: u8) -> Option<N>;
    fn num_children(&self) -> usize;
    fn width(&self) -> usize;
}

pub(crate) enum NodeType<V> {
    Leaf,
    Single(KeyedMapping<Node<V>, 1>),
    Linear(KeyedMapping<Node<V>, 4>),
    Linear16(KeyedMapping<Node<V>, 16>),
    Span(IndexedMapping<Node<V>, 48, 1>),
    Radix(DirectMapping<Node<V>>),
}

impl<V> Node<V> {
    #[inline]
    pub(crate) fn new_leaf(prefix: Prefix, value: V) -> Self {
        Self {
            prefix,
            value: Some(value),
            ntype: NodeType::Leaf,
        }
    }

    /// An empty interior node (no value, no children) with the given prefix.
    /// Used both for freshly split nodes and for the tree's root.
    #[inline]
    pub(crate) fn new_inner(prefix: Prefix) -> Self {
        Self {
            prefix,
            value: None,
            ntype: NodeType::Single(KeyedMapping::new()),
        }
    }

    pub(crate) fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    #[allow(dead_code)]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.ntype, NodeType::Leaf)
    }

    pub(crate) fn num_children(&self) -> usize {
        match &self.ntype {
            NodeType::Leaf => 0,
            NodeType::Single(m) => m.num_children(),
            NodeType::Linear(m) => m.num_children(),
            NodeType::Linear16(m) => m.num_children(),
            NodeType::Span(m) => m.num_children(),
            NodeType::Radix(m) => m.num_children(),
        }
    }

    pub(crate) fn seek_child(&self, key: u8) -> Option<&Node<V>> {
        match &self.ntype {
            NodeType::Leaf => None,
            NodeType::Single(m) => m.seek_child(key),
            NodeType::Linear(m) => m.seek_child(key),
            NodeType::Linear16(m) => m.seek_child(key),
            NodeType::Span(m) => m.seek_child(key),
            NodeType::Radix(m) => m.seek_child(key),
        }
    }

    pub(crate) fn seek_child_mut(&mut self, key: u8) -> Option<&mut Node<V>> {
        match &mut self.ntype {
            NodeType::Leaf => None,
            NodeType::Single(m) => m.seek_child_mut(key),
            NodeType::Linear(m) => m.seek_child_mut(key),
            NodeType::Linear16(m) => m.seek_child_mut(key),
            NodeType::Span(m) => m.seek_child_mut(key),
            NodeType::Radix(m) => m.seek_child_mut(key),
        }
    }

    /// Adds a child, growing to the next variant first if at capacity.
    /// Promotes a `Leaf` to `Single` on the first child it ever receives.
    pub(crate) fn add_child(&mut self, key: u8, node: Node<V>) {
        if self.is_leaf() {
            self.ntype = NodeType::Single(KeyedMapping::new());
        }
        if self.is_full() {
            self.grow();
        }
        match &mut self.ntype {
            NodeType::Single(m) => m.add_child(key, node),
            NodeType::Linear(m) => m.add_child(key, node),
            NodeType::Linear16(m) => m.add_child(key, node),
            NodeType::Span(m) => m.add_child(key, node),
            NodeType::Radix(m) => m.add_child(key, node),
            NodeType::Leaf => unreachable!("just promoted out of Leaf"),
        }
    }

    /// Removes the child at `key`, shrinking to the next-smaller variant when
    /// the new child count drops to that variant's capacity. `Single` that
    /// loses its only child becomes a `Leaf`.
    pub(crate) fn delete_child(&mut self, key: u8) -> Option<Node<V>> {
        match &mut self.ntype {
            NodeType::Leaf => unreachable!("leaf has no children"),
            NodeType::Single(m) => {
                let node = m.delete_child(key);
                if self.num_children() == 0 {
                    self.shrink();
                }
                node
            }
            NodeType::Linear(m) => {
                let node = m.delete_child(key);
                if self.num_children() < 2 {
                    self.shrink();
                }
                node
            }
            NodeType::Linear16(m) => {
                let node = m.delete_child(key);
                if self.num_children() < 5 {
                    self.shrink();
                }
                node
            }
            NodeType::Span(m) => {
                let node = m.delete_child(key);
                if self.num_children() < 17 {
                    self.shrink();
                }
                node
            }
            NodeType::Radix(m) => {
                let node = m.delete_child(key);
                if self.num_children() < 49 {
                    self.shrink();
                }
                node
            }
        }
    }

    #[inline]
    fn is_full(&self) -> bool {
        match &self.ntype {
            NodeType::Leaf => unreachable!("leaf is never grown directly"),
            NodeType::Single(m) => self.num_children() >= m.width(),
            NodeType::Linear(m) => self.num_children() >= m.width(),
            NodeType::Linear16(m) => self.num_children() >= m.width(),
            NodeType::Span(m) => self.num_children() >= m.width(),
            NodeType::Radix(_) => false,
        }
    }

    fn grow(&mut self) {
        match &mut self.ntype {
            NodeType::Leaf => unreachable!("leaf is never grown directly"),
            NodeType::Single(m) => self.ntype = NodeType::Linear(m.resized()),
            NodeType::Linear(m) => self.ntype = NodeType::Linear16(m.resized()),
            NodeType::Linear16(m) => self.ntype = NodeType::Span(m.to_indexed()),
            NodeType::Span(m) => self.ntype = NodeType::Radix(m.to_direct()),
            NodeType::Radix(_) => unreachable!("radix is already the widest variant"),
        }
    }

    fn shrink(&mut self) {
        match &mut self.ntype {
            NodeType::Leaf => unreachable!("leaf cannot shrink further"),
            NodeType::Single(_) => self.ntype = NodeType::Leaf,
            NodeType::Linear(m) => self.ntype = NodeType::Single(m.resized()),
            NodeType::Linear16(m) => self.ntype = NodeType::Linear(m.resized()),
            NodeType::Span(m) => self.ntype = NodeType::Linear16(m.to_keyed()),
            NodeType::Radix(m) => self.ntype = NodeType::Span(m.to_indexed()),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        match &self.ntype {
            NodeType::Leaf => 0,
            NodeType::Single(_) => 1,
            NodeType::Linear(_) => 4,
            NodeType::Linear16(_) => 16,
            NodeType::Span(_) => 48,
            NodeType::Radix(_) => 256,
        }
    }

    /// If this node is now structurally redundant, collapses it in place and
    /// reports whether its *parent* should drop it entirely.
    ///
    /// - `Leaf` with no value: the node holds nothing at all; the caller
    ///   should remove it from its own parent's mapping.
    /// - `Single` with its one child and no value of its own: folds the child
    ///   into this node (concatenated prefix, child's value and mapping),
    ///   since this node serves no purpose beyond a pass-through edge.
    /// - Anything else: left alone.
    pub(crate) fn collapse_if_needed(&mut self) -> bool {
        match &mut self.ntype {
            NodeType::Leaf => self.value.is_none(),
            NodeType::Single(m) if self.value.is_none() && m.num_children() == 1 => {
                let (key, _) = m.iter().next().expect("one child");
                let child = m.delete_child(key).expect("just saw it");
                let mut merged_prefix = self.prefix.as_slice().to_vec();
                merged_prefix.extend_from_slice(child.prefix.as_slice());
                self.prefix = Prefix::from_slice(&merged_prefix);
                self.value = child.value;
                self.ntype = child.ntype;
                false
            }
            _ => false,
        }
    }

    pub(crate) fn iter(&self) -> Box<dyn Iterator<Item = (u8, &Node<V>)> + '_> {
        match &self.ntype {
            NodeType::Leaf => Box::new(std::iter::empty()),
            NodeType::Single(m) => Box::new(m.iter()),
            NodeType::Linear(m) => Box::new(m.iter()),
            NodeType::Linear16(m) => Box::new(m.iter()),
            NodeType::Span(m) => Box::new(m.iter()),
            NodeType::Radix(m) => Box::new(m.iter()),
        }
    }

    pub(crate) fn node_type_name(&self) -> &'static str {
        match &self.ntype {
            NodeType::Leaf => "Leaf",
            NodeType::Single(_) => "Single",
            NodeType::Linear(_) => "Linear",
            NodeType::Linear16(_) => "Linear16",
            NodeType::Span(_) => "Span",
            NodeType::Radix(_) => "Radix",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Node;
    use crate::prefix::Prefix;

    fn leaf(v: u8) -> Node<u8> {
        Node::new_leaf(Prefix::from_slice(b"x"), v)
    }

    #[test]
    fn test_leaf_promotes_to_single_on_first_child() {
        let mut n = Node::new_leaf(Prefix::from_slice(b"abc"), 1u8);
        assert!(n.is_leaf());
        n.add_child(b'z', leaf(2));
        assert!(!n.is_leaf());
        assert_eq!(n.node_type_name(), "Single");
        assert_eq!(*n.value().unwrap(), 1);
        assert_eq!(*n.seek_child(b'z').unwrap().value().unwrap(), 2);
    }

    #[test]
    fn test_grow_ladder_single_to_radix() {
        let mut n = Node::new_inner(Prefix::empty());
        for i in 0..=255u16 {
            n.add_child(i as u8, leaf(i as u8));
        }
        assert_eq!(n.node_type_name(), "Radix");
        assert_eq!(n.num_children(), 256);
        for i in 0..=255u16 {
            assert_eq!(*n.seek_child(i as u8).unwrap().value().unwrap(), i as u8);
        }
    }

    #[test]
    fn test_shrink_ladder_back_to_leaf() {
        let mut n = Node::new_inner(Prefix::empty());
        for i in 0..=255u16 {
            n.add_child(i as u8, leaf(i as u8));
        }
        for i in 0..=255u16 {
            n.delete_child(i as u8);
        }
        assert_eq!(n.node_type_name(), "Leaf");
        assert_eq!(n.num_children(), 0);
    }

    #[test]
    fn test_single_capacity_then_grows_on_second_child() {
        let mut n = Node::new_inner(Prefix::empty());
        n.add_child(b'a', leaf(1));
        assert_eq!(n.node_type_name(), "Single");
        n.add_child(b'b', leaf(2));
        assert_eq!(n.node_type_name(), "Linear");
        assert_eq!(*n.seek_child(b'a').unwrap().value().unwrap(), 1);
        assert_eq!(*n.seek_child(b'b').unwrap().value().unwrap(), 2);
    }

    #[test]
    fn test_collapse_merges_sole_child() {
        let mut n = Node::new_inner(Prefix::from_slice(b"ca"));
        n.add_child(b't', Node::new_leaf(Prefix::from_slice(b"t"), 1u8));
        // no value on n, one child -> should merge away
        let prune = n.collapse_if_needed();
        assert!(!prune);
        assert_eq!(n.prefix.as_slice(), b"cat");
        assert_eq!(*n.value().unwrap(), 1);
        assert!(n.is_leaf());
    }

    #[test]
    fn test_collapse_leaves_node_with_value_alone() {
        let mut n = Node::new_leaf(Prefix::from_slice(b"ca"), 9u8);
        n.add_child(b't', leaf(1));
        // n has its own value, so even though it's a Single with 1 child it
        // must not be merged away.
        assert!(!n.collapse_if_needed());
        assert_eq!(*n.value().unwrap(), 9);
        assert_eq!(n.num_children(), 1);
    }
}
