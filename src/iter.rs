use crate::node::Node;

/// Depth-first walk over a tree (or subtree) yielding `(key, value)` pairs in
/// byte-lexicographic order. One frame per node on the current root-to-node
/// path, each remembering which child to visit next, so iteration uses O(depth)
/// auxiliary space rather than collecting into a `Vec` up front.
pub struct Iter<'a, V> {
    stack: Vec<Frame<'a, V>>,
}

struct Frame<'a, V> {
    key: Vec<u8>,
    node: &'a Node<V>,
    value_visited: bool,
    children: Box<dyn Iterator<Item = (u8, &'a Node<V>)> + 'a>,
}

fn frame_for<V>(mut key_before: Vec<u8>, node: &Node<V>) -> Frame<'_, V> {
    key_before.extend_from_slice(node.prefix.as_slice());
    Frame {
        key: key_before,
        node,
        value_visited: false,
        children: node.iter(),
    }
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(root: &'a Node<V>) -> Self {
        Self {
            stack: vec![frame_for(Vec::new(), root)],
        }
    }

    pub(crate) fn empty() -> Self {
        Self { stack: Vec::new() }
    }

    /// An iterator rooted at `node`, whose full key path consists of
    /// `key_before` (bytes consumed on the way to `node`) plus `node`'s own
    /// prefix plus everything beneath it.
    pub(crate) fn new_scoped(node: &'a Node<V>, key_before: Vec<u8>) -> Self {
        Self {
            stack: vec![frame_for(key_before, node)],
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let idx = self.stack.len().checked_sub(1)?;
            let node = self.stack[idx].node;

            if !self.stack[idx].value_visited {
                self.stack[idx].value_visited = true;
                if let Some(v) = node.value() {
                    let key = self.stack[idx].key.clone();
                    return Some((key, v));
                }
            }

            match self.stack[idx].children.next() {
                Some((b, child)) => {
                    let mut key_before = self.stack[idx].key.clone();
                    key_before.push(b);
                    self.stack.push(frame_for(key_before, child));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
