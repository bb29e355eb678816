use std::iter::FusedIterator;

use crate::slab::{Ptr, Slab};

use super::InnerNode;

/// In-order iterator over the entries of an `OrderedMap`
///
/// Each node is yielded after its right subtree and before its left subtree. Only the child
/// links are followed.
pub struct Iter<'a, K, V> {
    nodes: &'a Slab<InnerNode<K, V>>,
    stack: Vec<Ptr>,
}

// See: https://www.geeksforgeeks.org/inorder-tree-traversal-without-recursion/
// (with the roles of left and right swapped)
impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(nodes: &'a Slab<InnerNode<K, V>>, root: Ptr) -> Self {
        let mut iter = Self {nodes, stack: Vec::new()};
        iter.push_right_spine(root);
        iter
    }

    fn push_right_spine(&mut self, mut current: Ptr) {
        while let Some(node) = self.nodes.get(current) {
            self.stack.push(current);
            current = node.right;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let top_ptr = self.stack.pop()?;
        let nodes = self.nodes;
        let node = &nodes[top_ptr];

        self.push_right_spine(node.left);

        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// In-order iterator over the keys of an `OrderedMap`
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(super) fn new(inner: Iter<'a, K, V>) -> Self {
        Self {inner}
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

/// In-order iterator over the values of an `OrderedMap`
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(super) fn new(inner: Iter<'a, K, V>) -> Self {
        Self {inner}
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }
}

impl<'a, K, V> FusedIterator for Values<'a, K, V> {}
