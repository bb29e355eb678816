use std::ptr;
use std::fmt;

use crate::slab::{Ptr, Slab};

use super::InnerNode;

/// A single node of the binary search tree
pub struct Node<'a, K, V> {
    nodes: &'a Slab<InnerNode<K, V>>,
    node: &'a InnerNode<K, V>,
}

impl<'a, K, V> fmt::Debug for Node<'a, K, V>
    where K: fmt::Debug,
          V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printing the father would recurse back down into this node
        f.debug_struct("Node")
            .field("key", self.key())
            .field("value", self.value())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<'a, K, V> Clone for Node<'a, K, V> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, K, V> Copy for Node<'a, K, V> {}

impl<'a, K: PartialEq, V: PartialEq> PartialEq for Node<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        // Same node in the same tree, or two nodes with the same contents. The position in the
        // tree is not compared.
        let ptr_eq = ptr::eq(self.nodes, other.nodes) && ptr::eq(self.node, other.node);
        ptr_eq || (self.key().eq(other.key()) && self.value().eq(other.value()))
    }
}

impl<'a, K: Eq, V: Eq> Eq for Node<'a, K, V> {}

impl<'a, K, V> Node<'a, K, V> {
    /// Creates a view of the node at `ptr`, or returns `None` if `ptr` is null
    pub(super) fn new(nodes: &'a Slab<InnerNode<K, V>>, ptr: Ptr) -> Option<Self> {
        nodes.get(ptr).map(|node| Self {nodes, node})
    }

    /// Returns the key of this node
    pub fn key(&self) -> &'a K {
        &self.node.key
    }

    /// Returns the value of this node
    pub fn value(&self) -> &'a V {
        &self.node.value
    }

    /// Returns true if this node has a left subtree
    pub fn has_left(&self) -> bool {
        !self.node.left.is_null()
    }

    /// Returns true if this node has a right subtree
    pub fn has_right(&self) -> bool {
        !self.node.right.is_null()
    }

    /// Returns the left child node (subtree) of this node, if any
    ///
    /// Keys greater than this node's key are added on this side.
    pub fn left(&self) -> Option<Self> {
        Self::new(self.nodes, self.node.left)
    }

    /// Returns the right child node (subtree) of this node, if any
    pub fn right(&self) -> Option<Self> {
        Self::new(self.nodes, self.node.right)
    }

    /// Returns the node whose child slot holds this node, or `None` for the root
    pub fn father(&self) -> Option<Self> {
        Self::new(self.nodes, self.node.father)
    }
}
