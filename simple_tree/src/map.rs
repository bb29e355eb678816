use std::mem;
use std::borrow::Borrow;

mod node;
mod inorder;

pub use node::Node;
pub use inorder::*;

use node::{Side, subtree_len};

/// A "simple" tree that uses `Box` for internal storage and keeps no father links
///
/// Follows the same routing and removal rules as `ordtree::OrderedMap`, finding a node's father by
/// replaying the search path instead. Used to test the `ordtree` crate.
#[derive(Debug, Clone)]
pub struct SimpleTreeMap<K, V> {
    root: Option<Box<Node<K, V>>>,
    len: usize,
}

impl<K, V> Default for SimpleTreeMap<K, V> {
    fn default() -> Self {
        Self {
            root: None,
            len: 0,
        }
    }
}

impl<K: PartialOrd, V> SimpleTreeMap<K, V> {
    /// Creates an empty `SimpleTreeMap`
    ///
    /// # Examples
    ///
    /// ```
    /// use simple_tree::SimpleTreeMap;
    /// let map: SimpleTreeMap<&str, i32> = SimpleTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        debug_assert!(self.len != 0 || self.root.is_none());
        self.root.is_none()
    }

    /// Returns the value of the first node found with the given key
    ///
    /// # Examples
    ///
    /// ```
    /// use simple_tree::SimpleTreeMap;
    ///
    /// let mut map = SimpleTreeMap::new();
    /// map.add(1, "a");
    /// assert_eq!(map.try_find(&1), Some(&"a"));
    /// assert_eq!(map.try_find(&2), None);
    /// ```
    pub fn try_find<Q>(&self, key: &Q) -> Option<&V>
        where K: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        let mut current = self.root();
        while let Some(node) = current {
            let node_key: &Q = node.key().borrow();
            if node_key == key {
                return Some(node.value());
            }

            current = if node_key > key { node.right() } else { node.left() };
        }

        None
    }

    /// Adds a node, sending greater keys left and all other keys right
    pub fn add(&mut self, key: K, value: V) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if key > node.key { &mut node.left } else { &mut node.right };
        }

        *slot = Some(Box::new(Node::new(key, value)));
        self.len += 1;
    }

    /// Removes the first node found with the given key, using the same slot writes as
    /// `ordtree::OrderedMap::remove`
    pub fn remove<Q>(&mut self, key: &Q)
        where K: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        let path = match self.find_path(key) {
            Some(path) => path,
            None => return,
        };

        let released = match path.split_last() {
            None => self.remove_root(),
            Some((&side, father_path)) => match self.node_at_mut(father_path) {
                Some(father) => remove_child(father, side),
                None => 0,
            },
        };

        self.len -= released;
    }

    /// Clears the map, removing all elements
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Performs an in-order traversal of the tree, right subtrees first
    pub fn iter_inorder(&self) -> IterInorder<K, V> {
        IterInorder::new(self.root())
    }

    /// Returns the root node of the tree, or `None` if the tree is empty
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    /// The sides taken from the root to reach the first node with the given key
    fn find_path<Q>(&self, key: &Q) -> Option<Vec<Side>>
        where K: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        let mut path = Vec::new();
        let mut current = self.root();
        while let Some(node) = current {
            let node_key: &Q = node.key().borrow();
            if node_key == key {
                return Some(path);
            }

            let side = if node_key > key { Side::Right } else { Side::Left };
            path.push(side);
            current = node.child(side);
        }

        None
    }

    fn node_at_mut(&mut self, path: &[Side]) -> Option<&mut Node<K, V>> {
        let mut node = self.root.as_deref_mut()?;
        for &side in path {
            node = node.child_mut(side).as_deref_mut()?;
        }

        Some(node)
    }

    fn remove_root(&mut self) -> usize {
        let mut root = match self.root.take() {
            Some(root) => root,
            None => return 0,
        };

        let (survivor, dropped) = match root.right.take() {
            Some(right) => (Some(right), root.left.take()),
            None => (root.left.take(), None),
        };
        self.root = survivor;

        1 + subtree_len(&dropped)
    }
}

/// Removes the child of `father` on `side`, returning how many nodes left the tree
fn remove_child<K: PartialOrd, V>(father: &mut Node<K, V>, side: Side) -> usize {
    let curr = match father.child_mut(side) {
        Some(curr) => curr,
        None => return 0,
    };

    match (curr.has_left(), curr.has_right()) {
        (false, false) => {
            let released = subtree_len(&father.left) + subtree_len(&father.right);
            father.left = None;
            father.right = None;
            released
        },

        (false, true) => {
            let right = curr.right.take();
            let prev = mem::replace(&mut father.right, right);
            subtree_len(&prev)
        },

        (true, false) => {
            let left = curr.left.take();
            let prev = mem::replace(&mut father.left, left);
            subtree_len(&prev)
        },

        (true, true) => {
            let mut next = match take_leftmost(&mut curr.left) {
                Some(next) => next,
                None => return 0,
            };
            next.left = curr.left.take();
            next.right = curr.right.take();

            let chosen = if next.key > father.key { Side::Left } else { Side::Right };
            let prev = mem::replace(father.child_mut(chosen), Some(next));
            let mut released = subtree_len(&prev);
            if chosen != side {
                // `curr` was not overwritten
                released += subtree_len(father.child_mut(side));
                *father.child_mut(side) = None;
            }

            released
        },
    }
}

/// Takes the node at the end of the chain of left links starting at `slot`, leaving its right
/// subtree in its place
fn take_leftmost<K, V>(slot: &mut Option<Box<Node<K, V>>>) -> Option<Box<Node<K, V>>> {
    if slot.as_ref()?.has_left() {
        return take_leftmost(&mut slot.as_mut()?.left);
    }

    let mut node = slot.take()?;
    *slot = node.right.take();
    Some(node)
}
