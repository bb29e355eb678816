mod node;
mod inorder;

pub use node::*;
pub use inorder::*;

use std::fmt;
use std::mem;
use std::borrow::Borrow;
use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::LinkError;
use crate::slab::{Ptr, Slab};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InnerNode<K, V> {
    key: K,
    value: V,
    left: Ptr,
    right: Ptr,
    /// Navigation only. Children are owned through `left` and `right`.
    father: Ptr,
}

impl<K, V> InnerNode<K, V> {
    fn new(key: K, value: V, father: Ptr) -> Self {
        Self {
            key,
            value,
            left: Ptr::null(),
            right: Ptr::null(),
            father,
        }
    }
}

/// An unbalanced binary search tree mapping keys to values
///
/// Routing rule: for each node with key `k`:
/// - Keys that compare greater than `k` are placed in the left subtree
/// - All other keys (less than, equal to, or incomparable with `k`) are placed in the right
///   subtree
///
/// Adding a key that is already present inserts another node rather than replacing the existing
/// value. Lookups stop at the first node with an equal key, so the earliest surviving value wins.
///
/// Every node keeps a back-reference to its father. It is only used to navigate upwards during
/// removal and never decides when a node is released.
///
/// Removal follows a fixed set of slot writes that do not check which side of its father the
/// removed node sits on. Depending on the shape of the tree, this can discard sibling subtrees.
/// See [`OrderedMap::remove`] for the exact rules.
///
/// The key type must provide a consistent ordering. That is a precondition and it is not checked.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    nodes: Slab<InnerNode<K, V>>,
    root: Ptr,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            nodes: Default::default(),
            root: Default::default(),
        }
    }
}

impl<K, V> fmt::Debug for OrderedMap<K, V>
    where K: fmt::Debug,
          V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedMap")
            .field("root", &self.root())
            .finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        // Two maps are equal if they produce the same sequence. The slab layout is irrelevant.
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty `OrderedMap`
    ///
    /// The map is initially created with a capacity of 0, so it will not allocate until it is first
    /// added to.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedMap;
    /// let map: OrderedMap<&str, i32> = OrderedMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with space for at least `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: Ptr::null(),
        }
    }

    /// Returns the number of nodes in the tree
    ///
    /// Duplicate keys each count as their own node.
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.add(1, "a");
    /// map.add(1, "b");
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no root
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert!(map.is_empty());
    /// map.add(1, "a");
    /// assert!(!map.is_empty());
    /// map.remove(&1);
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.root.is_null(), self.nodes.is_empty());
        self.root.is_null()
    }

    /// Returns the number of nodes the map can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Reserves space for at least `additional` more nodes
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Shrinks the node storage as much as possible
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Removes every node. The allocated capacity is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = Ptr::null();
    }

    /// Performs an in-order traversal of the tree, yielding each key with its value
    ///
    /// The traversal walks right subtrees before the node itself and left subtrees after it.
    /// Since greater keys are routed left, adding keys without removing any produces them in
    /// ascending order. Removals can reshape the tree and the traversal always follows the actual
    /// shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.add(2, "b");
    /// map.add(3, "c");
    /// map.add(1, "a");
    ///
    /// let pairs: Vec<_> = map.iter().collect();
    /// assert_eq!(pairs, [(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    /// ```
    pub fn iter(&self) -> Iter<K, V> {
        Iter::new(&self.nodes, self.root)
    }

    /// Performs an in-order traversal of the tree, yielding only the keys
    pub fn keys(&self) -> Keys<K, V> {
        Keys::new(self.iter())
    }

    /// Performs an in-order traversal of the tree, yielding only the values
    pub fn values(&self) -> Values<K, V> {
        Values::new(self.iter())
    }

    /// Returns the root node of the tree, or `None` if the tree is empty
    ///
    /// This is a low-level API for inspecting the exact shape of the tree. For ordered access,
    /// use the iteration methods.
    pub fn root(&self) -> Option<Node<K, V>> {
        Node::new(&self.nodes, self.root)
    }

    /// Verifies that every father link agrees with the child slot holding the node, and that
    /// every stored node is reachable exactly once from the root
    ///
    /// All operations on the tree preserve these properties, so this always returns `Ok(())`
    /// unless there is a bug.
    pub fn check_links(&self) -> Result<(), LinkError> {
        let root = match self.nodes.get(self.root) {
            Some(root) => root,
            None if self.nodes.is_empty() => return Ok(()),
            None => return Err(LinkError::Unreachable {live: self.nodes.len(), reachable: 0}),
        };

        if let Some(father) = root.father.into_index() {
            return Err(LinkError::RootHasFather {root: index_of(self.root), father});
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(ptr) = stack.pop() {
            if !seen.insert(ptr) {
                return Err(LinkError::SharedNode {node: index_of(ptr)});
            }

            let node = &self.nodes[ptr];
            for &child in &[node.left, node.right] {
                if child.is_null() {
                    continue;
                }

                let child_node = self.nodes.get(child).ok_or(LinkError::Dangling {
                    child: index_of(child),
                    holder: index_of(ptr),
                })?;
                if child_node.father != ptr {
                    return Err(LinkError::FatherMismatch {
                        child: index_of(child),
                        holder: index_of(ptr),
                        father: child_node.father.into_index(),
                    });
                }

                stack.push(child);
            }
        }

        if seen.len() != self.nodes.len() {
            return Err(LinkError::Unreachable {live: self.nodes.len(), reachable: seen.len()});
        }

        Ok(())
    }

    /// Points the left slot of `father` at `child`, returning the previous occupant
    fn link_left(&mut self, father: Ptr, child: Ptr) -> Ptr {
        let prev = mem::replace(&mut self.nodes[father].left, child);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.father = father;
        }
        prev
    }

    /// Points the right slot of `father` at `child`, returning the previous occupant
    fn link_right(&mut self, father: Ptr, child: Ptr) -> Ptr {
        let prev = mem::replace(&mut self.nodes[father].right, child);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.father = father;
        }
        prev
    }

    /// Releases every node of the subtree rooted at `ptr` and returns how many there were
    fn discard(&mut self, ptr: Ptr) -> usize {
        let mut released = 0;
        let mut stack = vec![ptr];
        while let Some(ptr) = stack.pop() {
            if let Some(node) = self.nodes.remove(ptr) {
                released += 1;
                stack.push(node.left);
                stack.push(node.right);
            }
        }

        released
    }
}

impl<K: PartialOrd, V> OrderedMap<K, V> {
    /// Returns `true` if a node with the given key can be found
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.add(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
        where K: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        !self.find_node(key).is_null()
    }

    /// Returns a reference to the value of the first node found with the given key, or `None` if
    /// the search runs off the tree
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering on the borrowed
    /// form must match the ordering on the key type.
    ///
    /// Time complexity: `O(depth)`
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.add(String::from("one"), 1);
    /// assert_eq!(map.try_find("one"), Some(&1));
    /// assert_eq!(map.try_find("two"), None);
    /// ```
    pub fn try_find<Q>(&self, key: &Q) -> Option<&V>
        where K: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        self.nodes.get(self.find_node(key)).map(|node| &node.value)
    }

    /// Returns the key and value of the first node found with the given key
    pub fn try_find_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
        where K: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        self.nodes.get(self.find_node(key)).map(|node| (&node.key, &node.value))
    }

    /// Adds a new node to the tree
    ///
    /// The key is routed left at every node with a smaller key and right at every other node
    /// until an empty slot is reached. Existing nodes are never updated, even when the key is
    /// already present.
    ///
    /// Time complexity: `O(depth)`
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.add(37, "a");
    /// map.add(37, "b");
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.try_find(&37), Some(&"a"));
    /// ```
    pub fn add(&mut self, key: K, value: V) {
        let mut father = match self.root.non_null() {
            Some(root) => root,
            None => {
                self.root = self.nodes.push(InnerNode::new(key, value, Ptr::null()));
                trace!("added root node");
                return;
            },
        };

        let mut depth = 1usize;
        loop {
            let node = &self.nodes[father];
            let goes_left = key > node.key;
            let next = if goes_left { node.left } else { node.right };

            match next.non_null() {
                Some(next) => {
                    father = next;
                    depth += 1;
                },

                None => {
                    let ptr = self.nodes.push(InnerNode::new(key, value, father));
                    let father_node = &mut self.nodes[father];
                    if goes_left {
                        father_node.left = ptr;
                    } else {
                        father_node.right = ptr;
                    }

                    trace!(depth, goes_left, "added node");
                    return;
                },
            }
        }
    }

    /// Removes the first node found with the given key. Does nothing if no node is found.
    ///
    /// With `curr` as the node found and `father` as its father, exactly one of these applies:
    ///
    /// 1. `curr` is the root: its right subtree becomes the tree if it has one, otherwise its
    ///    left subtree does. The other subtree is discarded.
    /// 2. `curr` is a leaf: both child slots of `father` are cleared, discarding any sibling.
    /// 3. `curr` only has a right child: `father`'s **right** slot takes that child, no matter
    ///    which side `curr` was on. Whatever held the slot before is discarded. If `curr` was on
    ///    the left, it stays there without children.
    /// 4. `curr` only has a left child: same as 3 with the **left** slot.
    /// 5. `curr` has two children: `next` is found by following left links starting from `curr`.
    ///    `next`'s father gets `next`'s right subtree in its left slot. Then `next` goes into
    ///    `father`'s left slot if its key is greater than `father`'s key, and otherwise into the
    ///    right slot, discarding whatever was there. `next` takes over both children of `curr`
    ///    and `curr` is released.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.add(5, "five");
    /// map.add(8, "eight");
    /// map.add(3, "three");
    ///
    /// // 3 is a leaf, so its father loses both children
    /// map.remove(&3);
    /// assert_eq!(map.keys().collect::<Vec<_>>(), [&5]);
    ///
    /// // Missing keys are ignored
    /// map.remove(&42);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q)
        where K: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        let curr = self.find_node(key);
        let (father, left, right) = match self.nodes.get(curr) {
            Some(node) => (node.father, node.left, node.right),
            None => return,
        };

        if father.is_null() {
            let (survivor, dropped) = if right.is_null() {
                (left, Ptr::null())
            } else {
                (right, left)
            };

            self.root = survivor;
            if let Some(root) = self.nodes.get_mut(survivor) {
                root.father = Ptr::null();
            }
            self.nodes.remove(curr);
            let released = self.discard(dropped);

            debug!(released, "removed root node");
            return;
        }

        match (left.non_null(), right.non_null()) {
            (None, None) => {
                let father_node = &mut self.nodes[father];
                let prev_left = mem::replace(&mut father_node.left, Ptr::null());
                let prev_right = mem::replace(&mut father_node.right, Ptr::null());
                let released = self.discard(prev_left) + self.discard(prev_right);

                debug!(released, "removed leaf node");
            },

            (None, Some(right)) => {
                self.nodes[curr].right = Ptr::null();
                let prev = self.link_right(father, right);
                let kept_in_place = prev != curr;
                let released = self.discard(prev);

                debug!(released, kept_in_place, "removed node with a right child");
            },

            (Some(left), None) => {
                self.nodes[curr].left = Ptr::null();
                let prev = self.link_left(father, left);
                let kept_in_place = prev != curr;
                let released = self.discard(prev);

                debug!(released, kept_in_place, "removed node with a left child");
            },

            (Some(_), Some(_)) => self.splice_successor(curr, father),
        }
    }

    fn splice_successor(&mut self, curr: Ptr, father: Ptr) {
        let mut next = curr;
        while let Some(left) = self.nodes[next].left.non_null() {
            next = left;
        }

        // `next` has no left child. Whatever is on its right takes its place.
        let next_father = self.nodes[next].father;
        let next_right = mem::replace(&mut self.nodes[next].right, Ptr::null());
        let detached = self.link_left(next_father, next_right);
        debug_assert_eq!(detached, next);

        let curr_node = &mut self.nodes[curr];
        let curr_left = mem::replace(&mut curr_node.left, Ptr::null());
        let curr_right = mem::replace(&mut curr_node.right, Ptr::null());

        let goes_left = self.nodes[next].key > self.nodes[father].key;
        let prev = if goes_left {
            self.link_left(father, next)
        } else {
            self.link_right(father, next)
        };

        let mut released = 0;
        if prev != curr {
            released += self.discard(prev);

            // `curr` is still held by the other slot
            let father_node = &mut self.nodes[father];
            if father_node.left == curr {
                father_node.left = Ptr::null();
            } else if father_node.right == curr {
                father_node.right = Ptr::null();
            }
        }
        self.nodes.remove(curr);
        released += 1;

        self.link_left(next, curr_left);
        self.link_right(next, curr_right);

        debug!(released, goes_left, "removed node with two children");
    }

    /// Returns the first node on the search path whose key is equal to `key`, or `Ptr::null()`
    fn find_node<Q>(&self, key: &Q) -> Ptr
        where K: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        let mut current = self.root;
        while let Some(node) = self.nodes.get(current) {
            let node_key: &Q = node.key.borrow();
            if node_key == key {
                return current;
            }

            current = if node_key > key { node.right } else { node.left };
        }

        Ptr::null()
    }
}

/// Only ever called on pointers to live nodes
fn index_of(ptr: Ptr) -> usize {
    ptr.into_index().unwrap_or(usize::MAX)
}
