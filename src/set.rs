mod node;
mod inorder;

pub use node::*;
pub use inorder::*;

use std::fmt;
use std::borrow::Borrow;

use crate::error::LinkError;
use crate::map::OrderedMap;

/// An unbalanced binary search tree of values
///
/// Routing rule: for each node with value `v`:
/// - Values that compare greater than `v` are placed in the left subtree
/// - All other values are placed in the right subtree
///
/// Adding a value that is already present adds another node holding it. See
/// [`OrderedMap`](crate::OrderedMap) for how removal reshapes the tree.
#[derive(Clone)]
pub struct OrderedSet<T> {
    items: OrderedMap<T, ()>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self {
            items: Default::default(),
        }
    }
}

impl<T> fmt::Debug for OrderedSet<T>
    where T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSet")
            .field("root", &self.root())
            .finish()
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.eq(&other.items)
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> OrderedSet<T> {
    /// Creates an empty `OrderedSet`
    ///
    /// The set is initially created with a capacity of 0, so it will not allocate until it is first
    /// added to.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedSet;
    /// let set: OrderedSet<&str> = OrderedSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with space for at least `capacity` values
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedSet;
    /// let set: OrderedSet<&str> = OrderedSet::with_capacity(100);
    /// assert!(set.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: OrderedMap::with_capacity(capacity),
        }
    }

    /// Returns the number of nodes in the set, counting duplicates
    ///
    /// Time complexity: `O(1)`
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the number of values the set can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns true if the set is empty
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert!(set.is_empty());
    /// set.add(1);
    /// assert!(!set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reserves space for at least `additional` more values
    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    /// Shrinks the storage of the set as much as possible
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
    }

    /// Clears the set, removing all values
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Performs an in-order traversal of the tree
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// for &value in &[5, 3, 8, 3, 9] {
    ///     set.add(value);
    /// }
    ///
    /// let values: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(values, [3, 3, 5, 8, 9]);
    /// ```
    pub fn iter(&self) -> Iter<T> {
        Iter::new(&self.items)
    }

    /// Returns the root node of the tree, or `None` if the tree is empty
    ///
    /// This is a low-level API meant for inspecting the exact shape of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.add(5);
    /// set.add(8);
    /// set.add(3);
    ///
    /// let root = set.root().unwrap();
    /// assert_eq!(root.value(), &5);
    /// // Greater values go left
    /// assert_eq!(root.left().map(|node| *node.value()), Some(8));
    /// assert_eq!(root.right().map(|node| *node.value()), Some(3));
    /// ```
    pub fn root(&self) -> Option<Node<T>> {
        self.items.root().map(Node::new)
    }

    /// Verifies the father links of every node. See [`OrderedMap::check_links`].
    pub fn check_links(&self) -> Result<(), LinkError> {
        self.items.check_links()
    }
}

impl<T: PartialOrd> OrderedSet<T> {
    /// Returns `true` if the value can be found in the set
    ///
    /// The value may be any borrowed form of the set's value type, but the ordering on the borrowed
    /// form must match the ordering on the value type.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.add(String::from("abc"));
    /// assert!(set.contains("abc"));
    /// assert!(!set.contains("def"));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
        where T: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        self.items.contains_key(value)
    }

    /// Returns a reference to the stored value equal to the given one, or `None` if the search
    /// runs off the tree
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.add(4);
    /// assert_eq!(set.try_find(&4), Some(&4));
    /// assert_eq!(set.try_find(&5), None);
    /// ```
    pub fn try_find<Q>(&self, value: &Q) -> Option<&T>
        where T: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        self.items.try_find_key_value(value).map(|(value, ())| value)
    }

    /// Adds a value to the set
    ///
    /// Equal values are not merged. Each call adds a node.
    pub fn add(&mut self, value: T) {
        self.items.add(value, ());
    }

    /// Removes the first node found holding the given value. Does nothing if none is found.
    ///
    /// This can discard other values as well. See [`OrderedMap::remove`] for the exact rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.add(String::from("abc"));
    /// set.remove("abc");
    /// assert!(set.is_empty());
    ///
    /// set.remove("def");
    /// assert!(set.is_empty());
    /// ```
    pub fn remove<Q>(&mut self, value: &Q)
        where T: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        self.items.remove(value)
    }
}
