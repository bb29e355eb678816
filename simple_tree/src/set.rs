use std::borrow::Borrow;

use crate::map::{SimpleTreeMap, Node};

/// Set counterpart of `SimpleTreeMap`
#[derive(Debug, Clone)]
pub struct SimpleTreeSet<T> {
    items: SimpleTreeMap<T, ()>,
}

impl<T> Default for SimpleTreeSet<T> {
    fn default() -> Self {
        Self {
            items: Default::default(),
        }
    }
}

impl<T: PartialOrd> SimpleTreeSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
        where T: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        self.items.try_find(value).is_some()
    }

    pub fn add(&mut self, value: T) {
        self.items.add(value, ());
    }

    pub fn remove<Q>(&mut self, value: &Q)
        where T: Borrow<Q>,
              Q: PartialOrd + ?Sized,
    {
        self.items.remove(value);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter_inorder(&self) -> impl Iterator<Item = &T> {
        self.items.iter_inorder().map(|(value, ())| value)
    }

    pub fn root(&self) -> Option<&Node<T, ()>> {
        self.items.root()
    }
}
