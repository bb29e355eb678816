use std::iter::FusedIterator;

/// In-order iterator over the values of an `OrderedSet`
pub struct Iter<'a, T> {
    inner: crate::map::Keys<'a, T, ()>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(map: &'a crate::map::OrderedMap<T, ()>) -> Self {
        Self {
            inner: map.keys(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}
