use std::mem;
use std::ops::{Index, IndexMut};

#[cfg(test)]
use static_assertions::const_assert_eq;

/// An index into a slab, or "null"
///
/// This type is essentially `Option<usize>`. The value usize::MAX is
/// reserved to represent `None` or "null".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Ptr(usize);

// Every node stores three of these, so they need to stay as small as a plain index
#[cfg(test)]
const_assert_eq!(mem::size_of::<Ptr>(), mem::size_of::<usize>());
// Using `Option<usize>` directly would double that
#[cfg(test)]
const_assert_eq!(mem::size_of::<Option<usize>>(), 2 * mem::size_of::<usize>());

impl Default for Ptr {
    #[inline(always)]
    fn default() -> Self {
        Self::null()
    }
}

impl Ptr {
    #[inline(always)]
    pub fn new(index: usize) -> Option<Self> {
        if index == usize::MAX {
            None
        } else {
            Some(Ptr(index))
        }
    }

    #[inline(always)]
    pub fn null() -> Self {
        Ptr(usize::MAX)
    }

    // Methods on this type must be `#[inline]` to help the compiler see that the `Option` values
    // are only intermediate values used to make writing code easier. Instead of checking for `None`
    // and then `usize::MAX`, we want the compiler to just check the latter.
    #[inline(always)]
    pub fn into_index(self) -> Option<usize> {
        let Ptr(index) = self;
        if index == usize::MAX {
            None
        } else {
            Some(index)
        }
    }

    /// Returns `Some(self)` unless this is the null pointer
    #[inline(always)]
    pub fn non_null(self) -> Option<Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    #[inline(always)]
    pub fn is_null(self) -> bool {
        self.0 == usize::MAX
    }
}

#[derive(Debug, Clone)]
enum Entry<T> {
    Occupied(T),
    /// An item in the free list
    Vacant {
        /// The next entry in the free list or `Ptr::null()` if this is the last entry in the free
        /// list
        next: Ptr,
    },
}

/// An allocation primitive similar to `Vec`, but implemented to reuse space from removed entries.
///
/// Items are kept contiguously in memory, but indexes are not shifted when an individual item is
/// removed. Instead of always pushing items after the previously pushed item, this data structure
/// will reuse space from previously removed entries when possible. This makes removal cheaper than
/// a standard `Vec<T>`.
///
/// Indexing a vacant entry panics. The tree only ever holds pointers to live entries, so hitting
/// that panic means a link was not updated when its target was removed.
#[derive(Debug, Clone)]
pub struct Slab<T> {
    items: Vec<Entry<T>>,
    /// The first entry in the free list or `Ptr::null()` if the free list is empty
    ///
    /// The free list is a linked list stored in `items` that is used as a stack to track which
    /// entries have space that can be reused in calls to `push`.
    free_list_head: Ptr,
    /// The length of the free list
    free_len: usize,
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self {
            items: Vec::default(),
            free_list_head: Ptr::null(),
            free_len: 0,
        }
    }
}

impl<T> Slab<T> {
    /// Creates an empty slab
    ///
    /// The slab is initially created with a capacity of 0, so it will not allocate until it is
    /// first inserted into.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty slab with the specified capacity.
    ///
    /// The slab will be able to hold at least `capacity` elements without reallocating. If
    /// `capacity` is 0, the slab will not allocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns the number of entries in the slab that contain values
    ///
    /// This is the number of items pushed minus the number of items removed
    pub fn len(&self) -> usize {
        self.items.len() - self.free_len
    }

    /// Returns true if the slab is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the slab can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns a reference to a value in the slab, or `None` if the pointer is null, out of
    /// bounds, or refers to an entry that was removed
    pub fn get(&self, ptr: Ptr) -> Option<&T> {
        match self.items.get(ptr.into_index()?)? {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => None,
        }
    }

    /// Returns a mutable reference to a value in the slab, or `None` if the pointer is null, out
    /// of bounds, or refers to an entry that was removed
    pub fn get_mut(&mut self, ptr: Ptr) -> Option<&mut T> {
        match self.items.get_mut(ptr.into_index()?)? {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => None,
        }
    }

    /// Pushes a value into the slab and returns the pointer at which it was inserted.
    ///
    /// The item may be inserted at the end of the list, or in the space from an item was previously
    /// removed.
    pub fn push(&mut self, value: T) -> Ptr {
        // Check if we can reuse some space from the free list
        if let Some(free_list_head) = self.free_list_head.into_index() {
            let entry = &mut self.items[free_list_head];
            let next_free = match *entry {
                Entry::Vacant {next} => next,
                Entry::Occupied(_) => unreachable!("free list points at an occupied entry"),
            };

            self.free_list_head = next_free;
            self.free_len -= 1;
            *entry = Entry::Occupied(value);

            return Ptr(free_list_head);
        }

        let index = self.items.len();
        // Since we store `Ptr` internally, we can't have usize::MAX as a valid index into the slab
        if index >= usize::MAX {
            panic!("cannot have more than usize::MAX - 1 entries in slab");
        }

        self.items.push(Entry::Occupied(value));

        Ptr(index)
    }

    /// Removes an item from the slab, returning its value, or `None` if there was no value at
    /// that pointer.
    ///
    /// The space for the item will be reused in future calls to `push`. This does not move or
    /// modify any other entries in the slab. Their pointers remain the same and can still be used.
    pub fn remove(&mut self, ptr: Ptr) -> Option<T> {
        let entry = self.items.get_mut(ptr.into_index()?)?;
        if let Entry::Vacant {..} = entry {
            return None;
        }

        let prev = mem::replace(entry, Entry::Vacant {next: self.free_list_head});
        self.free_list_head = ptr;
        self.free_len += 1;

        match prev {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => unreachable!(),
        }
    }

    /// Clears the slab, removing all values.
    ///
    /// Note that this method has no effect on the allocated capacity of the slab.
    ///
    /// This invalidates all previous pointers returned from `push`.
    pub fn clear(&mut self) {
        self.items.clear();
        self.free_list_head = Ptr::null();
        self.free_len = 0;
    }

    /// Reserves capacity for at least `additional` more elements to be inserted in the slab.
    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional)
    }

    /// Shrinks the capacity of the slab as much as possible.
    ///
    /// Vacant entries still take up space, so this can only drop down to the number of entries
    /// ever pushed since the last `clear`.
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit()
    }
}

impl<T> Index<Ptr> for Slab<T> {
    type Output = T;

    fn index(&self, ptr: Ptr) -> &T {
        match self.get(ptr) {
            Some(value) => value,
            None => panic!("no value in slab at {:?}", ptr),
        }
    }
}

impl<T> IndexMut<Ptr> for Slab<T> {
    fn index_mut(&mut self, ptr: Ptr) -> &mut T {
        match self.get_mut(ptr) {
            Some(value) => value,
            None => panic!("no value in slab at {:?}", ptr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::rc::Rc;

    #[test]
    fn ptr_api() {
        let ptr = Ptr::null();
        assert!(ptr.is_null());
        assert_eq!(ptr.into_index(), None);
        assert_eq!(ptr.non_null(), None);
        assert_eq!(Ptr::default(), ptr);

        assert_eq!(Ptr::new(usize::MAX), None);

        let ptr = Ptr::new(3).unwrap();
        assert!(!ptr.is_null());
        assert_eq!(ptr.into_index(), Some(3));
        assert_eq!(ptr.non_null(), Some(ptr));
    }

    #[test]
    fn slab_push_remove() {
        let mut slab = Slab::new();
        assert_eq!(slab.len(), 0);
        assert!(slab.is_empty());

        let ptr0 = slab.push(57);
        let ptr1 = slab.push(999);
        assert_eq!(slab.len(), 2);
        assert_eq!(slab[ptr0], 57);
        assert_eq!(slab[ptr1], 999);

        assert_eq!(slab.remove(ptr0), Some(57));
        assert_eq!(slab.len(), 1);
        assert_eq!(slab.get(ptr0), None);
        assert_eq!(slab[ptr1], 999);

        // Removing twice does nothing
        assert_eq!(slab.remove(ptr0), None);
        assert_eq!(slab.len(), 1);

        // The removed entry is reused
        let ptr2 = slab.push(12);
        assert_eq!(ptr2, ptr0);
        assert_eq!(slab[ptr2], 12);
        assert_eq!(slab.len(), 2);

        assert_eq!(slab.remove(Ptr::null()), None);
        assert_eq!(slab.remove(Ptr::new(100).unwrap()), None);
    }

    #[test]
    fn slab_free_list_is_a_stack() {
        let mut slab = Slab::new();
        let ptrs: Vec<_> = (0..5).map(|i| slab.push(i)).collect();

        slab.remove(ptrs[1]);
        slab.remove(ptrs[3]);

        // Most recently freed space gets reused first
        assert_eq!(slab.push(30), ptrs[3]);
        assert_eq!(slab.push(10), ptrs[1]);
        // Free list exhausted, so this goes at the end
        assert_eq!(slab.push(5).into_index(), Some(5));

        let values: Vec<_> = ptrs.iter().map(|&ptr| slab[ptr]).collect();
        assert_eq!(&values, &[0, 10, 2, 30, 4]);
    }

    #[test]
    fn slab_get_mut() {
        let mut slab = Slab::new();
        let ptr = slab.push(-12);
        slab[ptr] *= -1;
        assert_eq!(slab[ptr], 12);

        if let Some(value) = slab.get_mut(ptr) {
            *value += 1;
        }
        assert_eq!(slab.get(ptr), Some(&13));
        assert_eq!(slab.get_mut(Ptr::null()), None);
    }

    #[test]
    #[should_panic(expected = "no value in slab")]
    fn slab_index_vacant() {
        let mut slab = Slab::new();
        let ptr = slab.push("abc");
        slab.remove(ptr);
        let _ = slab[ptr];
    }

    #[test]
    fn slab_clear() {
        let value = Rc::new(0);
        let mut slab = Slab::with_capacity(4);
        let capacity = slab.capacity();
        assert!(capacity >= 4);

        let ptr = slab.push(value.clone());
        slab.push(value.clone());
        slab.remove(ptr);
        assert_eq!(Rc::strong_count(&value), 2);

        slab.clear();
        assert!(slab.is_empty());
        assert_eq!(slab.capacity(), capacity);
        // Everything still in the slab was dropped
        assert_eq!(Rc::strong_count(&value), 1);

        // Insertions after a clear start from the beginning again
        assert_eq!(slab.push(value.clone()).into_index(), Some(0));
        assert_eq!(slab.len(), 1);
    }

    #[test]
    fn slab_capacity() {
        let mut slab = Slab::new();
        assert_eq!(slab.capacity(), 0);

        slab.reserve(10);
        assert!(slab.capacity() >= 10);

        slab.push(1);
        slab.shrink_to_fit();
        assert!(slab.capacity() >= 1 && slab.capacity() < 10);
    }
}
