//! Unbalanced binary search trees whose nodes keep a back-reference to their father.
//!
//! [`OrderedMap`] stores key/value pairs and [`OrderedSet`] stores plain values. Both route
//! greater keys to the left, accept duplicate keys, and iterate in-order with an explicit stack.

mod slab;
mod error;

pub mod map;
pub mod set;

pub use error::LinkError;
pub use map::OrderedMap;
pub use set::OrderedSet;
