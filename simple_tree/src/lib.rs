
pub mod map;
pub mod set;

pub use map::SimpleTreeMap;
pub use set::SimpleTreeSet;
