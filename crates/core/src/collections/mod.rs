//! Hash tables specialized for integer keys.

mod int_array_map;
mod int_set_map;

pub use int_array_map::IntArrayKeyMap;
pub use int_set_map::IntToIntSetMap;
