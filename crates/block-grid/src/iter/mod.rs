//! Iterators over grid nodes, cells, coordinates and values.
//!
//! All iterators are forward only and enumerate in row-major order with X
//! fastest. Each offers `step()` for single moves and `advance(offset)` for
//! O(1) jumps, and ends on the sentinel index `(0, 0, dims[2])`.

mod boxed;
mod coord;
mod cursor;
mod values;

pub use boxed::{CellBoxIter, NodeBoxIter};
pub use coord::{BoxPredicate, CoordIter};
pub use cursor::{IndexCursor, IndexIter};
pub use values::ValueIter;
