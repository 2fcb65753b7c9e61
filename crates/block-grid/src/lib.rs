//! Block-tiled structured grids.
//!
//! A [`Grid`] is a 1D, 2D or 3D structured array whose values live in a list
//! of equally sized blocks owned by the caller. The grid interprets those
//! blocks: it maps logical `(i, j, k)` indices to block storage, maps indices
//! to user coordinates on a regular lattice, samples values at arbitrary
//! coordinates and enumerates nodes, cells and values.
//!
//! # Architecture
//!
//! ```text
//! BlockArena (host owned)
//!      │  blocks_mut()
//!      ▼
//! Grid::new(dims, block_size, blocks, topology)
//!      │
//!      ├─► BlockLayout::locate (O(1) block + offset arithmetic)
//!      │
//!      ├─► value(coords) ──► nearest | bilinear / trilinear
//!      │                      (missing value aware corner/edge fallback)
//!      │
//!      ├─► range() ──► rayon chunks over the flat value space
//!      │
//!      └─► node / cell / coord / value iterators (optionally box filtered)
//! ```
//!
//! # Example
//!
//! ```
//! use block_grid::{BlockArena, Grid};
//!
//! let mut arena = BlockArena::from_fn([4, 4, 1], [2, 2, 1], |[i, j, _]| (i + 10 * j) as f32)
//!     .unwrap();
//! let mut grid = Grid::new([4, 4, 1], [2, 2, 1], arena.blocks_mut(), 2).unwrap();
//! grid.set_interpolation_order(1);
//!
//! assert_eq!(grid.access_ijk(3, 2, 0), 23.0);
//! assert_eq!(grid.value([0.5, 0.0, 0.0]), 0.5);
//! ```

pub mod config;
pub mod coords;
pub mod error;
pub mod grid;
pub mod interpolation;
pub mod iter;
pub mod layout;
mod range;

pub use config::GridConfig;
pub use coords::{Coords, Geometry};
pub use error::{GridError, Result};
pub use grid::Grid;
pub use interpolation::{point_on_edge, point_on_node, InterpolationOrder};
pub use iter::{BoxPredicate, CellBoxIter, CoordIter, IndexCursor, IndexIter, NodeBoxIter, ValueIter};
pub use layout::{BlockAddress, BlockArena, BlockLayout, Dims};
