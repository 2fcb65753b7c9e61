//! Block addressing for tiled grids.
//!
//! A grid of logical extent `dims` is tiled by blocks of `block_size`
//! values per axis. Blocks are numbered X fastest, then Y, then Z, and the
//! values inside a block are laid out the same way. Partial blocks at the
//! upper edges are padded to the full block size.

use crate::error::{GridError, Result};

/// Per-axis extents, X first. Unused axes have extent 1.
pub type Dims = [usize; 3];

/// Location of a single value inside block storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockAddress {
    /// Index of the block in the block list.
    pub block: usize,
    /// Offset of the value inside that block.
    pub offset: usize,
}

/// Pure index arithmetic for a block-tiled grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    dims: Dims,
    block_size: Dims,
    block_dims: Dims,
}

impl BlockLayout {
    /// Create a layout, checking that every extent and block size is positive.
    pub fn new(dims: Dims, block_size: Dims) -> Result<Self> {
        for axis in 0..3 {
            if block_size[axis] == 0 {
                return Err(GridError::invariant(format!(
                    "block size on axis {axis} must be > 0"
                )));
            }
            if dims[axis] == 0 {
                return Err(GridError::invariant(format!(
                    "dimension on axis {axis} must be > 0"
                )));
            }
        }

        let block_dims = [0, 1, 2].map(|axis| ((dims[axis] - 1) / block_size[axis]) + 1);

        Ok(Self {
            dims,
            block_size,
            block_dims,
        })
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn block_size(&self) -> Dims {
        self.block_size
    }

    /// Number of blocks along each axis.
    pub fn block_dims(&self) -> Dims {
        self.block_dims
    }

    /// Total number of blocks needed to tile the grid.
    pub fn num_blocks(&self) -> usize {
        self.block_dims.iter().product()
    }

    /// Number of values stored in one block.
    pub fn block_len(&self) -> usize {
        self.block_size.iter().product()
    }

    /// Number of logical values in the grid.
    pub fn num_values(&self) -> usize {
        self.dims.iter().product()
    }

    /// Clamp each index into `[0, dims - 1]`.
    pub fn clamp(&self, indices: Dims) -> Dims {
        [0, 1, 2].map(|axis| indices[axis].min(self.dims[axis] - 1))
    }

    /// Map an index triple (clamped first) to its block and in-block offset.
    pub fn locate(&self, indices: Dims) -> BlockAddress {
        let [i, j, k] = self.clamp(indices);
        let [bx, by, bz] = self.block_size;
        let [nbx, nby, _] = self.block_dims;

        let block = (k / bz) * nbx * nby + (j / by) * nbx + i / bx;
        let offset = (k % bz) * bx * by + (j % by) * bx + i % bx;

        BlockAddress { block, offset }
    }

    /// Row-major linear index of an index triple, X fastest.
    pub fn linearize(&self, indices: Dims) -> usize {
        let [nx, ny, _] = self.dims;
        indices[0] + indices[1] * nx + indices[2] * nx * ny
    }

    /// Inverse of [`BlockLayout::linearize`].
    pub fn vectorize(&self, linear: usize) -> Dims {
        vectorize(linear, self.dims)
    }
}

/// Expand a row-major linear index (X fastest) into per-axis indices.
pub(crate) fn vectorize(linear: usize, dims: Dims) -> Dims {
    let [nx, ny, _] = dims;
    [linear % nx, (linear / nx) % ny, linear / (nx * ny)]
}

/// Host-side storage for the blocks of one grid.
///
/// The arena owns a single contiguous allocation and hands out one mutable
/// slice per block, which is what [`crate::Grid`] borrows.
#[derive(Debug, Clone)]
pub struct BlockArena {
    layout: BlockLayout,
    data: Vec<f32>,
}

impl BlockArena {
    /// Allocate every block of a grid, filled with `fill`.
    pub fn new(dims: Dims, block_size: Dims, fill: f32) -> Result<Self> {
        let layout = BlockLayout::new(dims, block_size)?;
        let data = vec![fill; layout.num_blocks() * layout.block_len()];
        Ok(Self { layout, data })
    }

    /// Allocate and fill every logical value with `f(indices)`.
    ///
    /// Padding values of partial blocks are zero.
    pub fn from_fn(dims: Dims, block_size: Dims, mut f: impl FnMut(Dims) -> f32) -> Result<Self> {
        let mut arena = Self::new(dims, block_size, 0.0)?;
        let block_len = arena.layout.block_len();

        for k in 0..dims[2] {
            for j in 0..dims[1] {
                for i in 0..dims[0] {
                    let addr = arena.layout.locate([i, j, k]);
                    arena.data[addr.block * block_len + addr.offset] = f([i, j, k]);
                }
            }
        }

        Ok(arena)
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Read-only view of one block.
    pub fn block(&self, block: usize) -> Option<&[f32]> {
        self.data.chunks(self.layout.block_len()).nth(block)
    }

    /// One mutable slice per block, in block order.
    pub fn blocks_mut(&mut self) -> Vec<&mut [f32]> {
        let block_len = self.layout.block_len();
        self.data.chunks_mut(block_len).collect()
    }
}
