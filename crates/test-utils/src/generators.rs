//! Test data generators for block-tiled grids.
//!
//! Block buffers are built here by walking each block's own storage order,
//! independently of the grid crate's index arithmetic, so tests can use them
//! as an addressing oracle.

/// Per-axis extents, X first.
pub type Shape = [usize; 3];

/// Predictable value for node `(i, j, k)`: `i + 10 * j + 100 * k`.
///
/// # Example
///
/// ```
/// use test_utils::ramp_value;
///
/// assert_eq!(ramp_value([3, 2, 1]), 123.0);
/// ```
pub fn ramp_value([i, j, k]: Shape) -> f32 {
    (i + 10 * j + 100 * k) as f32
}

/// Number of blocks along each axis.
pub fn block_counts(dims: Shape, block_size: Shape) -> Shape {
    [0, 1, 2].map(|a| dims[a].div_ceil(block_size[a]))
}

/// Build one buffer per block, filling each logical node with `f(i, j, k)`
/// and padding nodes outside the grid with `pad`.
///
/// Blocks are ordered X fastest, then Y, then Z; values inside a block are
/// ordered the same way.
pub fn blocked_buffers(
    dims: Shape,
    block_size: Shape,
    pad: f32,
    mut f: impl FnMut(Shape) -> f32,
) -> Vec<Vec<f32>> {
    let [nbx, nby, nbz] = block_counts(dims, block_size);
    let [bx, by, bz] = block_size;
    let mut blocks = Vec::with_capacity(nbx * nby * nbz);

    for zb in 0..nbz {
        for yb in 0..nby {
            for xb in 0..nbx {
                let mut block = Vec::with_capacity(bx * by * bz);
                for z in 0..bz {
                    for y in 0..by {
                        for x in 0..bx {
                            let idx = [xb * bx + x, yb * by + y, zb * bz + z];
                            let inside = (0..3).all(|a| idx[a] < dims[a]);
                            block.push(if inside { f(idx) } else { pad });
                        }
                    }
                }
                blocks.push(block);
            }
        }
    }

    blocks
}

/// Blocks filled with [`ramp_value`], padded with `-1.0`.
///
/// # Example
///
/// ```
/// use test_utils::ramp_blocks;
///
/// let blocks = ramp_blocks([3, 2, 1], [2, 2, 1]);
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[1], vec![2.0, -1.0, 12.0, -1.0]);
/// ```
pub fn ramp_blocks(dims: Shape, block_size: Shape) -> Vec<Vec<f32>> {
    blocked_buffers(dims, block_size, -1.0, ramp_value)
}

/// Row-major (X fastest) list of the logical values `f` produces.
pub fn row_major_values(dims: Shape, mut f: impl FnMut(Shape) -> f32) -> Vec<f32> {
    let mut values = Vec::with_capacity(dims.iter().product());
    for k in 0..dims[2] {
        for j in 0..dims[1] {
            for i in 0..dims[0] {
                values.push(f([i, j, k]));
            }
        }
    }
    values
}

/// Borrow every buffer as a mutable slice, the form grids take their
/// blocks in.
pub fn as_block_slices(blocks: &mut [Vec<f32>]) -> Vec<&mut [f32]> {
    blocks.iter_mut().map(|b| b.as_mut_slice()).collect()
}

/// A 2D field of `ny * nx` values where `value = base + i + 10 * j`.
pub fn plane_values(nx: usize, ny: usize, base: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            data.push(base + (i + 10 * j) as f64);
        }
    }
    data
}
