//! Index to user-coordinate mapping for regularly spaced grids.

use crate::layout::Dims;

/// A point in user coordinates, X first. Unused axes are 0.
pub type Coords = [f64; 3];

/// Regular lattice spanning `[min, max]` on every axis.
///
/// Node `i` on an axis sits at `min + i * delta` with
/// `delta = (max - min) / (dims - 1)`. Axes of extent 1 collapse onto `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    dims: Dims,
    min: Coords,
    max: Coords,
    periodic: [bool; 3],
}

impl Geometry {
    /// Unit spacing starting at the origin.
    pub fn new(dims: Dims) -> Self {
        let max = [0, 1, 2].map(|axis| dims[axis].saturating_sub(1) as f64);
        Self {
            dims,
            min: [0.0; 3],
            max,
            periodic: [false; 3],
        }
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn min(&self) -> Coords {
        self.min
    }

    pub fn max(&self) -> Coords {
        self.max
    }

    pub fn periodic(&self) -> [bool; 3] {
        self.periodic
    }

    pub(crate) fn set_extents(&mut self, min: Coords, max: Coords) {
        self.min = min;
        self.max = max;
    }

    pub(crate) fn set_periodic(&mut self, periodic: [bool; 3]) {
        self.periodic = periodic;
    }

    /// Node spacing along `axis`; 0 on axes of extent 1.
    pub fn delta(&self, axis: usize) -> f64 {
        if self.dims[axis] > 1 {
            (self.max[axis] - self.min[axis]) / (self.dims[axis] - 1) as f64
        } else {
            0.0
        }
    }

    /// User coordinates of a node. Indices are clamped to the grid.
    pub fn user_coordinates(&self, indices: Dims) -> Coords {
        [0, 1, 2].map(|axis| {
            let idx = indices[axis].min(self.dims[axis].saturating_sub(1));
            self.min[axis] + idx as f64 * self.delta(axis)
        })
    }

    /// Bring a point onto the grid: periodic axes wrap, all others clamp.
    pub fn clamp_coord(&self, coords: Coords) -> Coords {
        [0, 1, 2].map(|axis| {
            let (lo, hi) = (self.min[axis], self.max[axis]);
            let x = coords[axis];
            let extent = hi - lo;

            if self.periodic[axis] && extent > 0.0 && (x < lo || x > hi) {
                lo + (x - lo).rem_euclid(extent)
            } else {
                x.clamp(lo, hi)
            }
        })
    }

    /// Whether a point lies within the extents. Periodic axes always contain
    /// the point.
    pub fn inside(&self, coords: Coords) -> bool {
        (0..3).all(|axis| {
            self.periodic[axis] || (coords[axis] >= self.min[axis] && coords[axis] <= self.max[axis])
        })
    }

    /// Fractional node position along `axis`, clamped to `[0, dims - 1]`.
    fn fractional_index(&self, axis: usize, x: f64) -> f64 {
        let delta = self.delta(axis);
        if delta == 0.0 {
            return 0.0;
        }
        ((x - self.min[axis]) / delta).clamp(0.0, (self.dims[axis] - 1) as f64)
    }

    /// Index of the node closest to a point.
    pub fn nearest_index(&self, coords: Coords) -> Dims {
        [0, 1, 2].map(|axis| self.fractional_index(axis, coords[axis]).round() as usize)
    }

    /// Lower node of the cell containing a point, and the weight of that
    /// lower node along each axis.
    ///
    /// On the last node of an axis the lower node is that node with weight 1.
    pub fn cell_indices(&self, coords: Coords) -> (Dims, Coords) {
        let mut indices = [0; 3];
        let mut weights = [1.0; 3];

        for axis in 0..3 {
            if self.dims[axis] <= 1 {
                continue;
            }
            let t = self.fractional_index(axis, coords[axis]);
            let i = t.floor();
            let last = self.dims[axis] - 1;

            if i as usize >= last {
                indices[axis] = last;
            } else {
                indices[axis] = i as usize;
                weights[axis] = 1.0 - (t - i);
            }
        }

        (indices, weights)
    }
}
