//! The block-tiled grid.

use std::fmt;

use tracing::debug;

use crate::config::GridConfig;
use crate::coords::{Coords, Geometry};
use crate::error::{GridError, Result};
use crate::interpolation::InterpolationOrder;
use crate::iter::{BoxPredicate, CellBoxIter, CoordIter, IndexIter, NodeBoxIter, ValueIter};
use crate::layout::{BlockLayout, Dims};

/// A structured 1D, 2D or 3D grid over caller-owned blocks.
///
/// The grid borrows one mutable slice per block; its shape is fixed at
/// construction while values stay writable through [`Grid::set_value`]. A
/// grid without blocks is dataless and reads the missing value everywhere.
#[derive(Debug)]
pub struct Grid<'a> {
    layout: BlockLayout,
    blocks: Vec<&'a mut [f32]>,
    topology_dimension: usize,
    periodic: Vec<bool>,
    missing_value: f32,
    has_missing: bool,
    interpolation: InterpolationOrder,
    geometry: Geometry,
    range_workers: Option<usize>,
}

impl<'a> Grid<'a> {
    /// Create a grid over `blocks`.
    ///
    /// `blocks` must be empty (dataless) or hold exactly one slice per block,
    /// each at least `product(block_size)` long.
    pub fn new(
        dims: Dims,
        block_size: Dims,
        blocks: Vec<&'a mut [f32]>,
        topology_dimension: usize,
    ) -> Result<Self> {
        let layout = BlockLayout::new(dims, block_size)?;

        if !blocks.is_empty() && blocks.len() != layout.num_blocks() {
            return Err(GridError::invariant(format!(
                "expected {} blocks, got {}",
                layout.num_blocks(),
                blocks.len()
            )));
        }
        if let Some(short) = blocks.iter().position(|b| b.len() < layout.block_len()) {
            return Err(GridError::invariant(format!(
                "block {short} holds fewer than {} values",
                layout.block_len()
            )));
        }
        if topology_dimension > 3 {
            return Err(GridError::invariant(format!(
                "topology dimension {topology_dimension} exceeds 3"
            )));
        }

        debug!(
            dims = ?dims,
            block_size = ?block_size,
            blocks = blocks.len(),
            topology_dimension,
            "Created grid"
        );

        Ok(Self {
            layout,
            blocks,
            topology_dimension,
            periodic: vec![false; topology_dimension],
            missing_value: f32::INFINITY,
            has_missing: false,
            interpolation: InterpolationOrder::default(),
            geometry: Geometry::new(dims),
            range_workers: None,
        })
    }

    /// Create a grid from 1 to 3 extents; missing axes have extent 1.
    pub fn from_shape(
        dims: &[usize],
        block_size: &[usize],
        blocks: Vec<&'a mut [f32]>,
        topology_dimension: usize,
    ) -> Result<Self> {
        if dims.len() > 3 || dims.len() != block_size.len() {
            return Err(GridError::invariant(format!(
                "shape rank mismatch: {} dims, {} block sizes",
                dims.len(),
                block_size.len()
            )));
        }

        let mut d = [1; 3];
        let mut bs = [1; 3];
        d[..dims.len()].copy_from_slice(dims);
        bs[..block_size.len()].copy_from_slice(block_size);

        Self::new(d, bs, blocks, topology_dimension)
    }

    /// Count of axes with extent greater than 1.
    pub fn num_dimensions(dims: Dims) -> usize {
        dims.iter().filter(|&&d| d > 1).count()
    }

    pub fn dims(&self) -> Dims {
        self.layout.dims()
    }

    pub fn block_size(&self) -> Dims {
        self.layout.block_size()
    }

    /// Number of blocks along each axis.
    pub fn block_dims(&self) -> Dims {
        self.layout.block_dims()
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    pub fn topology_dimension(&self) -> usize {
        self.topology_dimension
    }

    pub fn is_dataless(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn periodic(&self) -> &[bool] {
        &self.periodic
    }

    /// Set per-axis periodicity; extra entries beyond the topology dimension
    /// are ignored.
    pub fn set_periodic(&mut self, periodic: &[bool]) {
        for (axis, flag) in self.periodic.iter_mut().enumerate() {
            *flag = periodic.get(axis).copied().unwrap_or(false);
        }

        let mut geom = [false; 3];
        geom[..self.periodic.len()].copy_from_slice(&self.periodic);
        self.geometry.set_periodic(geom);
    }

    pub fn missing_value(&self) -> f32 {
        self.missing_value
    }

    pub fn set_missing_value(&mut self, missing_value: f32) {
        self.missing_value = missing_value;
    }

    pub fn has_missing_value(&self) -> bool {
        self.has_missing
    }

    pub fn set_has_missing_value(&mut self, flag: bool) {
        self.has_missing = flag;
    }

    pub fn interpolation_order(&self) -> InterpolationOrder {
        self.interpolation
    }

    /// Set the numeric interpolation order; values outside 0..=2 become 1.
    pub fn set_interpolation_order(&mut self, order: i32) {
        self.interpolation = InterpolationOrder::from_order(order);
    }

    pub fn set_interpolation(&mut self, order: InterpolationOrder) {
        self.interpolation = order;
    }

    pub(crate) fn range_workers(&self) -> Option<usize> {
        self.range_workers
    }

    /// Apply sampling settings from a [`GridConfig`].
    pub fn apply_config(&mut self, config: &GridConfig) -> Result<()> {
        config.validate().map_err(GridError::configuration)?;

        self.interpolation = config.interpolation;
        if let Some(mv) = config.missing_value {
            self.missing_value = mv;
            self.has_missing = true;
        }
        self.range_workers = config.range_workers;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Index access
    // ------------------------------------------------------------------

    /// Value at an index triple, clamped onto the grid. Dataless grids
    /// return the missing value.
    pub fn value_at_index(&self, indices: Dims) -> f32 {
        let addr = self.layout.locate(indices);
        self.blocks
            .get(addr.block)
            .and_then(|block| block.get(addr.offset))
            .copied()
            .unwrap_or(self.missing_value)
    }

    /// Write a value at an index triple, clamped onto the grid. No-op on
    /// dataless grids.
    pub fn set_value(&mut self, indices: Dims, value: f32) {
        let addr = self.layout.locate(indices);
        if let Some(slot) = self
            .blocks
            .get_mut(addr.block)
            .and_then(|block| block.get_mut(addr.offset))
        {
            *slot = value;
        }
    }

    pub fn access_ijk(&self, i: usize, j: usize, k: usize) -> f32 {
        self.value_at_index([i, j, k])
    }

    pub fn set_value_ijk(&mut self, i: usize, j: usize, k: usize, value: f32) {
        self.set_value([i, j, k], value);
    }

    // ------------------------------------------------------------------
    // Coordinates
    // ------------------------------------------------------------------

    /// Set the user extents of the regular lattice.
    pub fn set_user_extents(&mut self, min: Coords, max: Coords) -> Result<()> {
        for axis in 0..3 {
            if !min[axis].is_finite() || !max[axis].is_finite() || min[axis] > max[axis] {
                return Err(GridError::configuration(format!(
                    "invalid extents on axis {axis}: [{}, {}]",
                    min[axis], max[axis]
                )));
            }
        }
        self.geometry.set_extents(min, max);
        Ok(())
    }

    pub fn user_extents(&self) -> (Coords, Coords) {
        (self.geometry.min(), self.geometry.max())
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn user_coordinates(&self, indices: Dims) -> Coords {
        self.geometry.user_coordinates(indices)
    }

    pub fn node_dimensions(&self) -> Dims {
        self.dims()
    }

    /// One fewer than the node count on every axis with more than one node.
    pub fn cell_dimensions(&self) -> Dims {
        self.dims().map(|d| if d > 1 { d - 1 } else { 1 })
    }

    pub fn inside_grid(&self, coords: Coords) -> bool {
        self.geometry.inside(coords)
    }

    pub fn clamp_coord(&self, coords: Coords) -> Coords {
        self.geometry.clamp_coord(coords)
    }

    pub fn cell_indices(&self, coords: Coords) -> (Dims, Coords) {
        self.geometry.cell_indices(coords)
    }

    // ------------------------------------------------------------------
    // Sampling
    // ------------------------------------------------------------------

    /// Sample the grid at a point using the configured interpolation order.
    pub fn value(&self, coords: Coords) -> f32 {
        if self.is_dataless() {
            return self.missing_value;
        }

        let coords = self.geometry.clamp_coord(coords);
        match self.interpolation {
            InterpolationOrder::Nearest => self.value_at_index(self.geometry.nearest_index(coords)),
            InterpolationOrder::Linear | InterpolationOrder::Trilinear => {
                let ([i, j, k], [xw, yw, zw]) = self.geometry.cell_indices(coords);
                self.trilinear_interpolate(i, j, k, xw, yw, zw)
            }
        }
    }

    // ------------------------------------------------------------------
    // Iterators
    // ------------------------------------------------------------------

    pub fn node_begin(&self) -> IndexIter {
        IndexIter::begin(self.node_dimensions())
    }

    pub fn node_end(&self) -> IndexIter {
        IndexIter::end(self.node_dimensions())
    }

    pub fn cell_begin(&self) -> IndexIter {
        IndexIter::begin(self.cell_dimensions())
    }

    pub fn cell_end(&self) -> IndexIter {
        IndexIter::end(self.cell_dimensions())
    }

    pub fn coord_begin(&self) -> CoordIter {
        CoordIter::begin(self.geometry)
    }

    pub fn coord_end(&self) -> CoordIter {
        CoordIter::end(self.geometry)
    }

    /// Nodes whose coordinates lie in `[min, max]` on the given axes.
    pub fn node_box_begin(&self, min: &[f64], max: &[f64]) -> NodeBoxIter {
        NodeBoxIter::new(self.geometry, BoxPredicate::new(min, max))
    }

    /// Cells whose corner nodes all lie in `[min, max]` on the given axes.
    pub fn cell_box_begin(&self, min: &[f64], max: &[f64]) -> CellBoxIter {
        CellBoxIter::new(self.geometry, self.cell_dimensions(), BoxPredicate::new(min, max))
    }

    /// Every value in index order.
    pub fn values(&self) -> ValueIter<'_> {
        ValueIter::new(&self.blocks, self.layout, self.geometry, BoxPredicate::disabled())
    }

    /// Values of nodes whose coordinates lie in `[min, max]`.
    pub fn values_in_box(&self, min: &[f64], max: &[f64]) -> ValueIter<'_> {
        ValueIter::new(&self.blocks, self.layout, self.geometry, BoxPredicate::new(min, max))
    }

    pub fn values_end(&self) -> ValueIter<'_> {
        ValueIter::end(&self.blocks, self.layout, self.geometry)
    }
}

impl fmt::Display for Grid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |v: &[usize]| v.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(" ");

        writeln!(f, "Grid")?;
        writeln!(f, " Dimensions {}", join(&self.dims()))?;
        writeln!(f, " Block dimensions {}", join(&self.block_size()))?;
        writeln!(f, " Grid dimensions in blocks {}", join(&self.block_dims()))?;
        writeln!(f, " Topological dimension {}", self.topology_dimension)?;
        let periodic: Vec<String> = self.periodic.iter().map(|p| u8::from(*p).to_string()).collect();
        writeln!(f, " Periodicity {}", periodic.join(" "))?;
        writeln!(f, " Missing value flag {}", u8::from(self.has_missing))?;
        writeln!(f, " Missing value {}", self.missing_value)?;
        writeln!(f, " Interpolation order {}", self.interpolation.as_order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BlockArena;

    #[test]
    fn test_wrong_block_count_rejected() {
        let mut arena = BlockArena::new([4, 4, 1], [2, 2, 1], 0.0).unwrap();
        let mut blocks = arena.blocks_mut();
        blocks.pop();
        let err = Grid::new([4, 4, 1], [2, 2, 1], blocks, 2).unwrap_err();
        assert!(matches!(err, GridError::Invariant(_)));
    }

    #[test]
    fn test_short_block_rejected() {
        let mut a = vec![0.0f32; 4];
        let mut b = vec![0.0f32; 3];
        let err = Grid::new([4, 2, 1], [2, 2, 1], vec![&mut a[..], &mut b[..]], 2).unwrap_err();
        assert!(matches!(err, GridError::Invariant(_)));
    }

    #[test]
    fn test_from_shape_pads_axes() {
        let mut data = vec![0.0f32; 8];
        let grid = Grid::from_shape(&[8], &[8], vec![&mut data[..]], 1).unwrap();
        assert_eq!(grid.dims(), [8, 1, 1]);
        assert_eq!(grid.cell_dimensions(), [7, 1, 1]);
        assert_eq!(Grid::num_dimensions(grid.dims()), 1);
    }

    #[test]
    fn test_dataless_reads_missing() {
        let mut grid = Grid::new([3, 3, 3], [2, 2, 2], Vec::new(), 3).unwrap();
        assert!(grid.is_dataless());
        assert_eq!(grid.access_ijk(1, 1, 1), f32::INFINITY);
        grid.set_value_ijk(1, 1, 1, 5.0);
        assert_eq!(grid.value([1.0, 1.0, 1.0]), f32::INFINITY);
    }

    #[test]
    fn test_set_and_clamped_get() {
        let mut arena = BlockArena::new([3, 3, 1], [2, 2, 1], 0.0).unwrap();
        let mut grid = Grid::new([3, 3, 1], [2, 2, 1], arena.blocks_mut(), 2).unwrap();
        grid.set_value_ijk(2, 2, 0, 7.5);
        assert_eq!(grid.access_ijk(2, 2, 0), 7.5);
        assert_eq!(grid.access_ijk(50, 50, 50), 7.5);
    }

    #[test]
    fn test_apply_config() {
        let mut grid = Grid::new([2, 2, 1], [2, 2, 1], Vec::new(), 2).unwrap();
        let config = GridConfig {
            interpolation: InterpolationOrder::Linear,
            missing_value: Some(-1.0),
            range_workers: Some(2),
        };
        grid.apply_config(&config).unwrap();
        assert_eq!(grid.interpolation_order(), InterpolationOrder::Linear);
        assert_eq!(grid.missing_value(), -1.0);
        assert!(grid.has_missing_value());

        let bad = GridConfig {
            range_workers: Some(0),
            ..Default::default()
        };
        assert!(matches!(grid.apply_config(&bad), Err(GridError::Configuration(_))));
    }

    #[test]
    fn test_periodic_wraps_sampling() {
        let mut arena = BlockArena::from_fn([4, 1, 1], [4, 1, 1], |[i, _, _]| i as f32).unwrap();
        let mut grid = Grid::new([4, 1, 1], [4, 1, 1], arena.blocks_mut(), 1).unwrap();
        grid.set_periodic(&[true]);
        assert_eq!(grid.periodic(), &[true]);
        // extent is [0, 3]; 4.0 wraps to 1.0
        assert_eq!(grid.value([4.0, 0.0, 0.0]), 1.0);
    }

    #[test]
    fn test_display() {
        let grid = Grid::new([4, 3, 1], [2, 2, 1], Vec::new(), 2).unwrap();
        let text = grid.to_string();
        assert!(text.starts_with("Grid\n"));
        assert!(text.contains(" Dimensions 4 3 1\n"));
        assert!(text.contains(" Grid dimensions in blocks 2 2 1\n"));
        assert!(text.contains(" Periodicity 0 0\n"));
        assert!(text.contains(" Interpolation order 0"));
    }
}
