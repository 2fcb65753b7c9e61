//! Common test fixtures for grid and collection tests.
//!
//! Pre-defined shapes, file names and time axes shared by the suites.

/// Grid shapes paired with block sizes.
pub mod shapes {
    /// A grid extent together with its block size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockedShape {
        pub dims: [usize; 3],
        pub block_size: [usize; 3],
        pub topology_dimension: usize,
    }

    impl BlockedShape {
        /// Number of logical values.
        pub fn size(&self) -> usize {
            self.dims.iter().product()
        }
    }

    /// 1D line that fits a single block.
    pub const LINE_8: BlockedShape = BlockedShape {
        dims: [8, 1, 1],
        block_size: [8, 1, 1],
        topology_dimension: 1,
    };

    /// Square plane tiled exactly by 2x2 blocks.
    pub const PLANE_4X4: BlockedShape = BlockedShape {
        dims: [4, 4, 1],
        block_size: [2, 2, 1],
        topology_dimension: 2,
    };

    /// Plane with partial blocks on both upper edges.
    pub const PLANE_5X3_PARTIAL: BlockedShape = BlockedShape {
        dims: [5, 3, 1],
        block_size: [2, 2, 1],
        topology_dimension: 2,
    };

    /// Volume with partial blocks on every axis.
    pub const VOLUME_5X4X3: BlockedShape = BlockedShape {
        dims: [5, 4, 3],
        block_size: [2, 3, 2],
        topology_dimension: 3,
    };

    /// All shapes, for table-driven tests.
    pub const ALL: [BlockedShape; 4] = [LINE_8, PLANE_4X4, PLANE_5X3_PARTIAL, VOLUME_5X4X3];
}

/// File names for multi-file collections.
pub mod files {
    /// One file per timestep.
    pub const SERIES: [&str; 3] = ["ocean_0000.nc", "ocean_0001.nc", "ocean_0002.nc"];

    /// A file holding only time-invariant fields.
    pub const STATIC: &str = "grid_static.nc";
}

/// Names used for dimensions and variables.
pub mod names {
    pub const TIME_DIM: &str = "time";
    pub const TIME_COORD: &str = "time";
    pub const X_DIM: &str = "x";
    pub const Y_DIM: &str = "y";
    pub const Z_DIM: &str = "z";
    pub const TEMPERATURE: &str = "temp";
    pub const SALINITY: &str = "salt";
    pub const TOPOGRAPHY: &str = "topo";
    pub const MISSING_VALUE_ATTR: &str = "_FillValue";
}

/// Time axis values.
pub mod times {
    /// Times stored in the three series files, one per file.
    pub const SERIES: [f64; 3] = [3600.0, 7200.0, 10800.0];

    /// Times shared by every file of a broadcast coordinate variable.
    pub const SHARED: [f64; 2] = [0.5, 1.5];
}
