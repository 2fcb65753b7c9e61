//! Interpolation over the corner values of a grid cell.
//!
//! Weights follow the convention of [`crate::Geometry::cell_indices`]: a
//! weight of `1.0` selects the lower node of an axis, `0.0` the upper one.
//! Corner and edge detection uses exact float equality.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// How [`Grid::value`] reconstructs a value between nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationOrder {
    /// Value of the closest node.
    #[default]
    Nearest,
    /// Trilinear sampling; bilinear on grids without depth.
    Linear,
    /// Same sampling as `Linear`.
    Trilinear,
}

impl InterpolationOrder {
    /// Map a numeric order. Anything other than 0 or 2 becomes `Linear`.
    pub fn from_order(order: i32) -> Self {
        match order {
            0 => Self::Nearest,
            2 => Self::Trilinear,
            _ => Self::Linear,
        }
    }

    /// Parse a name or numeric order (case-insensitive). Unknown names
    /// become `Linear`.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "nearest" | "0" => Self::Nearest,
            "trilinear" | "2" => Self::Trilinear,
            _ => Self::Linear,
        }
    }

    /// Numeric order, 0 to 2.
    pub fn as_order(&self) -> i32 {
        match self {
            Self::Nearest => 0,
            Self::Linear => 1,
            Self::Trilinear => 2,
        }
    }

    pub fn is_nearest(&self) -> bool {
        matches!(self, Self::Nearest)
    }
}

impl std::fmt::Display for InterpolationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Linear => write!(f, "linear"),
            Self::Trilinear => write!(f, "trilinear"),
        }
    }
}

/// Corner values of a quad: `(i,j)`, `(i+1,j)`, `(i,j+1)`, `(i+1,j+1)`.
pub type QuadCorners = [f32; 4];

/// Value of the corner the weights land on exactly, if any.
pub fn point_on_node(verts: &QuadCorners, xwgt: f64, ywgt: f64) -> Option<f32> {
    match (xwgt, ywgt) {
        (x, y) if x == 1.0 && y == 1.0 => Some(verts[0]),
        (x, y) if x == 0.0 && y == 1.0 => Some(verts[1]),
        (x, y) if x == 1.0 && y == 0.0 => Some(verts[2]),
        (x, y) if x == 0.0 && y == 0.0 => Some(verts[3]),
        _ => None,
    }
}

/// Linear interpolation along the quad edge the weights lie on, if both
/// ends of that edge are present.
pub fn point_on_edge(verts: &QuadCorners, xwgt: f64, ywgt: f64, mv: f32) -> Option<f32> {
    let interior = |w: f64| w > 0.0 && w < 1.0;
    let present = |a: usize, b: usize| verts[a] != mv && verts[b] != mv;
    let lerp = |a: usize, b: usize, w: f64| (verts[a] as f64 * w + verts[b] as f64 * (1.0 - w)) as f32;

    if ywgt == 1.0 && interior(xwgt) && present(0, 1) {
        return Some(lerp(0, 1, xwgt));
    }
    if xwgt == 0.0 && interior(ywgt) && present(1, 3) {
        return Some(lerp(1, 3, ywgt));
    }
    if ywgt == 0.0 && interior(xwgt) && present(2, 3) {
        return Some(lerp(2, 3, xwgt));
    }
    if xwgt == 1.0 && interior(ywgt) && present(0, 2) {
        return Some(lerp(0, 2, ywgt));
    }

    None
}

impl Grid<'_> {
    /// Bilinear interpolation in the XY plane `k` of the cell whose lower
    /// corner is `(i, j)`.
    ///
    /// Corners on an axis of extent 1 contribute 0. When any corner holds the
    /// missing value the result is the exact corner or edge value the point
    /// lies on, or the missing value otherwise.
    pub fn bilinear_interpolate(&self, i: usize, j: usize, k: usize, xwgt: f64, ywgt: f64) -> f32 {
        let dims = self.dims();
        debug_assert!(i < dims[0] && j < dims[1] && k < dims[2]);

        let mv = self.missing_value();
        let verts: QuadCorners = [
            self.access_ijk(i, j, k),
            if dims[0] > 1 { self.access_ijk(i + 1, j, k) } else { 0.0 },
            if dims[1] > 1 { self.access_ijk(i, j + 1, k) } else { 0.0 },
            if dims[0] > 1 && dims[1] > 1 {
                self.access_ijk(i + 1, j + 1, k)
            } else {
                0.0
            },
        ];

        if verts.iter().any(|&v| v == mv) {
            return point_on_node(&verts, xwgt, ywgt)
                .or_else(|| point_on_edge(&verts, xwgt, ywgt, mv))
                .unwrap_or(mv);
        }

        let [v0, v1, v2, v3] = verts.map(f64::from);
        (((v0 * xwgt + v1 * (1.0 - xwgt)) * ywgt) + ((v2 * xwgt + v3 * (1.0 - xwgt)) * (1.0 - ywgt)))
            as f32
    }

    /// Trilinear interpolation: bilinear in planes `k` and `k + 1`, then
    /// linear in Z. Degrades to bilinear on the last plane or a flat grid.
    pub fn trilinear_interpolate(
        &self,
        i: usize,
        j: usize,
        k: usize,
        xwgt: f64,
        ywgt: f64,
        zwgt: f64,
    ) -> f32 {
        let dims = self.dims();
        debug_assert!(i < dims[0] && j < dims[1] && k < dims[2]);

        let mv = self.missing_value();
        let v0 = self.bilinear_interpolate(i, j, k, xwgt, ywgt);

        if dims[2] <= 1 || k >= dims[2] - 1 {
            return v0;
        }

        let v1 = self.bilinear_interpolate(i, j, k + 1, xwgt, ywgt);

        if v0 == mv || v1 == mv {
            return if zwgt == 1.0 {
                v0
            } else if zwgt == 0.0 {
                v1
            } else {
                mv
            };
        }

        (f64::from(v0) * zwgt + f64::from(v1) * (1.0 - zwgt)) as f32
    }
}
