use crate::coords::{Coords, Geometry};
use crate::iter::IndexCursor;

/// Walks node user coordinates in node order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordIter {
    cursor: IndexCursor,
    geometry: Geometry,
}

impl CoordIter {
    pub fn begin(geometry: Geometry) -> Self {
        Self {
            cursor: IndexCursor::begin(geometry.dims()),
            geometry,
        }
    }

    pub fn end(geometry: Geometry) -> Self {
        Self {
            cursor: IndexCursor::end(geometry.dims()),
            geometry,
        }
    }

    pub fn cursor(&self) -> IndexCursor {
        self.cursor
    }

    /// Coordinates at the current position. At the end this is the last node.
    pub fn coords(&self) -> Coords {
        self.geometry.user_coordinates(self.cursor.index())
    }

    pub fn is_end(&self) -> bool {
        self.cursor.is_end()
    }

    pub fn step(&mut self) {
        self.cursor.step();
    }

    pub fn advance(&mut self, offset: i64) {
        self.cursor.advance(offset);
    }
}

impl Iterator for CoordIter {
    type Item = Coords;

    fn next(&mut self) -> Option<Coords> {
        if self.is_end() {
            return None;
        }
        let coords = self.coords();
        self.step();
        Some(coords)
    }
}

/// Axis-aligned box test in user coordinates.
///
/// Only the first `ndim` axes are checked. A predicate built from empty
/// bounds is disabled and accepts every point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPredicate {
    min: Coords,
    max: Coords,
    ndim: usize,
}

impl BoxPredicate {
    pub fn new(min: &[f64], max: &[f64]) -> Self {
        let ndim = min.len().min(max.len()).min(3);
        let mut lo = [0.0; 3];
        let mut hi = [0.0; 3];
        lo[..ndim].copy_from_slice(&min[..ndim]);
        hi[..ndim].copy_from_slice(&max[..ndim]);

        Self {
            min: lo,
            max: hi,
            ndim,
        }
    }

    pub fn disabled() -> Self {
        Self::new(&[], &[])
    }

    pub fn is_enabled(&self) -> bool {
        self.ndim > 0
    }

    pub fn contains(&self, coords: &Coords) -> bool {
        (0..self.ndim).all(|axis| coords[axis] >= self.min[axis] && coords[axis] <= self.max[axis])
    }
}

impl Default for BoxPredicate {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_iter_order() {
        let coords: Vec<Coords> = CoordIter::begin(Geometry::new([2, 2, 1])).collect();
        assert_eq!(
            coords,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]]
        );
    }

    #[test]
    fn test_predicate_axes() {
        let pred = BoxPredicate::new(&[0.0, 0.0], &[1.0, 1.0]);
        assert!(pred.is_enabled());
        assert!(pred.contains(&[0.5, 1.0, 99.0]));
        assert!(!pred.contains(&[1.5, 0.5, 0.0]));

        let off = BoxPredicate::disabled();
        assert!(!off.is_enabled());
        assert!(off.contains(&[1e9, -1e9, 0.0]));
    }
}
