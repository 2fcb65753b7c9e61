use crate::coords::Geometry;
use crate::iter::{BoxPredicate, CoordIter, IndexCursor};
use crate::layout::Dims;

/// Node iterator restricted to nodes whose coordinates fall inside a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBoxIter {
    nodes: IndexCursor,
    coords: CoordIter,
    pred: BoxPredicate,
}

impl NodeBoxIter {
    pub fn new(geometry: Geometry, pred: BoxPredicate) -> Self {
        let mut iter = Self {
            nodes: IndexCursor::begin(geometry.dims()),
            coords: CoordIter::begin(geometry),
            pred,
        };
        if !iter.pred.contains(&iter.coords.coords()) {
            iter.step();
        }
        iter
    }

    pub fn current(&self) -> Option<Dims> {
        (!self.nodes.is_end()).then(|| self.nodes.index())
    }

    pub fn is_end(&self) -> bool {
        self.nodes.is_end()
    }

    /// Move to the next node inside the box.
    pub fn step(&mut self) {
        loop {
            self.nodes.step();
            self.coords.step();
            if self.nodes.is_end() || self.pred.contains(&self.coords.coords()) {
                return;
            }
        }
    }

    /// Jump `offset` nodes, then move forward to the first node inside the
    /// box.
    pub fn advance(&mut self, offset: i64) {
        self.nodes.advance(offset);
        self.coords.advance(offset);
        if !self.nodes.is_end() && !self.pred.contains(&self.coords.coords()) {
            self.step();
        }
    }
}

impl Iterator for NodeBoxIter {
    type Item = Dims;

    fn next(&mut self) -> Option<Dims> {
        let current = self.current()?;
        self.step();
        Some(current)
    }
}

/// Cell iterator restricted to cells whose corner nodes all fall inside a
/// box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBoxIter {
    cells: IndexCursor,
    geometry: Geometry,
    pred: BoxPredicate,
}

impl CellBoxIter {
    pub fn new(geometry: Geometry, cell_dims: Dims, pred: BoxPredicate) -> Self {
        let mut iter = Self {
            cells: IndexCursor::begin(cell_dims),
            geometry,
            pred,
        };
        if !iter.cell_inside() {
            iter.step();
        }
        iter
    }

    fn cell_inside(&self) -> bool {
        if !self.pred.is_enabled() {
            return true;
        }

        let node_dims = self.geometry.dims();
        let lower = self.cells.index();
        let upper = [0, 1, 2].map(|axis| {
            if node_dims[axis] > 1 {
                lower[axis] + 1
            } else {
                lower[axis]
            }
        });

        for k in [lower[2], upper[2]] {
            for j in [lower[1], upper[1]] {
                for i in [lower[0], upper[0]] {
                    if !self.pred.contains(&self.geometry.user_coordinates([i, j, k])) {
                        return false;
                    }
                }
            }
        }
        true
    }

    pub fn current(&self) -> Option<Dims> {
        (!self.cells.is_end()).then(|| self.cells.index())
    }

    pub fn is_end(&self) -> bool {
        self.cells.is_end()
    }

    pub fn step(&mut self) {
        loop {
            self.cells.step();
            if self.cells.is_end() || self.cell_inside() {
                return;
            }
        }
    }

    pub fn advance(&mut self, offset: i64) {
        self.cells.advance(offset);
        if !self.cells.is_end() && !self.cell_inside() {
            self.step();
        }
    }
}

impl Iterator for CellBoxIter {
    type Item = Dims;

    fn next(&mut self) -> Option<Dims> {
        let current = self.current()?;
        self.step();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_box_skips_initial_outside() {
        let pred = BoxPredicate::new(&[1.0, 1.0], &[2.0, 2.0]);
        let nodes: Vec<Dims> = NodeBoxIter::new(Geometry::new([4, 4, 1]), pred).collect();
        assert_eq!(nodes, vec![[1, 1, 0], [2, 1, 0], [1, 2, 0], [2, 2, 0]]);
    }

    #[test]
    fn test_node_box_advance() {
        let pred = BoxPredicate::new(&[1.0, 1.0], &[2.0, 2.0]);
        let mut iter = NodeBoxIter::new(Geometry::new([4, 4, 1]), pred);
        // [1,1] is linear 5; +2 lands on [3,1] which is outside, next inside is [1,2]
        iter.advance(2);
        assert_eq!(iter.current(), Some([1, 2, 0]));
    }

    #[test]
    fn test_cell_box_requires_all_corners() {
        let pred = BoxPredicate::new(&[0.0, 0.0], &[2.0, 1.0]);
        let cells: Vec<Dims> = CellBoxIter::new(Geometry::new([4, 3, 1]), [3, 2, 1], pred).collect();
        assert_eq!(cells, vec![[0, 0, 0], [1, 0, 0]]);
    }

    #[test]
    fn test_empty_box() {
        let pred = BoxPredicate::new(&[10.0, 10.0], &[20.0, 20.0]);
        let mut iter = NodeBoxIter::new(Geometry::new([3, 3, 1]), pred);
        assert!(iter.is_end());
        assert_eq!(iter.next(), None);
    }
}
