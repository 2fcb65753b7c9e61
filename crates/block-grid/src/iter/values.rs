use crate::coords::Geometry;
use crate::iter::{BoxPredicate, CoordIter};
use crate::layout::{BlockLayout, Dims};

/// Forward iterator over grid values in index order, optionally restricted
/// to a box in user coordinates.
///
/// The iterator walks block storage directly: within a block row it only
/// bumps the offset, and recomputes the block address on block crossings
/// and jumps.
#[derive(Debug, Clone)]
pub struct ValueIter<'g> {
    blocks: &'g [&'g mut [f32]],
    layout: BlockLayout,
    index: Dims,
    last: Dims,
    block: usize,
    offset: usize,
    x_in_block: usize,
    coords: CoordIter,
    pred: BoxPredicate,
}

impl<'g> ValueIter<'g> {
    pub(crate) fn new(
        blocks: &'g [&'g mut [f32]],
        layout: BlockLayout,
        geometry: Geometry,
        pred: BoxPredicate,
    ) -> Self {
        let dims = layout.dims();
        let last = [0, 0, dims[2]];
        let mut iter = Self {
            blocks,
            layout,
            index: [0, 0, 0],
            last,
            block: 0,
            offset: 0,
            x_in_block: 0,
            coords: CoordIter::begin(geometry),
            pred,
        };

        if blocks.is_empty() {
            iter.index = last;
            iter.coords = CoordIter::end(geometry);
        } else if !iter.pred.contains(&iter.coords.coords()) {
            iter.step();
        }
        iter
    }

    pub(crate) fn end(
        blocks: &'g [&'g mut [f32]],
        layout: BlockLayout,
        geometry: Geometry,
    ) -> Self {
        let dims = layout.dims();
        Self {
            blocks,
            layout,
            index: [0, 0, dims[2]],
            last: [0, 0, dims[2]],
            block: 0,
            offset: 0,
            x_in_block: 0,
            coords: CoordIter::end(geometry),
            pred: BoxPredicate::disabled(),
        }
    }

    /// Index triple of the current value.
    pub fn index(&self) -> Dims {
        self.index
    }

    pub fn is_end(&self) -> bool {
        self.index == self.last
    }

    /// Current value, or `None` at the end.
    pub fn value(&self) -> Option<f32> {
        if self.is_end() {
            return None;
        }
        self.blocks.get(self.block)?.get(self.offset).copied()
    }

    fn relocate(&mut self) {
        let addr = self.layout.locate(self.index);
        self.block = addr.block;
        self.offset = addr.offset;
        self.x_in_block = self.index[0] % self.layout.block_size()[0];
    }

    /// Move to the next value inside the box.
    pub fn step(&mut self) {
        if self.blocks.is_empty() || self.is_end() {
            return;
        }

        let dims = self.layout.dims();
        let bx = self.layout.block_size()[0];

        loop {
            self.x_in_block += 1;
            self.offset += 1;
            self.index[0] += 1;
            self.coords.step();

            if self.x_in_block < bx && self.index[0] < dims[0] {
                if self.pred.contains(&self.coords.coords()) {
                    return;
                }
                continue;
            }

            // crossed into another block or row
            if self.index[0] >= dims[0] {
                self.index[0] = 0;
                self.index[1] += 1;
            }
            if self.index[1] >= dims[1] {
                self.index[1] = 0;
                self.index[2] += 1;
            }
            if self.index == self.last {
                return;
            }

            self.relocate();
            if self.pred.contains(&self.coords.coords()) {
                return;
            }
        }
    }

    /// Move `offset` values, then forward to the first value inside the
    /// box. Positions before the first value clamp to it; jumping past the
    /// last value lands on the end.
    pub fn advance(&mut self, offset: i64) {
        if self.blocks.is_empty() || self.is_end() {
            return;
        }

        let target = self.layout.linearize(self.index) as i64 + offset;
        self.coords.advance(offset);
        if target >= self.layout.num_values() as i64 {
            self.index = self.last;
            return;
        }

        self.index = self.layout.vectorize(target.max(0) as usize);
        self.relocate();

        if !self.pred.contains(&self.coords.coords()) {
            self.step();
        }
    }
}

impl PartialEq for ValueIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Iterator for ValueIter<'_> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let value = self.value()?;
        self.step();
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BlockArena;

    fn ramp(dims: Dims, bs: Dims) -> BlockArena {
        BlockArena::from_fn(dims, bs, |[i, j, k]| (i + 10 * j + 100 * k) as f32).unwrap()
    }

    #[test]
    fn test_walks_partial_blocks_in_index_order() {
        let dims = [5, 3, 2];
        let mut arena = ramp(dims, [2, 2, 1]);
        let layout = *arena.layout();
        let blocks = arena.blocks_mut();

        let values: Vec<f32> =
            ValueIter::new(&blocks, layout, Geometry::new(dims), BoxPredicate::disabled()).collect();

        let expected: Vec<f32> = (0..dims[2])
            .flat_map(|k| (0..dims[1]).flat_map(move |j| (0..dims[0]).map(move |i| (i + 10 * j + 100 * k) as f32)))
            .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_advance_matches_step() {
        let dims = [5, 3, 2];
        let mut arena = ramp(dims, [2, 2, 1]);
        let layout = *arena.layout();
        let blocks = arena.blocks_mut();
        let begin = ValueIter::new(&blocks, layout, Geometry::new(dims), BoxPredicate::disabled());

        for offset in 0..30 {
            let mut jumped = begin.clone();
            jumped.advance(offset);
            let mut stepped = begin.clone();
            for _ in 0..offset {
                stepped.step();
            }
            assert_eq!(jumped.index(), stepped.index(), "offset {offset}");
            assert_eq!(jumped.value(), stepped.value(), "offset {offset}");
        }

        let mut past = begin.clone();
        past.advance(1000);
        assert!(past.is_end());
    }

    #[test]
    fn test_box_restricted_values() {
        let dims = [4, 4, 1];
        let mut arena = ramp(dims, [3, 3, 1]);
        let layout = *arena.layout();
        let blocks = arena.blocks_mut();
        let pred = BoxPredicate::new(&[2.0, 1.0], &[3.0, 2.0]);

        let values: Vec<f32> = ValueIter::new(&blocks, layout, Geometry::new(dims), pred).collect();
        assert_eq!(values, vec![12.0, 13.0, 22.0, 23.0]);
    }

    #[test]
    fn test_dataless_is_empty() {
        let layout = BlockLayout::new([3, 3, 1], [2, 2, 1]).unwrap();
        let blocks: Vec<&mut [f32]> = Vec::new();
        let mut iter = ValueIter::new(&blocks, layout, Geometry::new([3, 3, 1]), BoxPredicate::disabled());
        assert!(iter.is_end());
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_clone_preserves_position() {
        let dims = [4, 2, 1];
        let mut arena = ramp(dims, [2, 2, 1]);
        let layout = *arena.layout();
        let blocks = arena.blocks_mut();
        let mut iter = ValueIter::new(&blocks, layout, Geometry::new(dims), BoxPredicate::disabled());
        iter.advance(3);

        let copy = iter.clone();
        assert_eq!(copy, iter);
        assert_eq!(copy.value(), Some(3.0));
        iter.step();
        assert_eq!(iter.value(), Some(10.0));
        assert_eq!(copy.value(), Some(3.0));
    }

    #[test]
    fn test_advance_backwards_clamps_to_first() {
        let dims = [4, 2, 1];
        let mut arena = ramp(dims, [2, 2, 1]);
        let layout = *arena.layout();
        let blocks = arena.blocks_mut();
        let begin = ValueIter::new(&blocks, layout, Geometry::new(dims), BoxPredicate::disabled());

        let mut iter = begin.clone();
        iter.advance(5);
        assert_eq!(iter.value(), Some(11.0));
        iter.advance(-4);
        assert_eq!(iter.index(), [1, 0, 0]);
        assert_eq!(iter.value(), Some(1.0));

        iter.advance(-100);
        assert_eq!(iter, begin);
        assert_eq!(iter.value(), Some(0.0));
        assert_eq!(iter.next(), Some(0.0));
        assert_eq!(iter.next(), Some(1.0));
    }
}
