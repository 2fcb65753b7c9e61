use crate::layout::{vectorize, Dims};

/// Position in a row-major `(i, j, k)` index space, X fastest.
///
/// The end sentinel is `(0, 0, dims[2])`, one past the last plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCursor {
    dims: Dims,
    index: Dims,
}

impl IndexCursor {
    pub fn begin(dims: Dims) -> Self {
        Self {
            dims,
            index: [0, 0, 0],
        }
    }

    pub fn end(dims: Dims) -> Self {
        Self {
            dims,
            index: [0, 0, dims[2]],
        }
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn index(&self) -> Dims {
        self.index
    }

    pub fn is_end(&self) -> bool {
        self.index == [0, 0, self.dims[2]]
    }

    /// Linear position. The end sentinel maps to the element count.
    pub fn linear(&self) -> usize {
        let [nx, ny, _] = self.dims;
        self.index[0] + self.index[1] * nx + self.index[2] * nx * ny
    }

    fn count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Cursor one position further, carrying into Y then Z.
    pub fn stepped(self) -> Self {
        if self.is_end() {
            return self;
        }

        let mut index = self.index;
        index[0] += 1;
        if index[0] >= self.dims[0] {
            index[0] = 0;
            index[1] += 1;
            if index[1] >= self.dims[1] {
                index[1] = 0;
                index[2] += 1;
            }
        }

        Self { index, ..self }
    }

    /// Cursor moved by `offset` linear positions. Positions before the start
    /// clamp to the start; positions past the last element become the end.
    pub fn advanced(self, offset: i64) -> Self {
        let target = self.linear() as i64 + offset;
        if target < 0 {
            return Self::begin(self.dims);
        }

        let target = target as usize;
        if target >= self.count() {
            return Self::end(self.dims);
        }

        Self {
            index: vectorize(target, self.dims),
            ..self
        }
    }

    pub fn step(&mut self) {
        *self = self.stepped();
    }

    pub fn advance(&mut self, offset: i64) {
        *self = self.advanced(offset);
    }

    /// Jump straight to an index triple.
    pub fn seek(&mut self, index: Dims) {
        self.index = index;
    }
}

/// Iterator over every index of a row-major index space.
///
/// Used for both node and cell enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexIter {
    cursor: IndexCursor,
}

impl IndexIter {
    pub fn begin(dims: Dims) -> Self {
        Self {
            cursor: IndexCursor::begin(dims),
        }
    }

    pub fn end(dims: Dims) -> Self {
        Self {
            cursor: IndexCursor::end(dims),
        }
    }

    pub fn cursor(&self) -> IndexCursor {
        self.cursor
    }

    /// Current index, or `None` at the end.
    pub fn current(&self) -> Option<Dims> {
        (!self.cursor.is_end()).then(|| self.cursor.index())
    }

    pub fn is_end(&self) -> bool {
        self.cursor.is_end()
    }

    pub fn step(&mut self) {
        self.cursor.step();
    }

    /// Random-offset advance, O(1).
    pub fn advance(&mut self, offset: i64) {
        self.cursor.advance(offset);
    }
}

impl Iterator for IndexIter {
    type Item = Dims;

    fn next(&mut self) -> Option<Dims> {
        let current = self.current()?;
        self.cursor.step();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.count().saturating_sub(self.cursor.linear());
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IndexIter {}
