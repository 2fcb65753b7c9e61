//! Value range reductions.

use rayon::prelude::*;
use tracing::debug;

use crate::grid::Grid;
use crate::layout::Dims;

fn merge(acc: Option<(f32, f32)>, v: (f32, f32)) -> Option<(f32, f32)> {
    Some(match acc {
        Some((lo, hi)) => (lo.min(v.0), hi.max(v.1)),
        None => v,
    })
}

impl Grid<'_> {
    /// Minimum and maximum over every non-missing value.
    ///
    /// The flat index space is split into one contiguous chunk per worker and
    /// reduced in parallel. Returns `(mv, mv)` when every value is missing.
    pub fn range(&self) -> (f32, f32) {
        let mv = self.missing_value();
        if self.is_dataless() {
            return (mv, mv);
        }

        let n = self.layout().num_values();
        let workers = self
            .range_workers()
            .unwrap_or_else(rayon::current_num_threads)
            .clamp(1, n);
        let stride = n.div_ceil(workers);

        let partials: Vec<Option<(f32, f32)>> = (0..workers)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * stride;
                if start >= n {
                    return None;
                }
                let len = stride.min(n - start);

                let mut values = self.values();
                values.advance(start as i64);
                values
                    .take(len)
                    .filter(|&v| v != mv)
                    .fold(None, |acc, v| merge(acc, (v, v)))
            })
            .collect();

        let range = partials.into_iter().flatten().fold(None, merge);

        debug!(values = n, workers, found = range.is_some(), "Computed grid range");

        range.unwrap_or((mv, mv))
    }

    /// Minimum and maximum over the closed index box `[min, max]`, clamped
    /// onto the grid, skipping missing values.
    pub fn range_in(&self, min: Dims, max: Dims) -> (f32, f32) {
        let mv = self.missing_value();
        let lo = self.layout().clamp(min);
        let hi = self.layout().clamp(max);

        let mut range = None;
        for k in lo[2]..=hi[2] {
            for j in lo[1]..=hi[1] {
                for i in lo[0]..=hi[0] {
                    let v = self.access_ijk(i, j, k);
                    if v != mv {
                        range = merge(range, (v, v));
                    }
                }
            }
        }

        range.unwrap_or((mv, mv))
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::BlockArena;
    use crate::{Grid, GridConfig};

    #[test]
    fn test_range_skips_missing() {
        let mut arena = BlockArena::from_fn([5, 4, 3], [2, 2, 2], |[i, j, k]| (i + 10 * j + 100 * k) as f32)
            .unwrap();
        let mut grid = Grid::new([5, 4, 3], [2, 2, 2], arena.blocks_mut(), 3).unwrap();
        grid.set_missing_value(-1.0);
        grid.set_value_ijk(0, 0, 0, -1.0);
        grid.set_value_ijk(4, 3, 2, -1.0);

        assert_eq!(grid.range(), (1.0, 233.0));
    }

    #[test]
    fn test_range_all_missing() {
        let mut arena = BlockArena::new([3, 3, 1], [2, 2, 1], f32::INFINITY).unwrap();
        let grid = Grid::new([3, 3, 1], [2, 2, 1], arena.blocks_mut(), 2).unwrap();
        assert_eq!(grid.range(), (f32::INFINITY, f32::INFINITY));
        assert_eq!(grid.range_in([0, 0, 0], [2, 2, 0]), (f32::INFINITY, f32::INFINITY));
    }

    #[test]
    fn test_range_independent_of_workers() {
        let mut arena = BlockArena::from_fn([7, 5, 2], [3, 2, 2], |[i, j, k]| ((i * 7 + j * 3 + k) % 11) as f32)
            .unwrap();
        let mut grid = Grid::new([7, 5, 2], [3, 2, 2], arena.blocks_mut(), 3).unwrap();
        grid.set_missing_value(0.0);

        let mut seen = Vec::new();
        for workers in [1, 2, 3, 8, 1000] {
            grid.apply_config(&GridConfig {
                range_workers: Some(workers),
                missing_value: Some(0.0),
                ..Default::default()
            })
            .unwrap();
            seen.push(grid.range());
        }
        assert!(seen.iter().all(|r| *r == (1.0, 10.0)), "{seen:?}");
    }

    #[test]
    fn test_range_in_box() {
        let mut arena = BlockArena::from_fn([4, 4, 1], [2, 2, 1], |[i, j, _]| (i + 10 * j) as f32).unwrap();
        let grid = Grid::new([4, 4, 1], [2, 2, 1], arena.blocks_mut(), 2).unwrap();
        assert_eq!(grid.range_in([1, 1, 0], [2, 2, 0]), (11.0, 22.0));
        assert_eq!(grid.range_in([3, 3, 0], [99, 99, 9]), (33.0, 33.0));
    }
}
