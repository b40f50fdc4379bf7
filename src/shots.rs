//! One side's record of shots fired at the opponent's board.

use rand::Rng;

use crate::common::{GameError, ShotMark};
use crate::config::{BOARD_SIZE, RANDOM_SHOT_SAMPLES};
use crate::mask::CellMask;

/// Parallel 10x10 grid of shots already taken: hit, miss, or untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotGrid {
    hits: CellMask,
    misses: CellMask,
}

impl ShotGrid {
    /// Fresh grid, nothing fired yet.
    pub fn new() -> Self {
        ShotGrid::default()
    }

    /// Mark left at `(row, col)`, if any.
    pub fn get(&self, row: usize, col: usize) -> Result<Option<ShotMark>, GameError> {
        if self.hits.get(row, col)? {
            Ok(Some(ShotMark::Hit))
        } else if self.misses.get(row, col)? {
            Ok(Some(ShotMark::Miss))
        } else {
            Ok(None)
        }
    }

    /// Whether `(row, col)` has been fired at.
    pub fn is_shot(&self, row: usize, col: usize) -> Result<bool, GameError> {
        Ok(self.get(row, col)?.is_some())
    }

    /// Record `mark` at `(row, col)`. The caller (the resolver) guarantees
    /// the cell is untouched.
    pub fn mark(&mut self, row: usize, col: usize, mark: ShotMark) -> Result<(), GameError> {
        debug_assert!(!self.is_shot(row, col).unwrap_or(false));
        match mark {
            ShotMark::Hit => self.hits.set(row, col),
            ShotMark::Miss => self.misses.set(row, col),
        }
    }

    /// Number of shots taken so far.
    pub fn count(&self) -> usize {
        self.hits.count() + self.misses.count()
    }

    /// Pick an unshot cell uniformly at random: a bounded number of random
    /// samples first, then a row-major scan so the search terminates even
    /// when almost nothing is open. `None` means the grid is exhausted —
    /// the game is a draw, not an error.
    pub fn random_open_cell<R: Rng>(&self, rng: &mut R) -> Option<(usize, usize)> {
        for _ in 0..RANDOM_SHOT_SAMPLES {
            let row = rng.random_range(0..BOARD_SIZE);
            let col = rng.random_range(0..BOARD_SIZE);
            if !self.is_shot(row, col).unwrap_or(true) {
                return Some((row, col));
            }
        }
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if !self.is_shot(row, col).unwrap_or(true) {
                    return Some((row, col));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn full_grid_except(open: &[(usize, usize)]) -> ShotGrid {
        let mut grid = ShotGrid::new();
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                if !open.contains(&(r, c)) {
                    grid.mark(r, c, ShotMark::Miss).unwrap();
                }
            }
        }
        grid
    }

    #[test]
    fn marks_are_readable_and_distinct() {
        let mut grid = ShotGrid::new();
        grid.mark(0, 0, ShotMark::Hit).unwrap();
        grid.mark(5, 5, ShotMark::Miss).unwrap();
        assert_eq!(grid.get(0, 0).unwrap(), Some(ShotMark::Hit));
        assert_eq!(grid.get(5, 5).unwrap(), Some(ShotMark::Miss));
        assert_eq!(grid.get(9, 9).unwrap(), None);
        assert_eq!(grid.count(), 2);
    }

    #[test]
    fn random_open_cell_returns_an_unshot_cell() {
        let mut rng = SmallRng::seed_from_u64(7);
        let grid = ShotGrid::new();
        for _ in 0..100 {
            let (r, c) = grid.random_open_cell(&mut rng).unwrap();
            assert!(!grid.is_shot(r, c).unwrap());
        }
    }

    #[test]
    fn scan_fallback_finds_the_last_open_cell() {
        // With one cell open, 25 random samples will usually all miss it;
        // the scan must still find it.
        let grid = full_grid_except(&[(7, 3)]);
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert_eq!(grid.random_open_cell(&mut rng), Some((7, 3)));
        }
    }

    #[test]
    fn exhausted_grid_yields_none() {
        let grid = full_grid_except(&[]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(grid.random_open_cell(&mut rng), None);
    }
}
