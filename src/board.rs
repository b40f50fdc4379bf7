//! Board state: where each ship sits, and what the combined occupancy is.
//!
//! Validation and mutation are split on purpose: [`Board::is_valid_placement`]
//! is pure, [`Board::place_ship`] writes without checking overlap. Callers
//! validate first; the engine is the only caller.

use rand::Rng;

use crate::common::GameError;
use crate::config::{BOARD_SIZE, NUM_SHIPS, PLACEMENT_ATTEMPTS};
use crate::mask::CellMask;
use crate::ship::{Orientation, ShipId};

/// One side's board: per-ship placement masks plus the combined occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Board {
    ships: [Option<CellMask>; NUM_SHIPS],
    occupancy: CellMask,
}

/// Cells a ship of `size` would occupy from `(row, col)` per `orientation`.
/// Errors if any cell would fall off the grid.
fn placement_mask(
    size: usize,
    row: usize,
    col: usize,
    orientation: Orientation,
) -> Result<CellMask, GameError> {
    let mut mask = CellMask::new();
    for i in 0..size {
        let (r, c) = match orientation {
            Orientation::Horizontal => (row, col + i),
            Orientation::Vertical => (row + i, col),
        };
        mask.set(r, c)?;
    }
    Ok(mask)
}

impl Board {
    /// Empty board, no ships placed.
    pub fn new() -> Self {
        Board::default()
    }

    /// Whether `ship` fits at `(row, col)` with `orientation`: fully in
    /// bounds and overlapping nothing. Pure; the board is untouched.
    pub fn is_valid_placement(
        &self,
        ship: ShipId,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> bool {
        match placement_mask(ship.size(), row, col, orientation) {
            Ok(mask) => !self.occupancy.intersects(mask),
            Err(_) => false,
        }
    }

    /// Write `ship` onto the board. Overlap is NOT checked here; callers
    /// must have run [`Board::is_valid_placement`] first. An out-of-bounds
    /// anchor still errors, since the mask cannot be built at all.
    pub fn place_ship(
        &mut self,
        ship: ShipId,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<(), GameError> {
        let mask = placement_mask(ship.size(), row, col, orientation)?;
        self.ships[ship.index()] = Some(mask);
        self.occupancy |= mask;
        Ok(())
    }

    /// Which ship, if any, occupies `(row, col)`.
    pub fn ship_id_at(&self, row: usize, col: usize) -> Result<Option<ShipId>, GameError> {
        for (i, slot) in self.ships.iter().enumerate() {
            if let Some(mask) = slot {
                if mask.get(row, col)? {
                    return Ok(Some(ShipId::ALL[i]));
                }
            }
        }
        // still bounds-check when no ship covers the cell
        self.occupancy.get(row, col)?;
        Ok(None)
    }

    /// Whether any ship occupies `(row, col)`, per the combined occupancy.
    pub fn is_occupied(&self, row: usize, col: usize) -> Result<bool, GameError> {
        self.occupancy.get(row, col)
    }

    /// Cells occupied by `ship`, if it has been placed.
    pub fn ship_cells(&self, ship: ShipId) -> Option<CellMask> {
        self.ships[ship.index()]
    }

    /// Find a random legal (row, col, orientation) for `ship`. Anchors are
    /// sampled within bounds so only overlap forces a retry. Exhausting the
    /// attempt bound means the board/fleet configuration is broken and is
    /// reported as an error rather than retried forever.
    pub fn random_placement<R: Rng>(
        &self,
        rng: &mut R,
        ship: ShipId,
    ) -> Result<(usize, usize, Orientation), GameError> {
        let size = ship.size();
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_row, max_col) = match orientation {
                Orientation::Horizontal => (BOARD_SIZE - 1, BOARD_SIZE - size),
                Orientation::Vertical => (BOARD_SIZE - size, BOARD_SIZE - 1),
            };
            let row = rng.random_range(0..=max_row);
            let col = rng.random_range(0..=max_col);
            if self.is_valid_placement(ship, row, col, orientation) {
                return Ok((row, col, orientation));
            }
        }
        Err(GameError::UnableToPlaceShip(ship))
    }

    /// Corrupt the occupancy layer without placing a ship. Only exists so
    /// tests can exercise the resolver's consistency check.
    #[cfg(test)]
    pub(crate) fn inject_occupancy(&mut self, row: usize, col: usize) {
        let mut mask = CellMask::new();
        mask.set(row, col).unwrap();
        self.occupancy |= mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn placement_occupies_exactly_size_cells_in_line() {
        let mut board = Board::new();
        assert!(board.is_valid_placement(ShipId::Destroyer, 2, 2, Orientation::Horizontal));
        board
            .place_ship(ShipId::Destroyer, 2, 2, Orientation::Horizontal)
            .unwrap();

        let cells: Vec<_> = board
            .ship_cells(ShipId::Destroyer)
            .unwrap()
            .iter_set()
            .collect();
        assert_eq!(cells, vec![(2, 2), (2, 3), (2, 4)]);
        assert_eq!(board.ship_id_at(2, 3).unwrap(), Some(ShipId::Destroyer));
        assert_eq!(board.ship_id_at(2, 5).unwrap(), None);
    }

    #[test]
    fn out_of_bounds_placement_is_rejected() {
        let board = Board::new();
        // Carrier is 5 long; col 6 horizontal would reach col 10.
        assert!(!board.is_valid_placement(ShipId::Carrier, 0, 6, Orientation::Horizontal));
        assert!(!board.is_valid_placement(ShipId::Carrier, 6, 0, Orientation::Vertical));
        // ...but the same anchor works in the other orientation.
        assert!(board.is_valid_placement(ShipId::Carrier, 0, 6, Orientation::Vertical));
    }

    #[test]
    fn overlap_is_rejected_and_board_unchanged() {
        let mut board = Board::new();
        board
            .place_ship(ShipId::Carrier, 0, 0, Orientation::Horizontal)
            .unwrap();
        let before = board;
        assert!(!board.is_valid_placement(ShipId::Patrol, 0, 4, Orientation::Vertical));
        assert_eq!(board, before);
    }

    #[test]
    fn random_placement_of_full_roster_never_overlaps() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut board = Board::new();
            let mut total = 0;
            for id in ShipId::ALL {
                let (r, c, o) = board.random_placement(&mut rng, id).unwrap();
                assert!(board.is_valid_placement(id, r, c, o));
                board.place_ship(id, r, c, o).unwrap();
                total += id.size();
            }
            let occupied: usize = (0..BOARD_SIZE)
                .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
                .filter(|&(r, c)| board.is_occupied(r, c).unwrap())
                .count();
            assert_eq!(occupied, total);
        }
    }

    proptest! {
        #[test]
        fn any_in_bounds_placement_on_empty_board_is_valid(
            ship_idx in 0usize..NUM_SHIPS,
            row in 0usize..BOARD_SIZE,
            col in 0usize..BOARD_SIZE,
            horizontal in proptest::bool::ANY,
        ) {
            let ship = ShipId::ALL[ship_idx];
            let orientation = if horizontal {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let fits = match orientation {
                Orientation::Horizontal => col + ship.size() <= BOARD_SIZE,
                Orientation::Vertical => row + ship.size() <= BOARD_SIZE,
            };

            let mut board = Board::new();
            prop_assert_eq!(
                board.is_valid_placement(ship, row, col, orientation),
                fits
            );
            if fits {
                board.place_ship(ship, row, col, orientation).unwrap();
                let mask = board.ship_cells(ship).unwrap();
                prop_assert_eq!(mask.count(), ship.size());
                // every occupied cell shares the anchor's row or column
                for (r, c) in mask.iter_set() {
                    match orientation {
                        Orientation::Horizontal => prop_assert_eq!(r, row),
                        Orientation::Vertical => prop_assert_eq!(c, col),
                    }
                }
            }
        }
    }
}
