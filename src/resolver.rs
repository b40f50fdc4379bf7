//! Applies a single shot to a (board, fleet, shot grid) triple.

use log::error;

use crate::board::Board;
use crate::common::{GameError, ShotMark, ShotOutcome};
use crate::fleet::Fleet;
use crate::shots::ShotGrid;

/// Resolve a shot at `(row, col)` against `board`, recording the result in
/// `shots` and any damage in `fleet`.
///
/// Re-firing at a marked cell is an [`ShotOutcome::AlreadyShot`] no-op, so
/// a ship can never be hit twice through one cell. The owning ship is read
/// from the board before anything is mutated; an occupied cell no ship
/// owns aborts the shot with [`GameError::UnknownShipHit`], leaving grid
/// and fleet untouched.
pub fn resolve_shot(
    board: &Board,
    fleet: &mut Fleet,
    shots: &mut ShotGrid,
    row: usize,
    col: usize,
) -> Result<ShotOutcome, GameError> {
    if shots.is_shot(row, col)? {
        return Ok(ShotOutcome::AlreadyShot);
    }

    if !board.is_occupied(row, col)? {
        shots.mark(row, col, ShotMark::Miss)?;
        return Ok(ShotOutcome::Miss);
    }

    let Some(id) = board.ship_id_at(row, col)? else {
        error!("occupied cell ({row}, {col}) is owned by no ship");
        return Err(GameError::UnknownShipHit { row, col });
    };

    let sunk = fleet.register_hit(id)?.sunk;
    shots.mark(row, col, ShotMark::Hit)?;
    Ok(if sunk {
        ShotOutcome::Sunk(id)
    } else {
        ShotOutcome::Hit(id)
    })
}
