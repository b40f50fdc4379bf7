//! The immutable read-model handed to presentation adapters.
//!
//! Adapters never see the engine itself; they get a [`GameSnapshot`] after
//! every processed intent and submit new intents against it. Everything
//! here is serde-serializable so a non-Rust adapter can sit on the other
//! side of a JSON boundary.

use serde::{Deserialize, Serialize};

use crate::common::{GameOutcome, GamePhase, ShotMark, Side, SidePair};
use crate::config::{BOARD_SIZE, NUM_SHIPS};
use crate::ship::{Orientation, ShipId};

/// Which ship, if any, occupies each cell of a board.
pub type CellGrid = [[Option<ShipId>; BOARD_SIZE]; BOARD_SIZE];

/// What one side's shots have found so far, per cell.
pub type ShotView = [[Option<ShotMark>; BOARD_SIZE]; BOARD_SIZE];

/// Status of one ship as shown to adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipStatus {
    pub id: ShipId,
    pub name: String,
    pub size: usize,
    pub placed: bool,
    pub hits: usize,
    pub sunk: bool,
}

/// Complete state of a game at one instant.
///
/// `revision` increases by one for every intent or scheduled turn the
/// session processes, whether or not it changed anything; an adapter that
/// submitted `n` intents can await `revision >= before + n` to observe
/// their combined effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub revision: u64,
    pub phase: GamePhase,
    pub active: Side,
    pub outcome: Option<GameOutcome>,
    pub message: String,
    pub autopilot: bool,
    pub orientation: Orientation,
    pub selected: Option<ShipId>,
    /// Each side's own board.
    pub boards: SidePair<CellGrid>,
    /// Each side's shots against the opponent's board.
    pub shots: SidePair<ShotView>,
    pub fleets: SidePair<[ShipStatus; NUM_SHIPS]>,
}

impl GameSnapshot {
    /// True once the game has reached its terminal phase.
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// First unplaced ship of `side`, in roster order.
    pub fn next_unplaced(&self, side: Side) -> Option<&ShipStatus> {
        self.fleets.get(side).iter().find(|s| !s.placed)
    }

    /// Number of shots `side` has fired.
    pub fn shots_fired(&self, side: Side) -> usize {
        self.shots
            .get(side)
            .iter()
            .flatten()
            .filter(|c| c.is_some())
            .count()
    }
}
