//! Common types shared across the engine: errors, sides, phases, outcomes.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::ship::ShipId;

/// Errors surfaced by board, fleet, and resolver operations.
///
/// These are invariant violations, not ordinary gameplay outcomes: a
/// rejected placement is a `bool`, a duplicate shot is
/// [`ShotOutcome::AlreadyShot`]. Anything here means a caller bug or a
/// corrupted board/fleet pair and must be surfaced, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Row or column index falls outside the 10x10 grid.
    OutOfBounds { row: usize, col: usize },
    /// Ship id has no entry in the fleet roster.
    ShipNotFound(ShipId),
    /// A cell is marked occupied but no ship's placement covers it.
    UnknownShipHit { row: usize, col: usize },
    /// Random placement exhausted its retry bound.
    UnableToPlaceShip(ShipId),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfBounds { row, col } => {
                write!(f, "coordinate ({}, {}) is out of bounds", row, col)
            }
            GameError::ShipNotFound(id) => {
                write!(f, "ship {:?} not found in fleet", id)
            }
            GameError::UnknownShipHit { row, col } => {
                write!(
                    f,
                    "cell ({}, {}) is occupied but owned by no ship",
                    row, col
                )
            }
            GameError::UnableToPlaceShip(id) => {
                write!(f, "unable to find a legal placement for {:?}", id)
            }
        }
    }
}

impl std::error::Error for GameError {}

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }

    /// Display label; autopilot renames the sides to the two fleets.
    pub fn label(self, autopilot: bool) -> &'static str {
        match (self, autopilot) {
            (Side::Player, true) => "Blue Fleet",
            (Side::Computer, true) => "Red Fleet",
            (Side::Player, false) => "You",
            (Side::Computer, false) => "Computer",
        }
    }
}

/// Lifecycle phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Placing,
    Playing,
    GameOver,
}

/// Terminal result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Victory(Side),
    Draw,
}

/// Mark left on a shot grid cell once it has been fired at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotMark {
    Hit,
    Miss,
}

/// Result of resolving one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Struck a ship without finishing it.
    Hit(ShipId),
    /// Struck the last intact segment of a ship.
    Sunk(ShipId),
    /// Open water.
    Miss,
    /// The cell was already fired at; nothing changed.
    AlreadyShot,
}

/// A pair of values, one per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub player: T,
    pub computer: T,
}

impl<T> SidePair<T> {
    pub fn new(player: T, computer: T) -> Self {
        Self { player, computer }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Computer => &self.computer,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Computer => &mut self.computer,
        }
    }

    pub fn set(&mut self, side: Side, value: T) {
        *self.get_mut(side) = value;
    }
}

impl<T: Default> Default for SidePair<T> {
    fn default() -> Self {
        Self {
            player: T::default(),
            computer: T::default(),
        }
    }
}
