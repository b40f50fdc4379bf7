//! Ship identities, static definitions, and per-game ship state.

use serde::{Deserialize, Serialize};

use crate::config::{NUM_SHIPS, SHIPS};

/// Identity of one of the five ships in the fixed fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipId {
    Carrier,
    Battleship,
    Destroyer,
    Submarine,
    Patrol,
}

impl ShipId {
    /// All ship ids in placement order.
    pub const ALL: [ShipId; NUM_SHIPS] = [
        ShipId::Carrier,
        ShipId::Battleship,
        ShipId::Destroyer,
        ShipId::Submarine,
        ShipId::Patrol,
    ];

    /// Index of this ship in the fleet roster.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Static definition (name and size) for this ship.
    pub fn def(self) -> &'static ShipDef {
        &SHIPS[self.index()]
    }

    /// Display name, e.g. "Patrol Boat".
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Number of cells this ship occupies.
    pub fn size(self) -> usize {
        self.def().size
    }
}

/// Static definition of a ship type: identity, display name, size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDef {
    pub id: ShipId,
    pub name: &'static str,
    pub size: usize,
}

impl ShipDef {
    pub const fn new(id: ShipId, name: &'static str, size: usize) -> Self {
        Self { id, name, size }
    }
}

/// Orientation of a ship extending from its anchor coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Per-game mutable state of one ship in a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    pub id: ShipId,
    pub placed: bool,
    pub hits: usize,
    pub sunk: bool,
}

impl Ship {
    /// Fresh unplaced, unhit ship.
    pub fn new(id: ShipId) -> Self {
        Ship {
            id,
            placed: false,
            hits: 0,
            sunk: false,
        }
    }
}
