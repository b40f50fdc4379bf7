use std::time::Duration;

use crate::ship::{ShipDef, ShipId};

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipDef; NUM_SHIPS] = [
    ShipDef::new(ShipId::Carrier, "Carrier", 5),
    ShipDef::new(ShipId::Battleship, "Battleship", 4),
    ShipDef::new(ShipId::Destroyer, "Destroyer", 3),
    ShipDef::new(ShipId::Submarine, "Submarine", 3),
    ShipDef::new(ShipId::Patrol, "Patrol Boat", 2),
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Random anchor samples tried per ship before placement gives up.
/// Exhausting this bound on a 10x10 board with the standard fleet means the
/// configuration is broken, not that the dice were unlucky.
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// Random samples tried when picking an open cell to fire at, before
/// falling back to a row-major scan of the whole grid.
pub const RANDOM_SHOT_SAMPLES: usize = 25;

/// Pause before the computer answers the human's shot.
pub const COMPUTER_TURN_DELAY: Duration = Duration::from_millis(1000);

/// Pause between turns while autopilot is running.
pub const AUTOPILOT_TURN_DELAY: Duration = Duration::from_millis(1500);
