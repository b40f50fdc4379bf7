//! Turn engine for the classic Battleship game: placement, shot
//! resolution, win/draw detection, and timer-paced computer and autopilot
//! turns. Presentation is someone else's problem — adapters consume
//! [`GameSnapshot`]s and feed intents back through a [`GameHandle`].

mod board;
mod common;
mod config;
mod engine;
mod fleet;
mod logging;
mod mask;
mod resolver;
mod session;
mod ship;
mod shots;
mod snapshot;
pub mod view;

pub use board::Board;
pub use common::{GameError, GameOutcome, GamePhase, ShotMark, ShotOutcome, Side, SidePair};
pub use config::*;
pub use engine::GameEngine;
pub use fleet::Fleet;
pub use logging::init_logging;
pub use mask::CellMask;
pub use resolver::resolve_shot;
pub use session::{Command, GameHandle, GameSession, SessionConfig};
pub use ship::{Orientation, Ship, ShipDef, ShipId};
pub use shots::ShotGrid;
pub use snapshot::{CellGrid, GameSnapshot, ShipStatus, ShotView};
