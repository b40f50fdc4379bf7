//! The turn engine: one state machine owning both boards, both fleets, and
//! the placing → playing → game-over lifecycle.
//!
//! The engine is synchronous and deterministic given its RNG; it knows
//! nothing about timers. Scheduling (the pause before a computer move, the
//! autopilot cadence) lives in [`crate::session`], which calls back into
//! [`GameEngine::computer_turn`] / [`GameEngine::autopilot_turn`] when a
//! deferred turn comes due.

use log::{debug, info};
use rand::rngs::SmallRng;

use crate::board::Board;
use crate::common::{GameError, GameOutcome, GamePhase, ShotOutcome, Side, SidePair};
use crate::config::{BOARD_SIZE, NUM_SHIPS, SHIPS};
use crate::fleet::Fleet;
use crate::resolver::resolve_shot;
use crate::ship::{Orientation, ShipId};
use crate::shots::ShotGrid;
use crate::snapshot::{CellGrid, GameSnapshot, ShipStatus, ShotView};

const PLACE_PROMPT: &str = "Place your ships to start the game!";

/// Core game state machine. All adapter intents arrive here; invalid ones
/// are rejected or ignored without mutating state, per the error taxonomy:
/// only invariant violations come back as `Err`.
pub struct GameEngine {
    phase: GamePhase,
    active: Side,
    boards: SidePair<Board>,
    shots: SidePair<ShotGrid>,
    fleets: SidePair<Fleet>,
    selected: Option<ShipId>,
    orientation: Orientation,
    autopilot: bool,
    outcome: Option<GameOutcome>,
    message: String,
    rng: SmallRng,
}

impl GameEngine {
    /// Fresh game in the placing phase.
    pub fn new(rng: SmallRng) -> Self {
        GameEngine {
            phase: GamePhase::Placing,
            active: Side::Player,
            boards: SidePair::default(),
            shots: SidePair::default(),
            fleets: SidePair::default(),
            selected: None,
            orientation: Orientation::Horizontal,
            autopilot: false,
            outcome: None,
            message: PLACE_PROMPT.to_string(),
            rng,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn active(&self) -> Side {
        self.active
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Select which ship the next `place_at` will drop. Ignored outside
    /// the placing phase or for a ship that is already down.
    pub fn select_ship(&mut self, id: ShipId) {
        if self.phase != GamePhase::Placing {
            return;
        }
        let placed = self
            .fleets
            .get(Side::Player)
            .ship(id)
            .map(|s| s.placed)
            .unwrap_or(true);
        if placed {
            debug!("ignoring selection of already-placed {:?}", id);
            return;
        }
        self.selected = Some(id);
    }

    /// Set the orientation the next placement will use.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.phase == GamePhase::Placing {
            self.orientation = orientation;
        }
    }

    /// Drop the selected ship with its anchor at `(row, col)`. A missing
    /// selection or a failing validation leaves everything untouched.
    /// Placing the fifth ship randomizes the computer fleet and starts
    /// the battle with the player active.
    pub fn place_at(&mut self, row: usize, col: usize) -> Result<(), GameError> {
        if self.phase != GamePhase::Placing {
            return Ok(());
        }
        let Some(id) = self.selected else {
            return Ok(());
        };
        if !self
            .boards
            .get(Side::Player)
            .is_valid_placement(id, row, col, self.orientation)
        {
            debug!("rejected placement of {:?} at ({}, {})", id, row, col);
            return Ok(());
        }
        self.boards
            .get_mut(Side::Player)
            .place_ship(id, row, col, self.orientation)?;
        self.fleets.get_mut(Side::Player).mark_placed(id)?;
        self.selected = None;

        if self.fleets.get(Side::Player).all_placed() {
            self.randomize_fleet(Side::Computer)?;
            self.phase = GamePhase::Playing;
            self.active = Side::Player;
            self.message = "Game started! Fire at the computer's fleet!".to_string();
            info!("all ships placed; battle begins");
        }
        Ok(())
    }

    /// Human fire intent. Returns `Ok(true)` when the shot was accepted
    /// and resolved; `Ok(false)` when it was ignored (wrong phase, wrong
    /// turn, out of bounds, or an already-shot cell).
    pub fn fire_at(&mut self, row: usize, col: usize) -> Result<bool, GameError> {
        if self.phase != GamePhase::Playing || self.active != Side::Player || self.autopilot {
            return Ok(false);
        }
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            debug!("ignoring out-of-bounds fire intent at ({}, {})", row, col);
            return Ok(false);
        }
        let outcome = self.fire(Side::Player, row, col)?;
        if outcome == ShotOutcome::AlreadyShot {
            return Ok(false);
        }
        self.apply_outcome(Side::Player, outcome);
        Ok(true)
    }

    /// Execute the computer's deferred move. A no-op unless the game is
    /// running, it is actually the computer's turn, and autopilot is off —
    /// a stale timer firing after a reset must find nothing to do.
    pub fn computer_turn(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Playing || self.active != Side::Computer || self.autopilot {
            return Ok(());
        }
        let Some((row, col)) = self
            .shots
            .get(Side::Computer)
            .random_open_cell(&mut self.rng)
        else {
            self.end_in_draw();
            return Ok(());
        };
        let outcome = self.fire(Side::Computer, row, col)?;
        self.apply_outcome(Side::Computer, outcome);
        Ok(())
    }

    /// Execute one autopilot turn for whichever side is active.
    pub fn autopilot_turn(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Playing || !self.autopilot {
            return Ok(());
        }
        let attacker = self.active;
        let Some((row, col)) = self.shots.get(attacker).random_open_cell(&mut self.rng) else {
            self.end_in_draw();
            return Ok(());
        };
        let outcome = self.fire(attacker, row, col)?;
        self.apply_outcome(attacker, outcome);
        Ok(())
    }

    /// Enter autopilot from the placing phase: any partial placement is
    /// discarded, both fleets are randomized, and the battle starts with
    /// Blue Fleet (the player slot) active.
    pub fn start_autopilot(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Placing {
            return Ok(());
        }
        self.autopilot = true;
        self.selected = None;
        self.randomize_fleet(Side::Player)?;
        self.randomize_fleet(Side::Computer)?;
        self.phase = GamePhase::Playing;
        self.active = Side::Player;
        self.message = "Autopilot mode activated! Watch Blue Fleet vs Red Fleet battle!".to_string();
        info!("autopilot engaged");
        Ok(())
    }

    /// Leave autopilot, keeping boards, shots, and fleets exactly as they
    /// are. The session cancels the pending turn.
    pub fn stop_autopilot(&mut self) {
        if !self.autopilot {
            return;
        }
        self.autopilot = false;
        self.message = "Autopilot mode deactivated!".to_string();
        info!("autopilot disengaged");
    }

    /// Discard the entire game and return to the placing phase. Nothing
    /// survives except the RNG stream.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Placing;
        self.active = Side::Player;
        self.boards = SidePair::default();
        self.shots = SidePair::default();
        self.fleets = SidePair::default();
        self.selected = None;
        self.orientation = Orientation::Horizontal;
        self.autopilot = false;
        self.outcome = None;
        self.message = PLACE_PROMPT.to_string();
        info!("game reset");
    }

    /// Snapshot the full state for adapters.
    pub fn snapshot(&self, revision: u64) -> GameSnapshot {
        GameSnapshot {
            revision,
            phase: self.phase,
            active: self.active,
            outcome: self.outcome,
            message: self.message.clone(),
            autopilot: self.autopilot,
            orientation: self.orientation,
            selected: self.selected,
            boards: SidePair::new(self.cell_grid(Side::Player), self.cell_grid(Side::Computer)),
            shots: SidePair::new(self.shot_view(Side::Player), self.shot_view(Side::Computer)),
            fleets: SidePair::new(
                self.fleet_status(Side::Player),
                self.fleet_status(Side::Computer),
            ),
        }
    }

    /// Place every ship of `side` randomly on a fresh board, replacing
    /// whatever was there. The side's shot grid is cleared too.
    fn randomize_fleet(&mut self, side: Side) -> Result<(), GameError> {
        let mut board = Board::new();
        let mut fleet = Fleet::new();
        for def in &SHIPS {
            let (row, col, orientation) = board.random_placement(&mut self.rng, def.id)?;
            board.place_ship(def.id, row, col, orientation)?;
            fleet.mark_placed(def.id)?;
        }
        self.boards.set(side, board);
        self.fleets.set(side, fleet);
        self.shots.set(side, ShotGrid::new());
        debug!("randomized fleet for {:?}", side);
        Ok(())
    }

    fn fire(&mut self, attacker: Side, row: usize, col: usize) -> Result<ShotOutcome, GameError> {
        let board = self.boards.get(attacker.opponent());
        let fleet = self.fleets.get_mut(attacker.opponent());
        let shots = self.shots.get_mut(attacker);
        resolve_shot(board, fleet, shots, row, col)
    }

    /// Update message and phase after a resolved shot. The win check runs
    /// against the freshly updated defending fleet, before the turn
    /// switches; a winning shot never hands the turn over.
    fn apply_outcome(&mut self, attacker: Side, outcome: ShotOutcome) {
        self.message = self.shot_message(attacker, outcome);
        let struck = matches!(outcome, ShotOutcome::Hit(_) | ShotOutcome::Sunk(_));
        if struck && self.fleets.get(attacker.opponent()).all_sunk() {
            self.phase = GamePhase::GameOver;
            self.outcome = Some(GameOutcome::Victory(attacker));
            self.message = self.win_message(attacker);
            info!("{:?} wins", attacker);
            return;
        }
        self.active = attacker.opponent();
    }

    fn end_in_draw(&mut self) {
        self.phase = GamePhase::GameOver;
        self.outcome = Some(GameOutcome::Draw);
        self.message = "Game ended in a draw!".to_string();
        info!("no open cells remain; draw");
    }

    fn shot_message(&self, attacker: Side, outcome: ShotOutcome) -> String {
        if self.autopilot {
            let who = attacker.label(true);
            let target = attacker.opponent().label(true);
            return match outcome {
                ShotOutcome::Hit(id) => format!("{} hit {}'s {}!", who, target, id.name()),
                ShotOutcome::Sunk(id) => format!("{} sank {}'s {}!", who, target, id.name()),
                ShotOutcome::Miss => format!("{} missed!", who),
                ShotOutcome::AlreadyShot => self.message.clone(),
            };
        }
        match (attacker, outcome) {
            (Side::Player, ShotOutcome::Hit(id)) => {
                format!("Hit! You hit the computer's {}!", id.name())
            }
            (Side::Player, ShotOutcome::Sunk(id)) => {
                format!("You sank the computer's {}!", id.name())
            }
            (Side::Player, ShotOutcome::Miss) => "Miss!".to_string(),
            (Side::Computer, ShotOutcome::Hit(id)) => {
                format!("Computer hit your {}!", id.name())
            }
            (Side::Computer, ShotOutcome::Sunk(id)) => {
                format!("Computer sank your {}!", id.name())
            }
            (Side::Computer, ShotOutcome::Miss) => "Computer missed!".to_string(),
            (_, ShotOutcome::AlreadyShot) => self.message.clone(),
        }
    }

    fn win_message(&self, winner: Side) -> String {
        if self.autopilot {
            format!("{} wins!", winner.label(true))
        } else {
            match winner {
                Side::Player => "Congratulations! You won!".to_string(),
                Side::Computer => "Game Over! Computer won!".to_string(),
            }
        }
    }

    fn cell_grid(&self, side: Side) -> CellGrid {
        let board = self.boards.get(side);
        let mut grid: CellGrid = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = board.ship_id_at(r, c).unwrap_or(None);
            }
        }
        grid
    }

    fn shot_view(&self, side: Side) -> ShotView {
        let shots = self.shots.get(side);
        let mut grid: ShotView = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = shots.get(r, c).unwrap_or(None);
            }
        }
        grid
    }

    fn fleet_status(&self, side: Side) -> [ShipStatus; NUM_SHIPS] {
        let fleet = self.fleets.get(side);
        core::array::from_fn(|i| {
            let ship = &fleet.ships()[i];
            ShipStatus {
                id: ship.id,
                name: ship.id.name().to_string(),
                size: ship.id.size(),
                placed: ship.placed,
                hits: ship.hits,
                sunk: ship.sunk,
            }
        })
    }
}
