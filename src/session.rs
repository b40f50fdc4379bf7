//! Async driver around [`GameEngine`]: one task owns the state, adapters
//! talk to it through channels.
//!
//! Deferred turns (the computer's "thinking time", the autopilot cadence)
//! are a single-slot timer: scheduling cancels whatever was pending, and a
//! generation counter makes an already-queued expiry harmless after a
//! cancel. State flows out through a watch channel as [`GameSnapshot`]s,
//! so adapters always read the engine's latest word, never a stale
//! capture.

use std::time::Duration;

use anyhow::anyhow;
use log::{debug, error, trace};
use rand::rngs::SmallRng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::common::{GamePhase, Side};
use crate::config::{AUTOPILOT_TURN_DELAY, COMPUTER_TURN_DELAY};
use crate::engine::GameEngine;
use crate::ship::{Orientation, ShipId};
use crate::snapshot::GameSnapshot;

/// Intents an adapter can submit. The engine validates every one of them;
/// a command that violates an invariant simply has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectShip(ShipId),
    SetOrientation(Orientation),
    PlaceAt { row: usize, col: usize },
    FireAt { row: usize, col: usize },
    StartAutopilot,
    StopAutopilot,
    Reset,
}

/// Turn pacing. Tests shrink these to keep suites fast.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause before the computer answers the human's shot.
    pub computer_delay: Duration,
    /// Pause between autopilot turns.
    pub autopilot_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            computer_delay: COMPUTER_TURN_DELAY,
            autopilot_delay: AUTOPILOT_TURN_DELAY,
        }
    }
}

/// Cloneable adapter-side handle: submit intents, observe snapshots.
#[derive(Clone)]
pub struct GameHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<GameSnapshot>,
}

impl GameHandle {
    pub async fn select_ship(&self, id: ShipId) -> anyhow::Result<()> {
        self.send(Command::SelectShip(id)).await
    }

    pub async fn set_orientation(&self, orientation: Orientation) -> anyhow::Result<()> {
        self.send(Command::SetOrientation(orientation)).await
    }

    pub async fn place_at(&self, row: usize, col: usize) -> anyhow::Result<()> {
        self.send(Command::PlaceAt { row, col }).await
    }

    pub async fn fire_at(&self, row: usize, col: usize) -> anyhow::Result<()> {
        self.send(Command::FireAt { row, col }).await
    }

    pub async fn start_autopilot(&self) -> anyhow::Result<()> {
        self.send(Command::StartAutopilot).await
    }

    pub async fn stop_autopilot(&self) -> anyhow::Result<()> {
        self.send(Command::StopAutopilot).await
    }

    pub async fn reset(&self) -> anyhow::Result<()> {
        self.send(Command::Reset).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.borrow().clone()
    }

    /// Wait for the next published state.
    pub async fn changed(&mut self) -> anyhow::Result<GameSnapshot> {
        self.state
            .changed()
            .await
            .map_err(|_| anyhow!("game session has shut down"))?;
        Ok(self.state.borrow_and_update().clone())
    }

    /// Wait until a published state satisfies `pred` (checked against the
    /// current state first).
    pub async fn wait_for(
        &mut self,
        pred: impl FnMut(&GameSnapshot) -> bool,
    ) -> anyhow::Result<GameSnapshot> {
        let snap = self
            .state
            .wait_for(pred)
            .await
            .map_err(|_| anyhow!("game session has shut down"))?;
        Ok((*snap).clone())
    }

    async fn send(&self, cmd: Command) -> anyhow::Result<()> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| anyhow!("game session has shut down"))
    }
}

/// The session task: engine, command stream, and the one pending timer.
pub struct GameSession {
    engine: GameEngine,
    config: SessionConfig,
    commands: mpsc::Receiver<Command>,
    due_tx: mpsc::Sender<u64>,
    due_rx: mpsc::Receiver<u64>,
    state: watch::Sender<GameSnapshot>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
    revision: u64,
}

impl GameSession {
    /// Spawn a session onto the current runtime. The returned task ends
    /// once every [`GameHandle`] clone has been dropped.
    pub fn spawn(config: SessionConfig, rng: SmallRng) -> (GameHandle, JoinHandle<()>) {
        let engine = GameEngine::new(rng);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (due_tx, due_rx) = mpsc::channel(4);
        let (state_tx, state_rx) = watch::channel(engine.snapshot(0));
        let session = GameSession {
            engine,
            config,
            commands: cmd_rx,
            due_tx,
            due_rx,
            state: state_tx,
            timer: None,
            generation: 0,
            revision: 0,
        };
        let task = tokio::spawn(session.run());
        (
            GameHandle {
                commands: cmd_tx,
                state: state_rx,
            },
            task,
        )
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    // every handle dropped: tear down
                    None => break,
                },
                due = self.due_rx.recv() => {
                    if let Some(generation) = due {
                        self.handle_turn_due(generation);
                    }
                }
            }
        }
        self.cancel_timer();
        debug!("session torn down");
    }

    fn handle_command(&mut self, cmd: Command) {
        trace!("command: {:?}", cmd);
        let result = match cmd {
            Command::SelectShip(id) => {
                self.engine.select_ship(id);
                Ok(())
            }
            Command::SetOrientation(orientation) => {
                self.engine.set_orientation(orientation);
                Ok(())
            }
            Command::PlaceAt { row, col } => self.engine.place_at(row, col),
            Command::FireAt { row, col } => self.engine.fire_at(row, col).map(|accepted| {
                if accepted {
                    self.schedule_after_player_shot();
                }
            }),
            Command::StartAutopilot => self.engine.start_autopilot().map(|()| {
                if self.engine.autopilot() {
                    self.schedule(self.config.autopilot_delay);
                }
            }),
            Command::StopAutopilot => {
                self.cancel_timer();
                self.engine.stop_autopilot();
                Ok(())
            }
            Command::Reset => {
                self.cancel_timer();
                self.engine.reset();
                Ok(())
            }
        };
        if let Err(e) = result {
            // invariant violation: surfaced, state left as the engine
            // guarantees, session keeps serving
            error!("command {:?} failed: {}", cmd, e);
        }
        self.finish_step();
    }

    fn handle_turn_due(&mut self, generation: u64) {
        if generation != self.generation {
            trace!("dropping stale turn timer (generation {})", generation);
            return;
        }
        self.timer = None;
        let result = if self.engine.autopilot() {
            let result = self.engine.autopilot_turn();
            if self.engine.phase() == GamePhase::Playing && self.engine.autopilot() {
                self.schedule(self.config.autopilot_delay);
            }
            result
        } else {
            self.engine.computer_turn()
        };
        if let Err(e) = result {
            error!("scheduled turn failed: {}", e);
        }
        self.finish_step();
    }

    /// The human's shot went through; if the game is still running and the
    /// turn passed to the computer, queue its reply.
    fn schedule_after_player_shot(&mut self) {
        if self.engine.phase() == GamePhase::Playing
            && !self.engine.autopilot()
            && self.engine.active() == Side::Computer
        {
            self.schedule(self.config.computer_delay);
        }
    }

    /// Arm the single timer slot, cancelling whatever was pending
    /// (last-scheduler-wins, no queueing).
    fn schedule(&mut self, delay: Duration) {
        self.cancel_timer();
        self.generation += 1;
        let generation = self.generation;
        let tx = self.due_tx.clone();
        trace!("turn scheduled in {:?} (generation {})", delay, generation);
        self.timer = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(generation).await;
        }));
    }

    /// Abort the pending timer task and invalidate any expiry of it that
    /// already reached the queue.
    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    fn finish_step(&mut self) {
        if self.engine.phase() == GamePhase::GameOver {
            self.cancel_timer();
        }
        self.revision += 1;
        self.state.send_replace(self.engine.snapshot(self.revision));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::GameOutcome;
    use rand::SeedableRng;

    fn fast_config() -> SessionConfig {
        SessionConfig {
            computer_delay: Duration::from_millis(20),
            autopilot_delay: Duration::from_millis(20),
        }
    }

    fn spawn(config: SessionConfig, seed: u64) -> (GameHandle, JoinHandle<()>) {
        GameSession::spawn(config, SmallRng::seed_from_u64(seed))
    }

    async fn place_all(handle: &mut GameHandle) -> GameSnapshot {
        for (row, id) in ShipId::ALL.into_iter().enumerate() {
            handle.select_ship(id).await.unwrap();
            handle.place_at(row, 0).await.unwrap();
        }
        handle
            .wait_for(|s| s.phase == GamePhase::Playing)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn placing_all_ships_starts_the_battle() {
        let (mut handle, _task) = spawn(fast_config(), 1);
        let snap = place_all(&mut handle).await;
        assert_eq!(snap.active, Side::Player);
        assert!(snap.fleets.computer.iter().all(|s| s.placed));
        assert!(snap.fleets.player.iter().all(|s| s.placed));
    }

    #[tokio::test]
    async fn computer_answers_after_the_delay() {
        let (mut handle, _task) = spawn(fast_config(), 2);
        place_all(&mut handle).await;
        handle.fire_at(9, 9).await.unwrap();
        let snap = handle
            .wait_for(|s| s.shots_fired(Side::Computer) == 1)
            .await
            .unwrap();
        // after its one reply the computer stops and the turn is ours again
        assert_eq!(snap.active, Side::Player);
        assert_eq!(snap.shots_fired(Side::Player), 1);
    }

    #[tokio::test]
    async fn reset_cancels_the_pending_computer_turn() {
        let (mut handle, _task) = spawn(fast_config(), 3);
        place_all(&mut handle).await;
        let before = handle.snapshot().revision;
        handle.fire_at(9, 9).await.unwrap();
        handle.reset().await.unwrap();
        let snap = handle
            .wait_for(|s| s.revision >= before + 2)
            .await
            .unwrap();
        assert_eq!(snap.phase, GamePhase::Placing);
        // give the cancelled timer every chance to misfire
        sleep(Duration::from_millis(100)).await;
        let snap = handle.snapshot();
        assert_eq!(snap.phase, GamePhase::Placing);
        assert_eq!(snap.shots_fired(Side::Computer), 0);
        assert_eq!(snap.shots_fired(Side::Player), 0);
    }

    #[tokio::test]
    async fn autopilot_plays_a_whole_game() {
        let config = SessionConfig {
            computer_delay: Duration::ZERO,
            autopilot_delay: Duration::ZERO,
        };
        let (mut handle, _task) = spawn(config, 4);
        handle.start_autopilot().await.unwrap();
        let snap = handle
            .wait_for(|s| s.phase == GamePhase::GameOver)
            .await
            .unwrap();
        assert!(snap.autopilot);
        assert!(matches!(snap.outcome, Some(GameOutcome::Victory(_))));
        // with random fire the winner has taken at least 17 shots
        let winner = match snap.outcome {
            Some(GameOutcome::Victory(side)) => side,
            _ => unreachable!(),
        };
        assert!(snap.shots_fired(winner) >= 17);
    }

    #[tokio::test]
    async fn stopping_autopilot_freezes_the_position() {
        let (mut handle, _task) = spawn(fast_config(), 5);
        handle.start_autopilot().await.unwrap();
        handle
            .wait_for(|s| s.shots_fired(Side::Player) >= 1)
            .await
            .unwrap();
        handle.stop_autopilot().await.unwrap();
        let stopped = handle.wait_for(|s| !s.autopilot).await.unwrap();
        assert_eq!(stopped.phase, GamePhase::Playing);

        sleep(Duration::from_millis(150)).await;
        let later = handle.snapshot();
        assert_eq!(
            later.shots_fired(Side::Player) + later.shots_fired(Side::Computer),
            stopped.shots_fired(Side::Player) + stopped.shots_fired(Side::Computer)
        );
    }

    #[tokio::test]
    async fn dropping_the_handle_tears_the_session_down() {
        let (handle, task) = spawn(fast_config(), 6);
        handle.start_autopilot().await.unwrap();
        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn revision_counts_every_processed_command() {
        let (mut handle, _task) = spawn(fast_config(), 7);
        let before = handle.snapshot().revision;
        handle.select_ship(ShipId::Carrier).await.unwrap();
        handle.set_orientation(Orientation::Vertical).await.unwrap();
        handle.place_at(0, 0).await.unwrap();
        let snap = handle
            .wait_for(|s| s.revision >= before + 3)
            .await
            .unwrap();
        assert!(snap.fleets.player[ShipId::Carrier.index()].placed);
        assert_eq!(snap.boards.player[1][0], Some(ShipId::Carrier));
    }
}
