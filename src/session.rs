//! Gameplay session: fixed-rate tick scheduler plus state/event publishing
//!
//! One mutex-guarded cell holds the simulation and its state. The ticker
//! thread and the command methods both apply a complete transformation and
//! publish its snapshot and events while holding the lock, so readers only
//! ever see whole states, in the order they happened. Publishing uses
//! channels that never block the ticker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{
    Command, Entity, GameEvent, GamePhase, GameResult, GameState, Player, Simulation, Star,
};

/// Snapshots buffered per subscriber before newer ones are dropped
const SNAPSHOT_BUFFER: usize = 4;

/// Read-only view of the game published to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameUiState {
    pub phase: GamePhase,
    pub score: u64,
    pub elapsed_seconds: u32,
    pub lives: u32,
    pub energy: f32,
    pub bonus_eggs: u32,
    pub enemies_down: u32,
    pub player: Player,
    pub enemies: Vec<Entity>,
    pub bullets: Vec<Entity>,
    pub enemy_bullets: Vec<Entity>,
    pub eggs: Vec<Entity>,
    pub stars: Vec<Star>,
    pub result: Option<GameResult>,
}

impl From<&GameState> for GameUiState {
    fn from(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            elapsed_seconds: state.elapsed_seconds,
            lives: state.lives,
            energy: state.energy,
            bonus_eggs: state.bonus_eggs,
            enemies_down: state.enemies_down,
            player: state.player,
            enemies: state.enemies.clone(),
            bullets: state.bullets.clone(),
            enemy_bullets: state.enemy_bullets.clone(),
            eggs: state.eggs.clone(),
            stars: state.stars.clone(),
            result: state.result,
        }
    }
}

struct Core {
    sim: Simulation,
    state: GameState,
}

struct Shared {
    core: Mutex<Core>,
    running: AtomicBool,
    event_subscribers: Mutex<Vec<Sender<GameEvent>>>,
    snapshot_subscribers: Mutex<Vec<SyncSender<GameUiState>>>,
}

/// Recover the guard from a poisoned lock; every writer leaves a whole state
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn tick(&self, dt: f32) {
        let mut core = lock(&self.core);
        let Core { sim, state } = &mut *core;
        let events = sim.tick(state, dt);
        // Published under the core lock so subscribers see transitions in order
        self.publish(GameUiState::from(&*state), events);
    }

    fn command(&self, command: Command) -> bool {
        let mut core = lock(&self.core);
        let Core { sim, state } = &mut *core;
        let event = sim.apply(state, command);
        let applied = event.is_some();
        self.publish(GameUiState::from(&*state), event.into_iter().collect());
        applied
    }

    fn publish(&self, snapshot: GameUiState, events: Vec<GameEvent>) {
        lock(&self.snapshot_subscribers).retain(|tx| match tx.try_send(snapshot.clone()) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });

        if events.is_empty() {
            return;
        }
        let mut subscribers = lock(&self.event_subscribers);
        for event in events {
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

/// A gameplay session driving one simulation at a fixed cadence
///
/// Dropping the session (or calling [`GameSession::stop`]) cancels the
/// ticker; a new session is needed to tick again.
pub struct GameSession {
    shared: Arc<Shared>,
    ticker: Option<JoinHandle<()>>,
}

impl GameSession {
    /// Create a session showing the intro screen, without a ticker
    pub fn new(mut sim: Simulation) -> Self {
        let state = sim.intro_state();
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(Core { sim, state }),
                running: AtomicBool::new(false),
                event_subscribers: Mutex::new(Vec::new()),
                snapshot_subscribers: Mutex::new(Vec::new()),
            }),
            ticker: None,
        }
    }

    /// Create a session and start ticking at [`TICK_INTERVAL`]
    pub fn start(sim: Simulation) -> std::io::Result<Self> {
        let mut session = Self::new(sim);
        session.spawn_ticker(TICK_INTERVAL)?;
        Ok(session)
    }

    /// Start the ticker thread. Each tick advances the simulation by `interval`.
    pub fn spawn_ticker(&mut self, interval: Duration) -> std::io::Result<()> {
        if self.ticker.is_some() {
            return Ok(());
        }
        self.shared.running.store(true, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        let dt = interval.as_secs_f32();
        let handle = thread::Builder::new()
            .name("game-tick".to_string())
            .spawn(move || {
                log::info!("Tick scheduler started ({}ms)", interval.as_millis());
                while shared.running.load(Ordering::SeqCst) {
                    thread::sleep(interval);
                    if !shared.running.load(Ordering::SeqCst) {
                        break;
                    }
                    shared.tick(dt);
                }
                log::info!("Tick scheduler stopped");
            });
        match handle {
            Ok(handle) => {
                self.ticker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Cancel the ticker and wait for it to finish
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.ticker.take() {
            if handle.join().is_err() {
                log::warn!("Tick scheduler panicked");
            }
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some() && self.shared.running.load(Ordering::SeqCst)
    }

    /// Advance one tick by hand (tests, replays, headless drivers)
    pub fn step(&self, dt: f32) {
        self.shared.tick(dt);
    }

    /// Receive every event from now on
    pub fn subscribe_events(&self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        lock(&self.shared.event_subscribers).push(tx);
        rx
    }

    /// Receive a snapshot after every tick and command; slow readers miss snapshots
    pub fn subscribe_snapshots(&self) -> Receiver<GameUiState> {
        let (tx, rx) = mpsc::sync_channel(SNAPSHOT_BUFFER);
        lock(&self.shared.snapshot_subscribers).push(tx);
        rx
    }

    /// Current state
    pub fn snapshot(&self) -> GameUiState {
        GameUiState::from(&lock(&self.shared.core).state)
    }

    pub fn phase(&self) -> GamePhase {
        lock(&self.shared.core).state.phase
    }

    /// Apply a command; returns whether it changed anything observable
    pub fn send(&self, command: Command) -> bool {
        self.shared.command(command)
    }

    pub fn start_run(&self) -> bool {
        self.send(Command::StartRun)
    }

    pub fn pause(&self) -> bool {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(Command::Resume)
    }

    pub fn exit_to_menu(&self) -> bool {
        self.send(Command::ExitToMenu)
    }

    pub fn move_player_by(&self, dx: f32, dy: f32) {
        self.send(Command::MoveBy { dx, dy });
    }

    pub fn fire(&self) -> bool {
        self.send(Command::Fire)
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.stop();
    }
}
