//! Phase state machine and player commands
//!
//! Intro/Result/Paused --start--> Running, Running <--pause/resume--> Paused,
//! Running --lives == 0--> Result (inside the tick), and
//! Intro/Paused/Result --exit--> Intro. Commands issued from the wrong phase
//! are silent no-ops.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, Star};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Commands from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    StartRun,
    Pause,
    Resume,
    ExitToMenu,
    MoveBy { dx: f32, dy: f32 },
    Fire,
}

impl GamePhase {
    /// Only a running game accepts movement and fire
    pub fn is_controllable(self) -> bool {
        self == GamePhase::Running
    }

    /// Whether a new run may start from this phase
    pub fn can_start_run(self) -> bool {
        !self.is_controllable()
    }

    /// Whether the player may leave to the menu from this phase
    pub fn can_exit_to_menu(self) -> bool {
        !self.is_controllable()
    }
}

/// Fresh running state. Keeps the existing star field unless it is empty.
pub fn reset_for_run(previous: &GameState, fresh_stars: impl FnOnce() -> Vec<Star>) -> GameState {
    let stars = if previous.stars.is_empty() {
        fresh_stars()
    } else {
        previous.stars.clone()
    };
    GameState {
        phase: GamePhase::Running,
        stars,
        ..GameState::default()
    }
}

pub fn pause(state: &mut GameState) -> Option<GameEvent> {
    if state.phase != GamePhase::Running {
        return None;
    }
    state.phase = GamePhase::Paused;
    log::debug!("Run paused at {}s", state.elapsed_seconds);
    Some(GameEvent::Paused)
}

pub fn resume(state: &mut GameState) -> Option<GameEvent> {
    if state.phase != GamePhase::Paused {
        return None;
    }
    state.phase = GamePhase::Running;
    log::debug!("Run resumed at {}s", state.elapsed_seconds);
    Some(GameEvent::Resumed)
}

/// Move the ship, clamped to its movement box
pub fn move_player_by(state: &mut GameState, dx: f32, dy: f32) {
    if !state.phase.is_controllable() {
        return;
    }
    state.player.move_by(Vec2::new(dx, dy));
}

/// Fire a bullet if there is enough energy
pub fn fire(state: &mut GameState) -> Option<GameEvent> {
    if !state.phase.is_controllable() || state.energy < SHOT_ENERGY_COST {
        return None;
    }
    let id = state.next_entity_id();
    let bullet = Entity::new(id, EntityKind::Bullet, state.player.muzzle(), BULLET_SIZE)
        .with_velocity(BULLET_SPEED, 0.0);
    state.bullets.push(bullet);
    state.energy = (state.energy - SHOT_ENERGY_COST).max(0.0);
    Some(GameEvent::PlayerShot)
}
