//! Game state and core simulation types
//!
//! Everything a run needs to advance deterministically lives here, including
//! the spawn timers and the entity id counter.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Player, Star};
use super::spawn::SpawnTimers;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start command
    #[default]
    Intro,
    /// Active gameplay
    Running,
    /// Gameplay frozen, stars keep drifting
    Paused,
    /// Run ended, result available
    Result,
}

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: u64,
    pub elapsed_seconds: u32,
    pub bonus_eggs: u32,
    pub enemies_down: u32,
}

/// Things that happened, for audio and persistence consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    Paused,
    Resumed,
    ExitedToMenu,
    PlayerShot,
    EnemyDestroyed,
    EnemyBulletDestroyed,
    PlayerHit,
    EggCollected,
    GameOver(GameResult),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    /// Whole seconds survived
    pub elapsed_seconds: u32,
    pub lives: u32,
    /// Fire resource, always within [0, 1]
    pub energy: f32,
    pub bonus_eggs: u32,
    pub enemies_down: u32,
    pub player: Player,
    /// Active entities, in spawn order
    pub enemies: Vec<Entity>,
    pub bullets: Vec<Entity>,
    pub enemy_bullets: Vec<Entity>,
    pub eggs: Vec<Entity>,
    /// Background decoration
    pub stars: Vec<Star>,
    /// Set exactly once, when the run ends
    pub result: Option<GameResult>,
    pub timers: SpawnTimers,
    /// Sub-second remainder of the run clock
    pub(crate) elapsed_fraction: f32,
    /// Next entity ID
    pub(crate) next_id: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Intro,
            score: 0,
            elapsed_seconds: 0,
            lives: STARTING_LIVES,
            energy: STARTING_ENERGY,
            bonus_eggs: 0,
            enemies_down: 0,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            eggs: Vec::new(),
            stars: Vec::new(),
            result: None,
            timers: SpawnTimers::default(),
            elapsed_fraction: 0.0,
            next_id: 1,
        }
    }
}

impl GameState {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add energy, capped at full
    pub fn gain_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, 1.0);
    }

    /// Remove one life, never going below zero
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Snapshot of the current run numbers
    pub fn result_snapshot(&self) -> GameResult {
        GameResult {
            score: self.score,
            elapsed_seconds: self.elapsed_seconds,
            bonus_eggs: self.bonus_eggs,
            enemies_down: self.enemies_down,
        }
    }

    /// Number of live gameplay entities
    pub fn entity_count(&self) -> usize {
        self.enemies.len() + self.bullets.len() + self.enemy_bullets.len() + self.eggs.len()
    }

    /// Check numeric invariants. Fatal in debug builds, clamped in release.
    pub fn enforce_invariants(&mut self) {
        debug_assert!(
            (0.0..=1.0).contains(&self.energy),
            "energy out of range: {}",
            self.energy
        );
        debug_assert!(self.lives <= STARTING_LIVES, "too many lives: {}", self.lives);
        self.energy = if self.energy.is_finite() {
            self.energy.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.lives = self.lives.min(STARTING_LIVES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = GameState::default();
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.energy, 1.0);
        assert_eq!(state.entity_count(), 0);
        assert!(state.result.is_none());
    }

    #[test]
    fn test_entity_ids_are_monotonic() {
        let mut state = GameState::default();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_energy_and_lives_clamped() {
        let mut state = GameState::default();
        state.gain_energy(0.5);
        assert_eq!(state.energy, 1.0);
        state.lives = 0;
        state.lose_life();
        assert_eq!(state.lives, 0);
    }
}
