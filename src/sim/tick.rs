//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::entity::{Entity, Star};
use super::phase::{self, Command};
use super::rng::{RandomSource, SeededRandom};
use super::spawn::run_spawn_policy;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Gameplay switches that distinguish the game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Enemies shoot back at the player
    pub enemy_fire_enabled: bool,
    /// Enemies drift sideways and bounce off the lanes
    pub enemy_horizontal_drift: bool,
    /// Stars generated for a fresh background
    pub star_count: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            enemy_fire_enabled: false,
            enemy_horizontal_drift: false,
            star_count: STAR_COUNT,
        }
    }
}

/// The simulation step: owns the variant config and the random source that
/// every run of the session shares.
pub struct Simulation {
    config: SimConfig,
    rng: Box<dyn RandomSource>,
}

impl Simulation {
    pub fn new(config: SimConfig, rng: Box<dyn RandomSource>) -> Self {
        Self { config, rng }
    }

    /// Simulation seeded from a fixed value
    pub fn seeded(config: SimConfig, seed: u64) -> Self {
        Self::new(config, Box::new(SeededRandom::new(seed)))
    }

    /// State shown when the game screen opens
    pub fn intro_state(&mut self) -> GameState {
        GameState {
            stars: self.generate_stars(),
            ..GameState::default()
        }
    }

    /// Apply a player command. Commands from the wrong phase leave the state untouched.
    pub fn apply(&mut self, state: &mut GameState, command: Command) -> Option<GameEvent> {
        match command {
            Command::StartRun => self.start_run(state),
            Command::Pause => phase::pause(state),
            Command::Resume => phase::resume(state),
            Command::ExitToMenu => self.exit_to_menu(state),
            Command::MoveBy { dx, dy } => {
                phase::move_player_by(state, dx, dy);
                None
            }
            Command::Fire => phase::fire(state),
        }
    }

    fn start_run(&mut self, state: &mut GameState) -> Option<GameEvent> {
        if !state.phase.can_start_run() {
            return None;
        }
        *state = phase::reset_for_run(state, || self.generate_stars());
        log::info!("Run started");
        Some(GameEvent::RunStarted)
    }

    fn exit_to_menu(&mut self, state: &mut GameState) -> Option<GameEvent> {
        if !state.phase.can_exit_to_menu() {
            return None;
        }
        *state = self.intro_state();
        log::debug!("Exited to menu");
        Some(GameEvent::ExitedToMenu)
    }

    /// Advance the game state by one timestep, returning what happened
    pub fn tick(&mut self, state: &mut GameState, dt: f32) -> Vec<GameEvent> {
        debug_assert!(dt.is_finite() && dt >= 0.0, "bad timestep: {dt}");
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        for star in &mut state.stars {
            star.advance(dt);
        }

        // Don't tick gameplay unless running
        if state.phase != GamePhase::Running {
            return Vec::new();
        }

        let mut events = Vec::new();

        // Passive regen and score over time
        state.gain_energy(dt * ENERGY_REGEN_PER_SEC);
        state.score += (dt * SCORE_PER_SEC).floor() as u64;

        // Movement
        for entity in state
            .bullets
            .iter_mut()
            .chain(state.enemies.iter_mut())
            .chain(state.eggs.iter_mut())
            .chain(state.enemy_bullets.iter_mut())
        {
            entity.advance(dt);
        }

        // Culling
        let in_bounds = |e: &Entity| !e.is_out_of_bounds();
        state.bullets.retain(in_bounds);
        state.enemy_bullets.retain(in_bounds);
        state.enemies.retain(in_bounds);
        state.eggs.retain(in_bounds);

        resolve_collisions(state, &mut events);
        run_spawn_policy(state, dt, &self.config, self.rng.as_mut());

        // Run clock
        state.elapsed_fraction += dt;
        while state.elapsed_fraction >= 1.0 {
            state.elapsed_seconds += 1;
            state.elapsed_fraction -= 1.0;
        }

        state.enforce_invariants();

        if state.lives == 0 {
            let result = state.result_snapshot();
            state.phase = GamePhase::Result;
            state.result = Some(result);
            log::info!(
                "Game over: score={} time={}s eggs={} enemies={}",
                result.score,
                result.elapsed_seconds,
                result.bonus_eggs,
                result.enemies_down
            );
            events.push(GameEvent::GameOver(result));
        }

        events
    }

    fn generate_stars(&mut self) -> Vec<Star> {
        (0..self.config.star_count)
            .map(|index| Star {
                id: index as u32,
                pos: glam::Vec2::new(self.rng.next_f32(), self.rng.next_f32()),
                size: self.rng.range(0.003, 0.012),
                speed: self.rng.range(0.04, 0.12),
            })
            .collect()
    }
}
