//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected random source only
//! - Stable iteration order (spawn order)
//! - No scheduling, audio or persistence dependencies

pub mod collision;
pub mod entity;
pub mod phase;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{collides, resolve_collisions};
pub use entity::{Entity, EntityKind, Player, Star};
pub use phase::Command;
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use spawn::{SpawnTimers, enemy_cooldown_for, enemy_shot_speed_for, enemy_speed_for};
pub use state::{GameEvent, GamePhase, GameResult, GameState};
pub use tick::{SimConfig, Simulation};
