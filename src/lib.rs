//! Chicken Galaxy - a vertical arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, phases)
//! - `session`: Fixed-rate tick scheduler and state/event publishing
//! - `outcome`: Game-over consumers (rewards, leaderboard, audio cues)
//! - `audio`: Audio cue interface and mixer
//! - `persistence`: Player progress store
//! - `ships`: Ship upgrade catalog
//! - `settings`: User settings and game variant selection

pub mod audio;
pub mod highscores;
pub mod outcome;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod ships;
pub mod sim;

pub use highscores::HighScores;
pub use session::{GameSession, GameUiState};
pub use settings::{GameVariant, Settings};

/// Game configuration constants
///
/// All positions and sizes are normalized to the playfield: x and y run
/// from 0 (left/top) to 1 (right/bottom).
pub mod consts {
    use std::time::Duration;

    /// Tick cadence of the scheduler (~62.5 Hz)
    pub const TICK_INTERVAL: Duration = Duration::from_millis(16);
    /// Simulated seconds advanced per tick
    pub const SIM_DT: f32 = 0.016;

    /// Lives at the start of a run
    pub const STARTING_LIVES: u32 = 3;
    /// Energy at the start of a run
    pub const STARTING_ENERGY: f32 = 1.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 0.5;
    pub const PLAYER_START_Y: f32 = 0.8;
    pub const PLAYER_SIZE: f32 = 0.18;
    /// Player movement box
    pub const PLAYER_MIN_X: f32 = 0.08;
    pub const PLAYER_MAX_X: f32 = 0.92;
    pub const PLAYER_MIN_Y: f32 = 0.20;
    pub const PLAYER_MAX_Y: f32 = 0.95;

    /// Enemies bounce between these x positions when drifting
    pub const ENEMY_DRIFT_MIN_X: f32 = 0.08;
    pub const ENEMY_DRIFT_MAX_X: f32 = 0.92;
    /// An enemy at or below this line counts as having reached the player
    pub const ENEMY_BOTTOM_Y: f32 = 0.98;

    /// Player shots
    pub const SHOT_ENERGY_COST: f32 = 0.15;
    pub const BULLET_SIZE: f32 = 0.035;
    pub const BULLET_SPEED: f32 = 1.4;
    /// Bullets leave the ship this many ship-sizes above its center
    pub const BULLET_SPAWN_OFFSET: f32 = 0.6;

    /// Passive energy regeneration per second
    pub const ENERGY_REGEN_PER_SEC: f32 = 0.12;
    /// Passive score per second (floored per tick)
    pub const SCORE_PER_SEC: f32 = 12.0;

    /// Bullet hits enemy
    pub const ENEMY_KILL_SCORE: u64 = 90;
    pub const ENEMY_KILL_ENERGY: f32 = 0.05;
    /// Bullet hits enemy bullet
    pub const SHOT_DOWN_SCORE: u64 = 30;
    pub const SHOT_DOWN_ENERGY: f32 = 0.02;
    /// Player catches an egg
    pub const EGG_SCORE: u64 = 120;
    pub const EGG_ENERGY: f32 = 0.18;

    /// Culling bounds for projectiles (both directions)
    pub const PROJECTILE_MIN_Y: f32 = -0.1;
    pub const PROJECTILE_MIN_X: f32 = -0.2;
    pub const PROJECTILE_MAX_X: f32 = 1.2;
    /// Culling bound for falling entities (enemies, eggs)
    pub const FALLING_MAX_Y: f32 = 1.1;

    /// Background stars generated for a fresh field
    pub const STAR_COUNT: usize = 70;

    /// Reward points granted per collected egg at game over
    pub const REWARD_PER_EGG: u64 = 50;
}
