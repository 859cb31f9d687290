//! Local persistence for player progress
//!
//! Features:
//! - JSON file store keyed like the shipped save (points, shipLevel, gameLevel, exp)
//! - In-memory store for tests and headless runs
//! - Corrupt or missing files fall back to fresh progress

mod error;
pub mod player;

pub use error::StoreError;
pub use player::{
    JsonPlayerRepository, LevelUpResult, MemoryPlayerRepository, PlayerRepository, PlayerState,
    required_for_level,
};
