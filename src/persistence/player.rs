//! Player progress: points, ship tier, level and experience

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::StoreError;

/// Persisted player progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub points: u64,
    #[serde(rename = "shipLevel")]
    pub ship_level: u32,
    #[serde(rename = "gameLevel")]
    pub game_level: u32,
    pub exp: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            points: 0,
            ship_level: 1,
            game_level: 1,
            exp: 0,
        }
    }
}

/// Outcome of granting experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpResult {
    pub leveled_up: bool,
    pub new_level: u32,
    pub leftover_exp: u64,
}

/// Experience needed to clear a level: 100, 120, 140, ...
pub fn required_for_level(level: u32) -> u64 {
    100 + u64::from(level.max(1) - 1) * 20
}

/// Store for player progress
///
/// Writes never fail from the caller's point of view; implementations log
/// and swallow storage errors.
pub trait PlayerRepository: Send {
    /// Current progress
    fn player(&self) -> PlayerState;

    /// Apply a change and persist it
    fn update(&mut self, transform: &mut dyn FnMut(&mut PlayerState));

    fn set_points(&mut self, value: i64) {
        let value = value.max(0) as u64;
        self.update(&mut |s: &mut PlayerState| s.points = value);
    }

    /// Add (or remove) points, never going below zero
    fn add_points(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        self.update(&mut |s: &mut PlayerState| s.points = s.points.saturating_add_signed(delta));
    }

    /// Spend points if there are enough
    fn try_spend(&mut self, cost: i64) -> bool {
        if cost <= 0 {
            return true;
        }
        let cost = cost as u64;
        if self.player().points < cost {
            return false;
        }
        self.update(&mut |s: &mut PlayerState| s.points -= cost);
        true
    }

    fn set_ship_level(&mut self, level: u32) {
        let level = level.max(1);
        self.update(&mut |s: &mut PlayerState| s.ship_level = level);
    }

    /// Jump to a level, clearing experience
    fn set_game_level(&mut self, level: u32) {
        let level = level.max(1);
        self.update(&mut |s: &mut PlayerState| {
            s.game_level = level;
            s.exp = 0;
        });
    }

    /// Grant experience, levelling up as many times as it covers
    fn add_experience(&mut self, delta: i64) -> LevelUpResult {
        let gained = delta.max(0) as u64;
        let mut outcome = LevelUpResult {
            leveled_up: false,
            new_level: 1,
            leftover_exp: 0,
        };
        self.update(&mut |s: &mut PlayerState| {
            let mut exp = s.exp + gained;
            let mut level = s.game_level.max(1);
            let mut leveled_up = false;
            while exp >= required_for_level(level) {
                exp -= required_for_level(level);
                level += 1;
                leveled_up = true;
            }
            s.exp = exp;
            s.game_level = level;
            outcome = LevelUpResult {
                leveled_up,
                new_level: level,
                leftover_exp: exp,
            };
        });
        outcome
    }

    fn reset(&mut self) {
        self.update(&mut |s: &mut PlayerState| *s = PlayerState::default());
    }
}

/// Progress held in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryPlayerRepository {
    state: PlayerState,
}

impl MemoryPlayerRepository {
    pub fn new(state: PlayerState) -> Self {
        Self { state }
    }
}

impl PlayerRepository for MemoryPlayerRepository {
    fn player(&self) -> PlayerState {
        self.state
    }

    fn update(&mut self, transform: &mut dyn FnMut(&mut PlayerState)) {
        transform(&mut self.state);
    }
}

/// Progress persisted as a JSON file, rewritten on every change
#[derive(Debug, Clone)]
pub struct JsonPlayerRepository {
    path: PathBuf,
    state: PlayerState,
}

impl JsonPlayerRepository {
    /// Open the store, starting fresh when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PlayerState::default(),
            Err(e) => return Err(e.into()),
        };
        log::info!(
            "Loaded player progress from {} ({} points, level {})",
            path.display(),
            state.points,
            state.game_level
        );
        Ok(Self { path, state })
    }

    /// Open the store, falling back to fresh progress if the file is unreadable
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(repo) => repo,
            Err(e) => {
                log::warn!("Starting fresh progress, {} unreadable: {}", path.display(), e);
                Self {
                    path,
                    state: PlayerState::default(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(&self.state).map_err(|e| StoreError::Encode(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PlayerRepository for JsonPlayerRepository {
    fn player(&self) -> PlayerState {
        self.state
    }

    fn update(&mut self, transform: &mut dyn FnMut(&mut PlayerState)) {
        transform(&mut self.state);
        if let Err(e) = self.write() {
            log::warn!("Failed to save player progress: {}", e);
        }
    }
}
